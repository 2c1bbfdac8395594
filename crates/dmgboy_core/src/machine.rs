pub mod bus;
pub mod cartridge;
pub mod io;

use crate::cpu::decoder::{Decoded, Decoder};
use crate::cpu::registers::Registers;
use crate::cpu::scanner::ByteScanner;
use crate::error::Result;
use bus::MemoryBus;
use cartridge::Cartridge;

/// Everything an instruction can touch: the register file, the bus and
/// the interrupt master enable flag.
pub struct Machine {
    pub regs: Registers,
    pub bus: MemoryBus,
    pub interrupts_enabled: bool,
}

impl Machine {
    /// A machine with zeroed registers and the standard DMG memory map.
    pub fn new(cartridge: Cartridge) -> Self {
        Self::with_bus(MemoryBus::new(cartridge))
    }

    pub fn with_bus(bus: MemoryBus) -> Self {
        Self {
            regs: Registers::new(),
            bus,
            interrupts_enabled: false,
        }
    }

    /// Decode the instruction at `addr` without executing it or moving PC.
    pub fn decode_at(&self, addr: u16) -> Result<Decoded> {
        let mut scanner = ByteScanner::new(&self.bus, addr as usize);
        Decoder::root().decode_next(&mut scanner)
    }
}
