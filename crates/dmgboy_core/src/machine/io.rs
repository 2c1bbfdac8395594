use crate::error::{GbError, Result};

pub const IO_START: u16 = 0xFF00;
pub const IO_END: u16 = 0xFF7F;
pub const DMA_ADDR: u16 = 0xFF46;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    ReadWrite,
    /// The CPU may read but never write.
    ReadOnly,
    /// Low three bits (mode and coincidence) are owned by the LCD.
    Stat,
    /// Writing starts an OAM transfer.
    Dma,
    /// No register lives here: reads 0xFF, writes are dropped.
    Unused,
}

struct IoSlot {
    name: &'static str,
    first: u16,
    last: u16,
    access: Access,
    initial: u8,
}

const fn slot(name: &'static str, addr: u16, access: Access, initial: u8) -> IoSlot {
    IoSlot {
        name,
        first: addr,
        last: addr,
        access,
        initial,
    }
}

const fn unused(first: u16, last: u16) -> IoSlot {
    IoSlot {
        name: "unused",
        first,
        last,
        access: Access::Unused,
        initial: 0xFF,
    }
}

use Access::*;

/// Every slot in 0xFF00–0xFF7F, with the values the boot ROM leaves behind.
const SLOTS: &[IoSlot] = &[
    slot("P1", 0xFF00, ReadWrite, 0xCF),
    slot("SB", 0xFF01, ReadWrite, 0x00),
    slot("SC", 0xFF02, ReadWrite, 0x7E),
    unused(0xFF03, 0xFF03),
    slot("DIV", 0xFF04, ReadWrite, 0xAB),
    slot("TIMA", 0xFF05, ReadWrite, 0x00),
    slot("TMA", 0xFF06, ReadWrite, 0x00),
    slot("TAC", 0xFF07, ReadWrite, 0xF8),
    unused(0xFF08, 0xFF0E),
    slot("IF", 0xFF0F, ReadWrite, 0xE1),
    slot("NR10", 0xFF10, ReadWrite, 0x80),
    slot("NR11", 0xFF11, ReadWrite, 0xBF),
    slot("NR12", 0xFF12, ReadWrite, 0xF3),
    slot("NR13", 0xFF13, ReadWrite, 0xFF),
    slot("NR14", 0xFF14, ReadWrite, 0xBF),
    unused(0xFF15, 0xFF15),
    slot("NR21", 0xFF16, ReadWrite, 0x3F),
    slot("NR22", 0xFF17, ReadWrite, 0x00),
    slot("NR23", 0xFF18, ReadWrite, 0xFF),
    slot("NR24", 0xFF19, ReadWrite, 0xBF),
    slot("NR30", 0xFF1A, ReadWrite, 0x7F),
    slot("NR31", 0xFF1B, ReadWrite, 0xFF),
    slot("NR32", 0xFF1C, ReadWrite, 0x9F),
    slot("NR33", 0xFF1D, ReadWrite, 0xFF),
    slot("NR34", 0xFF1E, ReadWrite, 0xBF),
    unused(0xFF1F, 0xFF1F),
    slot("NR41", 0xFF20, ReadWrite, 0xFF),
    slot("NR42", 0xFF21, ReadWrite, 0x00),
    slot("NR43", 0xFF22, ReadWrite, 0x00),
    slot("NR44", 0xFF23, ReadWrite, 0xBF),
    slot("NR50", 0xFF24, ReadWrite, 0x77),
    slot("NR51", 0xFF25, ReadWrite, 0xF3),
    slot("NR52", 0xFF26, ReadWrite, 0xF1),
    unused(0xFF27, 0xFF2F),
    IoSlot {
        name: "WAVE",
        first: 0xFF30,
        last: 0xFF3F,
        access: ReadWrite,
        initial: 0x00,
    },
    slot("LCDC", 0xFF40, ReadWrite, 0x91),
    slot("STAT", 0xFF41, Stat, 0x85),
    slot("SCY", 0xFF42, ReadWrite, 0x00),
    slot("SCX", 0xFF43, ReadWrite, 0x00),
    slot("LY", 0xFF44, ReadOnly, 0x00),
    slot("LYC", 0xFF45, ReadWrite, 0x00),
    slot("DMA", DMA_ADDR, Dma, 0xFF),
    slot("BGP", 0xFF47, ReadWrite, 0xFC),
    slot("OBP0", 0xFF48, ReadWrite, 0x00),
    slot("OBP1", 0xFF49, ReadWrite, 0x00),
    slot("WY", 0xFF4A, ReadWrite, 0x00),
    slot("WX", 0xFF4B, ReadWrite, 0x00),
    unused(0xFF4C, 0xFF4F),
    slot("BOOT", 0xFF50, ReadWrite, 0xFF),
    unused(0xFF51, IO_END),
];

/// What the bus has to do after an I/O write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoEffect {
    None,
    /// Copy 0xA0 bytes from `source` into sprite-attribute RAM.
    Dma { source: u16 },
}

/// Memory-mapped hardware registers at 0xFF00–0xFF7F.
///
/// The register devices themselves (LCD, timer, sound) live outside this
/// core, so values are plain latches with per-register write rules.
pub struct IoRegisters {
    values: [u8; (IO_END - IO_START + 1) as usize],
}

impl Default for IoRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl IoRegisters {
    pub fn new() -> Self {
        let mut values = [0; (IO_END - IO_START + 1) as usize];
        for slot in SLOTS {
            for addr in slot.first..=slot.last {
                values[(addr - IO_START) as usize] = slot.initial;
            }
        }
        Self { values }
    }

    #[inline]
    pub fn is_responsible_for(addr: u16) -> bool {
        (IO_START..=IO_END).contains(&addr)
    }

    /// The single table entry backing `addr`.
    fn slot(addr: u16) -> Result<&'static IoSlot> {
        let mut found = SLOTS
            .iter()
            .filter(|s| (s.first..=s.last).contains(&addr));
        match (found.next(), found.next()) {
            (Some(slot), None) => Ok(slot),
            (first, second) => Err(GbError::IoRegisterCoverage {
                addr,
                registers: first
                    .into_iter()
                    .chain(second)
                    .chain(found)
                    .map(|s| s.name)
                    .collect(),
            }),
        }
    }

    /// Name of the register at `addr`, mostly for diagnostics.
    pub fn register_name(addr: u16) -> Result<&'static str> {
        Ok(Self::slot(addr)?.name)
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        let slot = Self::slot(addr)?;
        Ok(match slot.access {
            Access::Unused => 0xFF,
            Access::Stat => self.values[Self::index(addr)] | 0x80,
            _ => self.values[Self::index(addr)],
        })
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<IoEffect> {
        let slot = Self::slot(addr)?;
        let index = Self::index(addr);
        match slot.access {
            Access::ReadWrite => self.values[index] = value,
            Access::ReadOnly => {
                return Err(GbError::ReadOnlyRegister {
                    name: slot.name,
                    addr,
                    value,
                })
            }
            Access::Stat => self.values[index] = (value & !0x07) | (self.values[index] & 0x07),
            Access::Dma => {
                self.values[index] = value;
                return Ok(IoEffect::Dma {
                    source: u16::from(value) << 8,
                });
            }
            Access::Unused => {
                log::trace!("Dropped write of {value:#04X} to unused I/O slot {addr:#06X}");
            }
        }
        Ok(IoEffect::None)
    }

    /// Set a register from the device side, bypassing CPU write rules
    /// (e.g. LY, which the CPU cannot write).
    pub fn poke(&mut self, addr: u16, value: u8) {
        if Self::is_responsible_for(addr) {
            self.values[Self::index(addr)] = value;
        }
    }

    #[inline]
    fn index(addr: u16) -> usize {
        (addr - IO_START) as usize
    }
}
