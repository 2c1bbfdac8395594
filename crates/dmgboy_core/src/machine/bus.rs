use std::ops::RangeInclusive;

use super::cartridge::Cartridge;
use super::io::{IoEffect, IoRegisters};
use crate::cpu::scanner::ByteSource;
use crate::error::{GbError, Result};

pub const VRAM: RangeInclusive<u16> = 0x8000..=0x9FFF;
pub const WRAM: RangeInclusive<u16> = 0xC000..=0xDFFF;
pub const ECHO: RangeInclusive<u16> = 0xE000..=0xFDFF;
pub const OAM: RangeInclusive<u16> = 0xFE00..=0xFE9F;
pub const UNUSABLE: RangeInclusive<u16> = 0xFEA0..=0xFEFF;
pub const HRAM: RangeInclusive<u16> = 0xFF80..=0xFFFE;
pub const IE_ADDR: u16 = 0xFFFF;

const OAM_DMA_LEN: u16 = 0xA0;

/// Plain read/write storage covering one address range.
pub struct Ram {
    name: &'static str,
    start: u16,
    data: Vec<u8>,
}

impl Ram {
    pub fn new(name: &'static str, range: RangeInclusive<u16>) -> Self {
        let len = (*range.end() - *range.start()) as usize + 1;
        Self {
            name,
            start: *range.start(),
            data: vec![0; len],
        }
    }

    #[inline]
    fn contains(&self, addr: u16) -> bool {
        addr >= self.start && ((addr - self.start) as usize) < self.data.len()
    }
}

/// Something on the bus that owns part of the address space.
pub enum Component {
    Cartridge(Cartridge),
    Ram(Ram),
    /// Mirrors `range` onto the addresses starting at `target`.
    Echo {
        range: RangeInclusive<u16>,
        target: u16,
    },
    /// Reads 0x00, writes are dropped.
    Unusable(RangeInclusive<u16>),
    Io(IoRegisters),
    /// The interrupt-enable byte; reads back what was written.
    InterruptEnable(u8),
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Cartridge(cart) => cart.name(),
            Component::Ram(ram) => ram.name,
            Component::Echo { .. } => "echo-ram",
            Component::Unusable(_) => "unusable",
            Component::Io(_) => "io-registers",
            Component::InterruptEnable(_) => "interrupt-enable",
        }
    }

    pub fn is_responsible_for(&self, addr: u16) -> bool {
        match self {
            Component::Cartridge(_) => Cartridge::is_responsible_for(addr),
            Component::Ram(ram) => ram.contains(addr),
            Component::Echo { range, .. } | Component::Unusable(range) => range.contains(&addr),
            Component::Io(_) => IoRegisters::is_responsible_for(addr),
            Component::InterruptEnable(_) => addr == IE_ADDR,
        }
    }
}

/// The 16-bit address space.
///
/// Each access is routed to the single component that claims the address.
/// An address claimed by nobody, or by several components, is a wiring
/// bug and fails loudly instead of picking one.
pub struct MemoryBus {
    components: Vec<Component>,
}

impl MemoryBus {
    /// The standard DMG layout around `cartridge`.
    pub fn new(cartridge: Cartridge) -> Self {
        Self::with_components(vec![
            Component::Cartridge(cartridge),
            Component::Ram(Ram::new("video-ram", VRAM)),
            Component::Ram(Ram::new("work-ram", WRAM)),
            Component::Echo {
                range: ECHO,
                target: *WRAM.start(),
            },
            Component::Ram(Ram::new("oam", OAM)),
            Component::Unusable(UNUSABLE),
            Component::Io(IoRegisters::new()),
            Component::Ram(Ram::new("high-ram", HRAM)),
            Component::InterruptEnable(0),
        ])
    }

    pub fn with_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    fn owner(&self, addr: u16) -> Result<usize> {
        let mut owners = self
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_responsible_for(addr));
        match (owners.next(), owners.next()) {
            (Some((index, _)), None) => Ok(index),
            (None, _) => Err(GbError::UnmappedAddress { addr }),
            (Some((_, first)), Some((_, second))) => Err(GbError::AmbiguousAddress {
                addr,
                owners: [first, second]
                    .into_iter()
                    .chain(owners.map(|(_, c)| c))
                    .map(Component::name)
                    .collect(),
            }),
        }
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8> {
        let index = self.owner(addr)?;
        match &self.components[index] {
            Component::Echo { range, target } => self.read_byte(target + (addr - range.start())),
            Component::Cartridge(cart) => cart.read(addr),
            Component::Ram(ram) => Ok(ram.data[(addr - ram.start) as usize]),
            Component::Unusable(_) => Ok(0x00),
            Component::Io(io) => io.read(addr),
            Component::InterruptEnable(value) => Ok(*value),
        }
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<()> {
        let index = self.owner(addr)?;
        let effect = match &mut self.components[index] {
            Component::Echo { range, target } => {
                let mirrored = *target + (addr - range.start());
                return self.write_byte(mirrored, value);
            }
            Component::Cartridge(cart) => {
                cart.write(addr, value)?;
                IoEffect::None
            }
            Component::Ram(ram) => {
                ram.data[(addr - ram.start) as usize] = value;
                IoEffect::None
            }
            Component::Unusable(_) => {
                log::trace!("Dropped write of {value:#04X} to unusable address {addr:#06X}");
                IoEffect::None
            }
            Component::Io(io) => io.write(addr, value)?,
            Component::InterruptEnable(ie) => {
                *ie = value;
                IoEffect::None
            }
        };
        match effect {
            IoEffect::None => Ok(()),
            IoEffect::Dma { source } => self.oam_dma(source),
        }
    }

    /// Little-endian: `addr` holds the low byte, `addr + 1` the high byte.
    pub fn read_word(&self, addr: u16) -> Result<u16> {
        let low = self.read_byte(addr)?;
        let high = self.read_byte(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([low, high]))
    }

    pub fn write_word(&mut self, addr: u16, value: u16) -> Result<()> {
        let [low, high] = value.to_le_bytes();
        self.write_byte(addr, low)?;
        self.write_byte(addr.wrapping_add(1), high)
    }

    fn oam_dma(&mut self, source: u16) -> Result<()> {
        log::debug!("OAM DMA from {source:#06X}");
        for i in 0..OAM_DMA_LEN {
            let byte = self.read_byte(source.wrapping_add(i))?;
            self.write_byte(OAM.start() + i, byte)?;
        }
        Ok(())
    }

    /// Device-side access to the I/O latches, bypassing CPU write rules.
    pub fn io_mut(&mut self) -> Option<&mut IoRegisters> {
        self.components.iter_mut().find_map(|c| match c {
            Component::Io(io) => Some(io),
            _ => None,
        })
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.components.iter().find_map(|c| match c {
            Component::Cartridge(cart) => Some(cart),
            _ => None,
        })
    }
}

impl ByteSource for MemoryBus {
    fn byte_at(&self, position: usize) -> Result<u8> {
        self.read_byte(position as u16)
    }
}

#[cfg(test)]
mod tests;
