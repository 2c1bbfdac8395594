use crate::error::{GbError, Result};

pub(super) const ROM_ONLY_LEN: usize = 0x8000;

/// A 32 KiB cartridge without a bank controller.
///
/// Bank 0 sits at 0x0000–0x3FFF and bank 1 at 0x4000–0x7FFF, always.
/// There is no external RAM and nothing to switch, so every write and every
/// RAM access is an error.
pub struct RomOnlyCartridge {
    rom: Vec<u8>,
}

impl RomOnlyCartridge {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self { rom: rom.to_vec() }
    }

    pub(super) fn rom_read(&self, addr: u16) -> Result<u8> {
        self.rom
            .get(addr as usize)
            .copied()
            .ok_or(GbError::UnmappedAddress { addr })
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) -> Result<()> {
        Err(GbError::UnsupportedWrite {
            component: "rom-only cartridge",
            addr,
            value,
        })
    }

    pub(super) fn ram_read(&self, addr: u16) -> Result<u8> {
        Err(GbError::RamAbsent { addr })
    }

    pub(super) fn ram_write(&mut self, addr: u16, _value: u8) -> Result<()> {
        Err(GbError::RamAbsent { addr })
    }
}
