mod header;
mod mbc1;
mod rom_only;

pub use header::{CartridgeHeader, CartridgeType, Destination, LOGO};
pub use mbc1::BankingMode;

use mbc1::{Mbc1Cartridge, ROM_BANK_LEN};
use rom_only::{RomOnlyCartridge, ROM_ONLY_LEN};

use crate::error::{GbError, HeaderError, Result};

#[cfg(test)]
pub(crate) use header::tests::rom_image;

/// Supported bank controllers. Owns the ROM image and any external RAM.
pub enum Cartridge {
    RomOnly(RomOnlyCartridge),
    Mbc1(Mbc1Cartridge),
}

impl Cartridge {
    /// Parse the header and build the matching bank controller.
    pub fn from_rom(rom: &[u8]) -> Result<Self> {
        let header = CartridgeHeader::parse(rom)?;
        Self::with_header(rom, &header)
    }

    /// Build the bank controller for an already parsed header.
    pub fn with_header(rom: &[u8], header: &CartridgeHeader) -> Result<Self> {
        let cartridge = match header.cartridge_type {
            CartridgeType::RomOnly => {
                if rom.len() != ROM_ONLY_LEN {
                    return Err(HeaderError::RomLength {
                        len: rom.len(),
                        expected: "exactly 32 KiB",
                    }
                    .into());
                }
                Cartridge::RomOnly(RomOnlyCartridge::new(rom))
            }
            CartridgeType::Mbc1 => {
                if rom.is_empty() || rom.len() % ROM_BANK_LEN != 0 {
                    return Err(HeaderError::RomLength {
                        len: rom.len(),
                        expected: "a multiple of 16 KiB",
                    }
                    .into());
                }
                Cartridge::Mbc1(Mbc1Cartridge::new(rom, header.ram_kb))
            }
        };
        log::info!(
            "Cartridge '{}': {:?}, {} ROM banks, {} KiB RAM",
            header.title,
            header.cartridge_type,
            rom.len() / ROM_BANK_LEN,
            header.ram_kb
        );
        Ok(cartridge)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cartridge::RomOnly(_) => "rom-only cartridge",
            Cartridge::Mbc1(_) => "MBC1 cartridge",
        }
    }

    #[inline]
    pub fn is_responsible_for(addr: u16) -> bool {
        matches!(addr, 0x0000..=0x7FFF | 0xA000..=0xBFFF)
    }

    /// ROM bank currently visible at 0x4000–0x7FFF.
    pub fn switched_rom_bank(&self) -> usize {
        match self {
            Cartridge::RomOnly(_) => 1,
            Cartridge::Mbc1(m) => m.switched_rom_bank(),
        }
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        match addr {
            0x0000..=0x7FFF => self.rom_read(addr),
            0xA000..=0xBFFF => self.ram_read(addr),
            _ => Err(GbError::UnmappedAddress { addr }),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        match addr {
            0x0000..=0x7FFF => self.rom_write(addr, value),
            0xA000..=0xBFFF => self.ram_write(addr, value),
            _ => Err(GbError::UnmappedAddress { addr }),
        }
    }

    fn rom_read(&self, addr: u16) -> Result<u8> {
        match self {
            Cartridge::RomOnly(m) => m.rom_read(addr),
            Cartridge::Mbc1(m) => m.rom_read(addr),
        }
    }

    fn rom_write(&mut self, addr: u16, value: u8) -> Result<()> {
        match self {
            Cartridge::RomOnly(m) => m.rom_write(addr, value),
            Cartridge::Mbc1(m) => m.rom_write(addr, value),
        }
    }

    fn ram_read(&self, addr: u16) -> Result<u8> {
        match self {
            Cartridge::RomOnly(m) => m.ram_read(addr),
            Cartridge::Mbc1(m) => m.ram_read(addr),
        }
    }

    fn ram_write(&mut self, addr: u16, value: u8) -> Result<()> {
        match self {
            Cartridge::RomOnly(m) => m.ram_write(addr, value),
            Cartridge::Mbc1(m) => m.ram_write(addr, value),
        }
    }
}
