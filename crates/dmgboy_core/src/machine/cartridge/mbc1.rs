use crate::error::{GbError, Result};

pub(super) const ROM_BANK_LEN: usize = 0x4000;
const RAM_BANK_LEN: usize = 0x2000;

/// How the shared 2-bit register is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankingMode {
    /// Up to 125 ROM banks; the 2-bit field supplies ROM bank bits 5–6 and
    /// RAM stays on bank 0.
    LargeRom,
    /// Up to four 8 KiB RAM banks; ROM banking uses the low 5 bits only.
    LargeRam,
}

/// Controller-1 cartridge state.
pub struct Mbc1Cartridge {
    rom: Vec<u8>,
    ram: Vec<u8>,
    num_rom_banks: usize,
    rom_bank_low5: u8,
    bank_high2: u8,
    ram_enable: bool,
    mode: BankingMode,
}

impl Mbc1Cartridge {
    pub(super) fn new(rom: &[u8], ram_kb: usize) -> Self {
        Self {
            rom: rom.to_vec(),
            ram: vec![0; ram_kb * 1024],
            num_rom_banks: (rom.len() / ROM_BANK_LEN).max(1),
            rom_bank_low5: 1, // bank 1 by default
            bank_high2: 0,
            ram_enable: false,
            mode: BankingMode::LargeRom,
        }
    }

    /// Bank currently mapped at 0x4000–0x7FFF.
    pub(super) fn switched_rom_bank(&self) -> usize {
        let mut bank = self.rom_bank_low5 as usize;
        if self.mode == BankingMode::LargeRom {
            bank |= (self.bank_high2 as usize) << 5;
        }
        bank % self.num_rom_banks
    }

    pub(super) fn ram_bank(&self) -> usize {
        match self.mode {
            BankingMode::LargeRom => 0,
            BankingMode::LargeRam => self.bank_high2 as usize,
        }
    }

    pub(super) fn rom_read(&self, addr: u16) -> Result<u8> {
        let bank = if addr < 0x4000 {
            0
        } else {
            self.switched_rom_bank()
        };
        let index = bank * ROM_BANK_LEN + (addr as usize % ROM_BANK_LEN);
        self.rom
            .get(index)
            .copied()
            .ok_or(GbError::UnmappedAddress { addr })
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) -> Result<()> {
        match addr {
            0x0000..=0x1FFF => {
                self.ram_enable = (value & 0x0F) == 0x0A;
                log::debug!("MBC1 RAM {}", if self.ram_enable { "enabled" } else { "disabled" });
            }
            0x2000..=0x3FFF => {
                // Bank 0 cannot be selected through this window: 0 reads as 1.
                self.rom_bank_low5 = (value & 0x1F).max(1);
                log::debug!("MBC1 ROM bank low bits = {:#04X}", self.rom_bank_low5);
            }
            0x4000..=0x5FFF => {
                self.bank_high2 = value & 0x03;
                log::debug!("MBC1 shared bank bits = {}", self.bank_high2);
            }
            0x6000..=0x7FFF => {
                self.mode = if value & 0x01 == 0 {
                    BankingMode::LargeRom
                } else {
                    BankingMode::LargeRam
                };
                log::debug!("MBC1 mode = {:?}", self.mode);
            }
            _ => {
                return Err(GbError::UnsupportedWrite {
                    component: "MBC1 cartridge",
                    addr,
                    value,
                })
            }
        }
        Ok(())
    }

    fn ram_index(&self, addr: u16) -> Result<usize> {
        if self.ram.is_empty() {
            return Err(GbError::RamAbsent { addr });
        }
        if !self.ram_enable {
            return Err(GbError::RamDisabled { addr });
        }
        let index = self.ram_bank() * RAM_BANK_LEN + (addr as usize - 0xA000);
        if index >= self.ram.len() {
            return Err(GbError::RamAbsent { addr });
        }
        Ok(index)
    }

    pub(super) fn ram_read(&self, addr: u16) -> Result<u8> {
        let index = self.ram_index(addr)?;
        Ok(self.ram[index])
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) -> Result<()> {
        let index = self.ram_index(addr)?;
        self.ram[index] = value;
        Ok(())
    }

    #[cfg(test)]
    pub(super) fn mode(&self) -> BankingMode {
        self.mode
    }
}
