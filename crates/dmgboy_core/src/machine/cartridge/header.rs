use crate::error::HeaderError;

const LOGO_START: usize = 0x0104;
const TITLE_START: usize = 0x0134;
const TITLE_LEN: usize = 15;
const COLOR_FLAG: usize = 0x0143;
const LICENSEE_HIGH: usize = 0x0144;
const LICENSEE_LOW: usize = 0x0145;
const SUPER_FLAG: usize = 0x0146;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const DESTINATION: usize = 0x014A;
const OLD_LICENSEE: usize = 0x014B;
const MASK_ROM_VERSION: usize = 0x014C;
const COMPLEMENT: usize = 0x014D;
const CHECKSUM: usize = 0x014E;

/// Offset just past the header; images shorter than this are rejected.
pub const HEADER_END: usize = 0x0150;

/// The bitmap every licensed cartridge carries at 0x0104.
pub const LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartridgeType {
    RomOnly,
    Mbc1,
}

impl CartridgeType {
    fn from_code(code: u8) -> Result<Self, HeaderError> {
        match code {
            0x00 => Ok(CartridgeType::RomOnly),
            0x01 => Ok(CartridgeType::Mbc1),
            other => Err(HeaderError::UnsupportedCartridgeType(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Japanese,
    NonJapanese,
}

/// Parsed view of the cartridge header (0x0100–0x014F).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub licensee: u8,
    pub cartridge_type: CartridgeType,
    pub rom_banks: usize,
    pub ram_kb: usize,
    pub destination: Destination,
    pub old_licensee: u8,
    pub mask_rom_version: u8,
    pub complement: u8,
    /// Stored big-endian; never validated.
    pub checksum: u16,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, HeaderError> {
        if rom.len() < HEADER_END {
            return Err(HeaderError::Truncated { len: rom.len() });
        }

        for (i, expected) in LOGO.iter().enumerate() {
            let offset = LOGO_START + i;
            if rom[offset] != *expected {
                return Err(HeaderError::LogoMismatch {
                    offset,
                    found: rom[offset],
                });
            }
        }

        let raw_title = &rom[TITLE_START..TITLE_START + TITLE_LEN];
        let title_end = raw_title
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(raw_title.len());
        let title = String::from_utf8_lossy(&raw_title[..title_end]).into_owned();

        if rom[COLOR_FLAG] == 0x80 {
            return Err(HeaderError::ColorUnsupported);
        }

        let licensee = (nibble(rom, LICENSEE_HIGH)? << 4) | nibble(rom, LICENSEE_LOW)?;

        match rom[SUPER_FLAG] {
            0x00 => {}
            0x03 => return Err(HeaderError::SuperUnsupported),
            other => return Err(HeaderError::InvalidSuperFlag(other)),
        }

        let cartridge_type = CartridgeType::from_code(rom[CARTRIDGE_TYPE])?;
        let rom_banks = rom_banks(rom[ROM_SIZE])?;
        let ram_kb = ram_kb(rom[RAM_SIZE])?;

        let destination = match rom[DESTINATION] {
            0x00 => Destination::Japanese,
            0x01 => Destination::NonJapanese,
            other => return Err(HeaderError::InvalidDestination(other)),
        };

        let stored = rom[COMPLEMENT];
        let computed = complement(rom);
        if stored != computed {
            return Err(HeaderError::ComplementMismatch { stored, computed });
        }

        Ok(Self {
            title,
            licensee,
            cartridge_type,
            rom_banks,
            ram_kb,
            destination,
            old_licensee: rom[OLD_LICENSEE],
            mask_rom_version: rom[MASK_ROM_VERSION],
            complement: stored,
            checksum: u16::from_be_bytes([rom[CHECKSUM], rom[CHECKSUM + 1]]),
        })
    }
}

/// `0xE7 - sum(rom[0x134..0x14D])`, wrapping.
pub fn complement(rom: &[u8]) -> u8 {
    rom[TITLE_START..COMPLEMENT]
        .iter()
        .fold(0xE7u8, |acc, &b| acc.wrapping_sub(b))
}

fn nibble(rom: &[u8], offset: usize) -> Result<u8, HeaderError> {
    let value = rom[offset];
    if value < 0x10 {
        Ok(value)
    } else {
        Err(HeaderError::InvalidLicenseeNibble { offset, value })
    }
}

fn rom_banks(code: u8) -> Result<usize, HeaderError> {
    match code {
        0x00..=0x06 => Ok(2 << code),
        0x52 => Ok(72),
        0x53 => Ok(80),
        0x54 => Ok(96),
        other => Err(HeaderError::InvalidRomSize(other)),
    }
}

fn ram_kb(code: u8) -> Result<usize, HeaderError> {
    match code {
        0 => Ok(0),
        1..=4 => Ok(1 << (2 * code as usize - 1)),
        other => Err(HeaderError::InvalidRamSize(other)),
    }
}
