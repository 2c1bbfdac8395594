use std::fmt;

/// Reasons a cartridge header is rejected before emulation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The image is too short to contain a header.
    Truncated { len: usize },
    /// The 48-byte logo at 0x0104 does not match.
    LogoMismatch { offset: usize, found: u8 },
    /// The game declares itself a color title (0x0143 == 0x80).
    ColorUnsupported,
    /// One of the two licensee nibble bytes is not a nibble.
    InvalidLicenseeNibble { offset: usize, value: u8 },
    /// The game requires the Super variant (0x0146 == 0x03).
    SuperUnsupported,
    /// Any other value at 0x0146.
    InvalidSuperFlag(u8),
    /// Cartridge types other than ROM-only and controller 1.
    UnsupportedCartridgeType(u8),
    InvalidRomSize(u8),
    InvalidRamSize(u8),
    InvalidDestination(u8),
    /// The stored complement byte disagrees with the computed one.
    ComplementMismatch { stored: u8, computed: u8 },
    /// The image length does not fit the bank controller variant.
    RomLength { len: usize, expected: &'static str },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Truncated { len } => {
                write!(f, "ROM image of {len} bytes is too short for a header")
            }
            HeaderError::LogoMismatch { offset, found } => {
                write!(f, "logo mismatch at {offset:#06X} (found {found:#04X})")
            }
            HeaderError::ColorUnsupported => write!(f, "color games are not supported"),
            HeaderError::InvalidLicenseeNibble { offset, value } => {
                write!(f, "licensee byte at {offset:#06X} is not a nibble ({value:#04X})")
            }
            HeaderError::SuperUnsupported => write!(f, "Super variant games are not supported"),
            HeaderError::InvalidSuperFlag(value) => {
                write!(f, "invalid Super variant flag {value:#04X}")
            }
            HeaderError::UnsupportedCartridgeType(value) => {
                write!(f, "unsupported cartridge type {value:#04X}")
            }
            HeaderError::InvalidRomSize(value) => write!(f, "invalid ROM size code {value:#04X}"),
            HeaderError::InvalidRamSize(value) => write!(f, "invalid RAM size code {value:#04X}"),
            HeaderError::InvalidDestination(value) => {
                write!(f, "invalid destination code {value:#04X}")
            }
            HeaderError::ComplementMismatch { stored, computed } => write!(
                f,
                "header complement check failed (stored {stored:#04X}, computed {computed:#04X})"
            ),
            HeaderError::RomLength { len, expected } => {
                write!(f, "ROM image of {len} bytes, expected {expected}")
            }
        }
    }
}

impl std::error::Error for HeaderError {}

/// Fatal conditions raised while building or running a machine.
///
/// Nothing in the core retries; every variant ends the session and carries
/// enough context to diagnose the failure without re-running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GbError {
    Header(HeaderError),

    /// No bus component claims the address.
    UnmappedAddress { addr: u16 },
    /// More than one bus component claims the address.
    AmbiguousAddress { addr: u16, owners: Vec<&'static str> },
    /// No factory in the named decoder recognises the opcode.
    UnknownOpcode { decoder: &'static str, opcode: u8 },
    /// Several factories in the named decoder recognise the opcode.
    AmbiguousOpcode {
        decoder: &'static str,
        opcode: u8,
        factories: Vec<&'static str>,
    },
    /// More than one I/O register table entry backs the slot (or none does).
    IoRegisterCoverage { addr: u16, registers: Vec<&'static str> },

    /// The byte source ran out while decoding.
    EndOfStream { position: usize },
    /// External RAM accessed while the latch is off.
    RamDisabled { addr: u16 },
    /// External RAM accessed on a cartridge that has none, or past its end.
    RamAbsent { addr: u16 },
    /// A write the owning component does not support.
    UnsupportedWrite {
        component: &'static str,
        addr: u16,
        value: u8,
    },
    /// Any other operation the owning component does not support.
    Unsupported {
        component: &'static str,
        operation: &'static str,
    },
    ReadOnlyRegister {
        name: &'static str,
        addr: u16,
        value: u8,
    },
    IllegalOpcode { opcode: u8, pc: u16 },
    HaltRequested { pc: u16 },
}

impl fmt::Display for GbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GbError::Header(err) => write!(f, "invalid cartridge header: {err}"),
            GbError::UnmappedAddress { addr } => {
                write!(f, "no memory component owns address {addr:#06X}")
            }
            GbError::AmbiguousAddress { addr, owners } => write!(
                f,
                "address {addr:#06X} is claimed by several components: {}",
                owners.join(", ")
            ),
            GbError::UnknownOpcode { decoder, opcode } => {
                write!(f, "{decoder} decoder has no factory for opcode {opcode:#04X}")
            }
            GbError::AmbiguousOpcode {
                decoder,
                opcode,
                factories,
            } => write!(
                f,
                "{decoder} decoder has several factories for opcode {opcode:#04X}: {}",
                factories.join(", ")
            ),
            GbError::IoRegisterCoverage { addr, registers } => write!(
                f,
                "I/O slot {addr:#06X} must be backed by exactly one register, found [{}]",
                registers.join(", ")
            ),
            GbError::EndOfStream { position } => {
                write!(f, "byte stream ended at position {position:#06X}")
            }
            GbError::RamDisabled { addr } => {
                write!(f, "external RAM access at {addr:#06X} while RAM is disabled")
            }
            GbError::RamAbsent { addr } => {
                write!(f, "external RAM access at {addr:#06X} but no RAM is present")
            }
            GbError::UnsupportedWrite {
                component,
                addr,
                value,
            } => write!(
                f,
                "{component} does not support writing {value:#04X} to {addr:#06X}"
            ),
            GbError::Unsupported {
                component,
                operation,
            } => write!(f, "{component} does not support {operation}"),
            GbError::ReadOnlyRegister { name, addr, value } => write!(
                f,
                "illegal write of {value:#04X} to read-only register {name} ({addr:#06X})"
            ),
            GbError::IllegalOpcode { opcode, pc } => {
                write!(f, "illegal opcode {opcode:#04X} at {pc:#06X}")
            }
            GbError::HaltRequested { pc } => write!(f, "HALT at {pc:#06X} is not implemented"),
        }
    }
}

impl std::error::Error for GbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GbError::Header(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HeaderError> for GbError {
    fn from(err: HeaderError) -> Self {
        GbError::Header(err)
    }
}

pub type Result<T, E = GbError> = std::result::Result<T, E>;
