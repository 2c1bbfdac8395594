//! Instruction operands.
//!
//! Operands are resolved against the live machine every time they are read
//! or written: `(HL)` reads HL at access time, never at decode time.

use std::fmt;

use super::registers::{Reg16, Reg8};
use crate::error::Result;
use crate::machine::Machine;

/// Base of the high page used by LDH.
pub const HIGH_PAGE: u16 = 0xFF00;

#[inline]
fn high_c(m: &Machine) -> u16 {
    HIGH_PAGE | u16::from(m.regs.get8(Reg8::C))
}

/// A readable and writable 8-bit location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Place8 {
    Reg(Reg8),
    /// The byte a register pair points at, e.g. `(HL)`.
    Ind(Reg16),
    /// An absolute address, e.g. `($C000)` or the LDH `($FF44)` form.
    Addr(u16),
    /// `($FF00+C)`.
    HighC,
}

impl Place8 {
    pub const HL: Place8 = Place8::Ind(Reg16::HL);

    pub fn read(&self, m: &Machine) -> Result<u8> {
        match *self {
            Place8::Reg(reg) => Ok(m.regs.get8(reg)),
            Place8::Ind(pair) => m.bus.read_byte(m.regs.get16(pair)),
            Place8::Addr(addr) => m.bus.read_byte(addr),
            Place8::HighC => m.bus.read_byte(high_c(m)),
        }
    }

    pub fn write(&self, m: &mut Machine, value: u8) -> Result<()> {
        match *self {
            Place8::Reg(reg) => {
                m.regs.set8(reg, value);
                Ok(())
            }
            Place8::Ind(pair) => {
                let addr = m.regs.get16(pair);
                m.bus.write_byte(addr, value)
            }
            Place8::Addr(addr) => m.bus.write_byte(addr, value),
            Place8::HighC => {
                let addr = high_c(m);
                m.bus.write_byte(addr, value)
            }
        }
    }

    /// Whether this operand goes through memory; those cost extra cycles.
    pub fn is_memory(&self) -> bool {
        !matches!(self, Place8::Reg(_))
    }
}

impl fmt::Display for Place8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place8::Reg(reg) => write!(f, "{reg}"),
            Place8::Ind(pair) => write!(f, "({pair})"),
            Place8::Addr(addr) => write!(f, "(${addr:04X})"),
            Place8::HighC => f.write_str("($FF00+C)"),
        }
    }
}

/// An 8-bit value an instruction reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand8 {
    Imm(u8),
    Place(Place8),
}

impl Operand8 {
    pub fn read(&self, m: &Machine) -> Result<u8> {
        match self {
            Operand8::Imm(value) => Ok(*value),
            Operand8::Place(place) => place.read(m),
        }
    }
}

impl From<Place8> for Operand8 {
    fn from(place: Place8) -> Self {
        Operand8::Place(place)
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand8::Imm(value) => write!(f, "${value:02X}"),
            Operand8::Place(place) => write!(f, "{place}"),
        }
    }
}

/// A readable and writable 16-bit location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Place16 {
    Reg(Reg16),
    /// Two bytes in memory, low byte first.
    Addr(u16),
}

impl Place16 {
    pub fn read(&self, m: &Machine) -> Result<u16> {
        match *self {
            Place16::Reg(reg) => Ok(m.regs.get16(reg)),
            Place16::Addr(addr) => m.bus.read_word(addr),
        }
    }

    pub fn write(&self, m: &mut Machine, value: u16) -> Result<()> {
        match *self {
            Place16::Reg(reg) => {
                m.regs.set16(reg, value);
                Ok(())
            }
            Place16::Addr(addr) => m.bus.write_word(addr, value),
        }
    }
}

impl fmt::Display for Place16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place16::Reg(reg) => write!(f, "{reg}"),
            Place16::Addr(addr) => write!(f, "(${addr:04X})"),
        }
    }
}

/// A 16-bit value an instruction reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand16 {
    Imm(u16),
    /// Offset from the end of a two-byte JR, resolved against the live PC.
    Relative(i8),
    Place(Place16),
}

impl Operand16 {
    pub fn read(&self, m: &Machine) -> Result<u16> {
        match self {
            Operand16::Imm(value) => Ok(*value),
            Operand16::Relative(offset) => Ok(m
                .regs
                .pc()
                .wrapping_add(2)
                .wrapping_add_signed(i16::from(*offset))),
            Operand16::Place(place) => place.read(m),
        }
    }
}

impl From<Place16> for Operand16 {
    fn from(place: Place16) -> Self {
        Operand16::Place(place)
    }
}

impl fmt::Display for Operand16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand16::Imm(value) => write!(f, "${value:04X}"),
            Operand16::Relative(offset) => write!(f, "{offset:+}"),
            Operand16::Place(place) => write!(f, "{place}"),
        }
    }
}
