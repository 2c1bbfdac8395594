//! Two-level opcode decoder.
//!
//! A [`Decoder`] is an ordered table of [`InstructionFactory`] values. The
//! root table handles single-byte opcodes; its 0xCB factory hands the next
//! byte to the prefixed table. Every opcode must be claimed by exactly one
//! factory in the table that sees it.

mod prefixed;
mod root;

use lazy_static::lazy_static;

use super::instruction::{Condition, Instruction};
use super::operand::Place8;
use super::registers::{Reg16, Reg8};
use super::scanner::ByteScanner;
use crate::error::{GbError, Result};

/// Recognises a family of opcodes and turns their bytes into instructions.
pub trait InstructionFactory: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, opcode: u8) -> bool;

    /// Documented minimum cycles for a matching opcode.
    fn cycles(&self, opcode: u8) -> u32;

    /// Minimum cycles for the instruction at the scanner. Must leave the
    /// scanner where it found it.
    fn min_cycles(&self, scanner: &mut ByteScanner<'_>) -> Result<u32> {
        Ok(self.cycles(scanner.peek()?))
    }

    /// Consume the instruction's bytes, opcode included.
    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction>;
}

/// A decoded instruction together with what it cost to find it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub instruction: Instruction,
    pub min_cycles: u32,
    /// Bytes consumed, prefix included.
    pub length: usize,
}

pub struct Decoder {
    name: &'static str,
    factories: Vec<Box<dyn InstructionFactory>>,
}

lazy_static! {
    static ref PREFIXED: Decoder = Decoder::new("prefixed", prefixed::factories());
    static ref ROOT: Decoder = Decoder::new("root", root::factories());
}

impl Decoder {
    pub fn new(name: &'static str, factories: Vec<Box<dyn InstructionFactory>>) -> Self {
        Self { name, factories }
    }

    /// Table for single-byte opcodes (and the 0xCB prefix).
    pub fn root() -> &'static Decoder {
        &ROOT
    }

    /// Table for the byte following 0xCB.
    pub fn prefixed() -> &'static Decoder {
        &PREFIXED
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The one factory that claims `opcode`.
    pub fn factory_for(&self, opcode: u8) -> Result<&dyn InstructionFactory> {
        let mut found = self.factories.iter().filter(|f| f.matches(opcode));
        match (found.next(), found.next()) {
            (Some(factory), None) => Ok(factory.as_ref()),
            (None, _) => Err(GbError::UnknownOpcode {
                decoder: self.name,
                opcode,
            }),
            (Some(first), Some(second)) => Err(GbError::AmbiguousOpcode {
                decoder: self.name,
                opcode,
                factories: [first, second]
                    .into_iter()
                    .chain(found)
                    .map(|f| f.name())
                    .collect(),
            }),
        }
    }

    /// Non-consuming: the scanner is where it was when this returns.
    pub fn min_cycles(&self, scanner: &mut ByteScanner<'_>) -> Result<u32> {
        let opcode = scanner.peek()?;
        self.factory_for(opcode)?.min_cycles(scanner)
    }

    pub fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.peek()?;
        self.factory_for(opcode)?.decode(scanner)
    }

    /// Cycle lookahead followed by the consuming decode.
    pub fn decode_next(&self, scanner: &mut ByteScanner<'_>) -> Result<Decoded> {
        let start = scanner.position();
        let min_cycles = self.min_cycles(scanner)?;
        let instruction = self.decode(scanner)?;
        Ok(Decoded {
            instruction,
            min_cycles,
            length: scanner.position() - start,
        })
    }
}

/// 8-bit operand encoded in three bits: B, C, D, E, H, L, (HL), A.
pub(crate) fn place8(index: u8) -> Place8 {
    match index & 0x07 {
        0 => Place8::Reg(Reg8::B),
        1 => Place8::Reg(Reg8::C),
        2 => Place8::Reg(Reg8::D),
        3 => Place8::Reg(Reg8::E),
        4 => Place8::Reg(Reg8::H),
        5 => Place8::Reg(Reg8::L),
        6 => Place8::HL,
        _ => Place8::Reg(Reg8::A),
    }
}

/// Register pair in bits 4–5 for INC/DEC/ADD/LD: BC, DE, HL, SP.
pub(crate) fn reg16_sp(opcode: u8) -> Reg16 {
    match (opcode >> 4) & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

/// Register pair in bits 4–5 for PUSH/POP: BC, DE, HL, AF.
pub(crate) fn reg16_af(opcode: u8) -> Reg16 {
    match (opcode >> 4) & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::AF,
    }
}

/// Condition in bits 3–4: NZ, Z, NC, C.
pub(crate) fn condition(opcode: u8) -> Condition {
    match (opcode >> 3) & 0x03 {
        0 => Condition::NZ,
        1 => Condition::Z,
        2 => Condition::NC,
        _ => Condition::C,
    }
}

#[cfg(test)]
mod tests;
