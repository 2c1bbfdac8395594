//! Factories for the byte after the 0xCB prefix.
//!
//! Cycle counts include the prefix byte.

use super::{place8, InstructionFactory};
use crate::cpu::instruction::{Instruction, ShiftOp};
use crate::cpu::scanner::ByteScanner;
use crate::error::Result;

pub(super) fn factories() -> Vec<Box<dyn InstructionFactory>> {
    vec![
        Box::new(Rotate),
        Box::new(Shift),
        Box::new(Swap),
        Box::new(BitTest),
        Box::new(BitReset),
        Box::new(BitSet),
    ]
}

/// 8 for a register operand, `memory` for (HL).
#[inline]
fn operand_cycles(opcode: u8, memory: u32) -> u32 {
    if place8(opcode).is_memory() {
        memory
    } else {
        8
    }
}

fn shift(scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
    let opcode = scanner.read_u8()?;
    let op = ShiftOp::ALL[(opcode >> 3) as usize];
    Ok(Instruction::Shift(op, place8(opcode)))
}

/// RLC, RRC, RL, RR.
struct Rotate;

impl InstructionFactory for Rotate {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode <= 0x1F
    }

    fn cycles(&self, opcode: u8) -> u32 {
        operand_cycles(opcode, 16)
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        shift(scanner)
    }
}

/// SLA, SRA, SRL.
struct Shift;

impl InstructionFactory for Shift {
    fn name(&self) -> &'static str {
        "shift"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x20..=0x2F | 0x38..=0x3F)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        operand_cycles(opcode, 16)
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        shift(scanner)
    }
}

struct Swap;

impl InstructionFactory for Swap {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn matches(&self, opcode: u8) -> bool {
        (0x30..=0x37).contains(&opcode)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        operand_cycles(opcode, 16)
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        shift(scanner)
    }
}

struct BitTest;

impl InstructionFactory for BitTest {
    fn name(&self) -> &'static str {
        "bit"
    }

    fn matches(&self, opcode: u8) -> bool {
        (0x40..=0x7F).contains(&opcode)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        // BIT only reads (HL), so it is cheaper than RES/SET.
        operand_cycles(opcode, 12)
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Bit((opcode >> 3) & 0x07, place8(opcode)))
    }
}

struct BitReset;

impl InstructionFactory for BitReset {
    fn name(&self) -> &'static str {
        "res"
    }

    fn matches(&self, opcode: u8) -> bool {
        (0x80..=0xBF).contains(&opcode)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        operand_cycles(opcode, 16)
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Res((opcode >> 3) & 0x07, place8(opcode)))
    }
}

struct BitSet;

impl InstructionFactory for BitSet {
    fn name(&self) -> &'static str {
        "set"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode >= 0xC0
    }

    fn cycles(&self, opcode: u8) -> u32 {
        operand_cycles(opcode, 16)
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Set((opcode >> 3) & 0x07, place8(opcode)))
    }
}
