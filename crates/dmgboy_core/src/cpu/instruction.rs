use std::fmt;

use super::operand::{Operand16, Operand8, Place16, Place8};
use super::registers::Reg16;

/// 8-bit accumulator operations, in opcode order (bits 3–5 of 0x80–0xBF).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub const ALL: [AluOp; 8] = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

/// Rotates and shifts, in CB opcode order (bits 3–5 of 0x00–0x3F).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub const ALL: [ShiftOp; 8] = [
        ShiftOp::Rlc,
        ShiftOp::Rrc,
        ShiftOp::Rl,
        ShiftOp::Rr,
        ShiftOp::Sla,
        ShiftOp::Sra,
        ShiftOp::Swap,
        ShiftOp::Srl,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        }
    }
}

/// Which flag a conditional transfer tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CondFlag {
    Zero,
    Carry,
    Always,
}

/// Transfer happens when the selected flag differs from `negated`
/// (always, for `CondFlag::Always`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Condition {
    pub flag: CondFlag,
    pub negated: bool,
}

impl Condition {
    pub const ALWAYS: Condition = Condition {
        flag: CondFlag::Always,
        negated: false,
    };
    pub const NZ: Condition = Condition {
        flag: CondFlag::Zero,
        negated: true,
    };
    pub const Z: Condition = Condition {
        flag: CondFlag::Zero,
        negated: false,
    };
    pub const NC: Condition = Condition {
        flag: CondFlag::Carry,
        negated: true,
    };
    pub const C: Condition = Condition {
        flag: CondFlag::Carry,
        negated: false,
    };

    pub fn is_conditional(&self) -> bool {
        self.flag != CondFlag::Always
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.flag {
            CondFlag::Zero => "Z",
            CondFlag::Carry => "C",
            CondFlag::Always => return Ok(()),
        };
        if self.negated {
            f.write_str("N")?;
        }
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Inc,
    Dec,
}

/// A decoded instruction with its operands.
///
/// Values are immutable and carry no identity; two decodes of the same
/// bytes compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    Daa,
    Cpl,
    Scf,
    Ccf,
    /// RLCA, RRCA, RLA and RRA.
    RotateA(ShiftOp),
    Inc8(Place8),
    Dec8(Place8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    AddSp(i8),
    Alu(AluOp, Operand8),
    Ld8 {
        dst: Place8,
        src: Operand8,
    },
    Ld16 {
        dst: Place16,
        src: Operand16,
    },
    /// `LD (HL+),A`, `LD A,(HL-)` and friends.
    LdHlStep {
        to_memory: bool,
        step: Step,
    },
    /// `LD HL,SP+r8`.
    LdHlSp(i8),
    Jp {
        cond: Condition,
        target: Operand16,
    },
    Jr {
        cond: Condition,
        target: Operand16,
    },
    Call {
        cond: Condition,
        target: u16,
    },
    Ret(Condition),
    Reti,
    Rst(u8),
    Push(Reg16),
    Pop(Reg16),
    Shift(ShiftOp, Place8),
    Bit(u8, Place8),
    Res(u8, Place8),
    Set(u8, Place8),
    /// One of the opcodes the DMG leaves undefined.
    Illegal(u8),
}

/// `JP NZ,$1234` / `JP $1234`.
fn write_branch(f: &mut fmt::Formatter<'_>, name: &str, cond: &Condition) -> fmt::Result {
    if cond.is_conditional() {
        write!(f, "{name} {cond},")
    } else {
        write!(f, "{name} ")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop => f.write_str("NOP"),
            Instruction::Stop => f.write_str("STOP"),
            Instruction::Halt => f.write_str("HALT"),
            Instruction::Di => f.write_str("DI"),
            Instruction::Ei => f.write_str("EI"),
            Instruction::Daa => f.write_str("DAA"),
            Instruction::Cpl => f.write_str("CPL"),
            Instruction::Scf => f.write_str("SCF"),
            Instruction::Ccf => f.write_str("CCF"),
            Instruction::RotateA(op) => write!(f, "{}A", op.mnemonic()),
            Instruction::Inc8(place) => write!(f, "INC {place}"),
            Instruction::Dec8(place) => write!(f, "DEC {place}"),
            Instruction::Inc16(reg) => write!(f, "INC {reg}"),
            Instruction::Dec16(reg) => write!(f, "DEC {reg}"),
            Instruction::AddHl(reg) => write!(f, "ADD HL,{reg}"),
            Instruction::AddSp(offset) => write!(f, "ADD SP,{offset:+}"),
            Instruction::Alu(op, src) => write!(f, "{}{src}", op.mnemonic()),
            Instruction::Ld8 { dst, src } => write!(f, "LD {dst},{src}"),
            Instruction::Ld16 { dst, src } => write!(f, "LD {dst},{src}"),
            Instruction::LdHlStep { to_memory, step } => {
                let hl = match step {
                    Step::Inc => "(HL+)",
                    Step::Dec => "(HL-)",
                };
                if *to_memory {
                    write!(f, "LD {hl},A")
                } else {
                    write!(f, "LD A,{hl}")
                }
            }
            Instruction::LdHlSp(offset) => write!(f, "LD HL,SP{offset:+}"),
            Instruction::Jp { cond, target } => {
                write_branch(f, "JP", cond)?;
                write!(f, "{target}")
            }
            Instruction::Jr { cond, target } => {
                write_branch(f, "JR", cond)?;
                write!(f, "{target}")
            }
            Instruction::Call { cond, target } => {
                write_branch(f, "CALL", cond)?;
                write!(f, "${target:04X}")
            }
            Instruction::Ret(cond) if cond.is_conditional() => write!(f, "RET {cond}"),
            Instruction::Ret(_) => f.write_str("RET"),
            Instruction::Reti => f.write_str("RETI"),
            Instruction::Rst(vector) => write!(f, "RST ${vector:02X}"),
            Instruction::Push(reg) => write!(f, "PUSH {reg}"),
            Instruction::Pop(reg) => write!(f, "POP {reg}"),
            Instruction::Shift(op, place) => write!(f, "{} {place}", op.mnemonic()),
            Instruction::Bit(bit, place) => write!(f, "BIT {bit},{place}"),
            Instruction::Res(bit, place) => write!(f, "RES {bit},{place}"),
            Instruction::Set(bit, place) => write!(f, "SET {bit},{place}"),
            Instruction::Illegal(opcode) => write!(f, "ILLEGAL ${opcode:02X}"),
        }
    }
}
