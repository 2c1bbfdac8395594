//! Factories for single-byte opcodes.

use super::{condition, place8, reg16_af, reg16_sp, Decoder, InstructionFactory};
use crate::cpu::instruction::{AluOp, Condition, Instruction, ShiftOp, Step};
use crate::cpu::operand::{Operand16, Operand8, Place16, Place8, HIGH_PAGE};
use crate::cpu::registers::{Reg16, Reg8};
use crate::cpu::scanner::ByteScanner;
use crate::error::Result;

pub(super) fn factories() -> Vec<Box<dyn InstructionFactory>> {
    vec![
        Box::new(Prefix),
        Box::new(Nop),
        Box::new(Stop),
        Box::new(Halt),
        Box::new(InterruptToggle),
        Box::new(CarryFlag),
        Box::new(AccumulatorAdjust),
        Box::new(RotateA),
        Box::new(IncDec8),
        Box::new(IncDec16),
        Box::new(AddHl),
        Box::new(AddSp),
        Box::new(LoadImm16),
        Box::new(LoadImm8),
        Box::new(LoadPairA),
        Box::new(LoadHlStep),
        Box::new(StoreSp),
        Box::new(JumpRelative),
        Box::new(LoadRegReg),
        Box::new(Alu),
        Box::new(Return),
        Box::new(ReturnCond),
        Box::new(Pop),
        Box::new(Push),
        Box::new(Jump),
        Box::new(JumpCond),
        Box::new(Call),
        Box::new(Restart),
        Box::new(LoadHigh),
        Box::new(LoadHighC),
        Box::new(LoadAbsA),
        Box::new(LoadSpHl),
        Box::new(Illegal),
    ]
}

/// Opcodes the DMG leaves undefined.
const ILLEGAL_OPCODES: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

struct Prefix;

impl InstructionFactory for Prefix {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0xCB
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        // The real cost depends on the second byte; see min_cycles.
        8
    }

    fn min_cycles(&self, scanner: &mut ByteScanner<'_>) -> Result<u32> {
        scanner.read_u8()?;
        let cycles = Decoder::prefixed().min_cycles(scanner);
        scanner.seek_offset(-1);
        cycles
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Decoder::prefixed().decode(scanner)
    }
}

struct Nop;

impl InstructionFactory for Nop {
    fn name(&self) -> &'static str {
        "nop"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0x00
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Ok(Instruction::Nop)
    }
}

struct Stop;

impl InstructionFactory for Stop {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0x10
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        // STOP is encoded as 10 00.
        scanner.read_u8()?;
        scanner.read_u8()?;
        Ok(Instruction::Stop)
    }
}

struct Halt;

impl InstructionFactory for Halt {
    fn name(&self) -> &'static str {
        "halt"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0x76
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Ok(Instruction::Halt)
    }
}

/// DI / EI.
struct InterruptToggle;

impl InstructionFactory for InterruptToggle {
    fn name(&self) -> &'static str {
        "interrupt-toggle"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xF3 | 0xFB)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        Ok(match scanner.read_u8()? {
            0xF3 => Instruction::Di,
            _ => Instruction::Ei,
        })
    }
}

/// SCF / CCF.
struct CarryFlag;

impl InstructionFactory for CarryFlag {
    fn name(&self) -> &'static str {
        "carry-flag"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x37 | 0x3F)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        Ok(match scanner.read_u8()? {
            0x37 => Instruction::Scf,
            _ => Instruction::Ccf,
        })
    }
}

/// DAA / CPL.
struct AccumulatorAdjust;

impl InstructionFactory for AccumulatorAdjust {
    fn name(&self) -> &'static str {
        "accumulator-adjust"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x27 | 0x2F)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        Ok(match scanner.read_u8()? {
            0x27 => Instruction::Daa,
            _ => Instruction::Cpl,
        })
    }
}

/// RLCA / RRCA / RLA / RRA.
struct RotateA;

impl InstructionFactory for RotateA {
    fn name(&self) -> &'static str {
        "rotate-a"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::RotateA(ShiftOp::ALL[(opcode >> 3) as usize]))
    }
}

/// INC r / DEC r, including (HL).
struct IncDec8;

impl InstructionFactory for IncDec8 {
    fn name(&self) -> &'static str {
        "inc-dec-8"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode < 0x40 && matches!(opcode & 0x07, 0x04 | 0x05)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if place8(opcode >> 3).is_memory() {
            12
        } else {
            4
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let place = place8(opcode >> 3);
        Ok(if opcode & 0x01 == 0 {
            Instruction::Inc8(place)
        } else {
            Instruction::Dec8(place)
        })
    }
}

/// INC rr / DEC rr.
struct IncDec16;

impl InstructionFactory for IncDec16 {
    fn name(&self) -> &'static str {
        "inc-dec-16"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode < 0x40 && matches!(opcode & 0x0F, 0x03 | 0x0B)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        8
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let reg = reg16_sp(opcode);
        Ok(if opcode & 0x08 == 0 {
            Instruction::Inc16(reg)
        } else {
            Instruction::Dec16(reg)
        })
    }
}

/// ADD HL,rr.
struct AddHl;

impl InstructionFactory for AddHl {
    fn name(&self) -> &'static str {
        "add-hl"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode < 0x40 && opcode & 0x0F == 0x09
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        8
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::AddHl(reg16_sp(opcode)))
    }
}

/// ADD SP,r8.
struct AddSp;

impl InstructionFactory for AddSp {
    fn name(&self) -> &'static str {
        "add-sp"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0xE8
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        16
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Ok(Instruction::AddSp(scanner.read_i8()?))
    }
}

/// LD rr,d16.
struct LoadImm16;

impl InstructionFactory for LoadImm16 {
    fn name(&self) -> &'static str {
        "load-imm-16"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode < 0x40 && opcode & 0x0F == 0x01
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        12
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Ld16 {
            dst: Place16::Reg(reg16_sp(opcode)),
            src: Operand16::Imm(scanner.read_u16()?),
        })
    }
}

/// LD r,d8 and LD (HL),d8.
struct LoadImm8;

impl InstructionFactory for LoadImm8 {
    fn name(&self) -> &'static str {
        "load-imm-8"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode < 0x40 && opcode & 0x07 == 0x06
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if place8(opcode >> 3).is_memory() {
            12
        } else {
            8
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Ld8 {
            dst: place8(opcode >> 3),
            src: Operand8::Imm(scanner.read_u8()?),
        })
    }
}

/// LD (BC),A / LD (DE),A / LD A,(BC) / LD A,(DE).
struct LoadPairA;

impl InstructionFactory for LoadPairA {
    fn name(&self) -> &'static str {
        "load-pair-a"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x02 | 0x12 | 0x0A | 0x1A)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        8
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let pointer = Place8::Ind(reg16_sp(opcode));
        let a = Place8::Reg(Reg8::A);
        Ok(if opcode & 0x08 == 0 {
            Instruction::Ld8 {
                dst: pointer,
                src: a.into(),
            }
        } else {
            Instruction::Ld8 {
                dst: a,
                src: pointer.into(),
            }
        })
    }
}

/// LD (HL+),A / LD A,(HL+) / LD (HL-),A / LD A,(HL-).
struct LoadHlStep;

impl InstructionFactory for LoadHlStep {
    fn name(&self) -> &'static str {
        "load-hl-step"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x22 | 0x2A | 0x32 | 0x3A)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        8
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::LdHlStep {
            to_memory: opcode & 0x08 == 0,
            step: if opcode < 0x30 { Step::Inc } else { Step::Dec },
        })
    }
}

/// LD (a16),SP.
struct StoreSp;

impl InstructionFactory for StoreSp {
    fn name(&self) -> &'static str {
        "store-sp"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0x08
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        20
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Ok(Instruction::Ld16 {
            dst: Place16::Addr(scanner.read_u16()?),
            src: Place16::Reg(Reg16::SP).into(),
        })
    }
}

/// JR r8 / JR cc,r8.
struct JumpRelative;

impl InstructionFactory for JumpRelative {
    fn name(&self) -> &'static str {
        "jump-relative"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0x18 | 0x20 | 0x28 | 0x30 | 0x38)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if opcode == 0x18 {
            12
        } else {
            8
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let cond = if opcode == 0x18 {
            Condition::ALWAYS
        } else {
            condition(opcode)
        };
        Ok(Instruction::Jr {
            cond,
            target: Operand16::Relative(scanner.read_i8()?),
        })
    }
}

/// LD r,r' (0x40–0x7F except HALT).
struct LoadRegReg;

impl InstructionFactory for LoadRegReg {
    fn name(&self) -> &'static str {
        "load-reg-reg"
    }

    fn matches(&self, opcode: u8) -> bool {
        (0x40..=0x7F).contains(&opcode) && opcode != 0x76
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if place8(opcode >> 3).is_memory() || place8(opcode).is_memory() {
            8
        } else {
            4
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Ld8 {
            dst: place8(opcode >> 3),
            src: place8(opcode).into(),
        })
    }
}

/// ADD/ADC/SUB/SBC/AND/XOR/OR/CP against a register, (HL) or d8.
struct Alu;

impl InstructionFactory for Alu {
    fn name(&self) -> &'static str {
        "alu"
    }

    fn matches(&self, opcode: u8) -> bool {
        (0x80..=0xBF).contains(&opcode) || (opcode >= 0xC0 && opcode & 0x07 == 0x06)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if opcode & 0x07 == 0x06 {
            8
        } else {
            4
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let op = AluOp::ALL[((opcode >> 3) & 0x07) as usize];
        let src = if opcode >= 0xC0 {
            Operand8::Imm(scanner.read_u8()?)
        } else {
            place8(opcode).into()
        };
        Ok(Instruction::Alu(op, src))
    }
}

/// RET / RETI.
struct Return;

impl InstructionFactory for Return {
    fn name(&self) -> &'static str {
        "return"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xC9 | 0xD9)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        16
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        Ok(match scanner.read_u8()? {
            0xC9 => Instruction::Ret(Condition::ALWAYS),
            _ => Instruction::Reti,
        })
    }
}

/// RET cc.
struct ReturnCond;

impl InstructionFactory for ReturnCond {
    fn name(&self) -> &'static str {
        "return-cond"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        8
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Ret(condition(opcode)))
    }
}

struct Pop;

impl InstructionFactory for Pop {
    fn name(&self) -> &'static str {
        "pop"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode >= 0xC0 && opcode & 0x0F == 0x01
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        12
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Pop(reg16_af(opcode)))
    }
}

struct Push;

impl InstructionFactory for Push {
    fn name(&self) -> &'static str {
        "push"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode >= 0xC0 && opcode & 0x0F == 0x05
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        16
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Push(reg16_af(opcode)))
    }
}

/// JP a16 / JP (HL).
struct Jump;

impl InstructionFactory for Jump {
    fn name(&self) -> &'static str {
        "jump"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xC3 | 0xE9)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if opcode == 0xC3 {
            16
        } else {
            4
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let target = match scanner.read_u8()? {
            0xC3 => Operand16::Imm(scanner.read_u16()?),
            _ => Place16::Reg(Reg16::HL).into(),
        };
        Ok(Instruction::Jp {
            cond: Condition::ALWAYS,
            target,
        })
    }
}

/// JP cc,a16.
struct JumpCond;

impl InstructionFactory for JumpCond {
    fn name(&self) -> &'static str {
        "jump-cond"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        12
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Jp {
            cond: condition(opcode),
            target: Operand16::Imm(scanner.read_u16()?),
        })
    }
}

/// CALL a16 / CALL cc,a16.
struct Call;

impl InstructionFactory for Call {
    fn name(&self) -> &'static str {
        "call"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xC4 | 0xCC | 0xCD | 0xD4 | 0xDC)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if opcode == 0xCD {
            24
        } else {
            12
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let cond = if opcode == 0xCD {
            Condition::ALWAYS
        } else {
            condition(opcode)
        };
        Ok(Instruction::Call {
            cond,
            target: scanner.read_u16()?,
        })
    }
}

/// RST n.
struct Restart;

impl InstructionFactory for Restart {
    fn name(&self) -> &'static str {
        "restart"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode >= 0xC0 && opcode & 0x07 == 0x07
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        16
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(Instruction::Rst(opcode & 0x38))
    }
}

/// LDH (a8),A / LDH A,(a8).
struct LoadHigh;

impl InstructionFactory for LoadHigh {
    fn name(&self) -> &'static str {
        "load-high"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xE0 | 0xF0)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        12
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let addr = Place8::Addr(HIGH_PAGE | u16::from(scanner.read_u8()?));
        Ok(load_a(opcode == 0xE0, addr))
    }
}

/// LD ($FF00+C),A / LD A,($FF00+C).
struct LoadHighC;

impl InstructionFactory for LoadHighC {
    fn name(&self) -> &'static str {
        "load-high-c"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xE2 | 0xF2)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        8
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        Ok(load_a(opcode == 0xE2, Place8::HighC))
    }
}

/// LD (a16),A / LD A,(a16).
struct LoadAbsA;

impl InstructionFactory for LoadAbsA {
    fn name(&self) -> &'static str {
        "load-abs-a"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xEA | 0xFA)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        16
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        let opcode = scanner.read_u8()?;
        let addr = Place8::Addr(scanner.read_u16()?);
        Ok(load_a(opcode == 0xEA, addr))
    }
}

/// LD HL,SP+r8 / LD SP,HL.
struct LoadSpHl;

impl InstructionFactory for LoadSpHl {
    fn name(&self) -> &'static str {
        "load-sp-hl"
    }

    fn matches(&self, opcode: u8) -> bool {
        matches!(opcode, 0xF8 | 0xF9)
    }

    fn cycles(&self, opcode: u8) -> u32 {
        if opcode == 0xF8 {
            12
        } else {
            8
        }
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        Ok(match scanner.read_u8()? {
            0xF8 => Instruction::LdHlSp(scanner.read_i8()?),
            _ => Instruction::Ld16 {
                dst: Place16::Reg(Reg16::SP),
                src: Place16::Reg(Reg16::HL).into(),
            },
        })
    }
}

struct Illegal;

impl InstructionFactory for Illegal {
    fn name(&self) -> &'static str {
        "illegal"
    }

    fn matches(&self, opcode: u8) -> bool {
        ILLEGAL_OPCODES.contains(&opcode)
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        Ok(Instruction::Illegal(scanner.read_u8()?))
    }
}

/// A store from A (`store`) or a load into A.
fn load_a(store: bool, other: Place8) -> Instruction {
    let a = Place8::Reg(Reg8::A);
    if store {
        Instruction::Ld8 {
            dst: other,
            src: a.into(),
        }
    } else {
        Instruction::Ld8 {
            dst: a,
            src: other.into(),
        }
    }
}
