use super::instruction::{AluOp, CondFlag, Condition, Instruction, Step};
use super::registers::{Reg16, Registers};
use crate::error::{GbError, Result};
use crate::machine::Machine;

/// Extra cycles for taken conditional branches.
const JUMP_TAKEN_CYCLES: u32 = 4;
const CALL_TAKEN_CYCLES: u32 = 12;
const RET_TAKEN_CYCLES: u32 = 12;

/// What happened while executing one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Cycles on top of the decoder's minimum (taken branches).
    pub extra_cycles: u32,
    /// PC was set by the instruction and must not fall through, even if the
    /// target is the instruction itself.
    pub jumped: bool,
}

impl Outcome {
    pub const NEXT: Outcome = Outcome {
        extra_cycles: 0,
        jumped: false,
    };

    fn jumped(cond: &Condition, taken_cycles: u32) -> Self {
        Outcome {
            extra_cycles: if cond.is_conditional() { taken_cycles } else { 0 },
            jumped: true,
        }
    }
}

impl Condition {
    pub fn holds(&self, regs: &Registers) -> bool {
        match self.flag {
            CondFlag::Zero => regs.z() != self.negated,
            CondFlag::Carry => regs.c() != self.negated,
            CondFlag::Always => true,
        }
    }
}

impl Machine {
    /// Push a 16-bit value: high byte at SP-1, low byte at SP-2.
    pub(crate) fn push_u16(&mut self, value: u16) -> Result<()> {
        let [high, low] = value.to_be_bytes();
        let mut sp = self.regs.sp().wrapping_sub(1);
        self.bus.write_byte(sp, high)?;
        sp = sp.wrapping_sub(1);
        self.bus.write_byte(sp, low)?;
        self.regs.set_sp(sp);
        Ok(())
    }

    pub(crate) fn pop_u16(&mut self) -> Result<u16> {
        let sp = self.regs.sp();
        let value = self.bus.read_word(sp)?;
        self.regs.set_sp(sp.wrapping_add(2));
        Ok(value)
    }
}

impl Instruction {
    /// Apply the instruction to `m`.
    ///
    /// PC still points at the instruction itself; falling through to the
    /// next one is left to the caller unless the outcome says `jumped`.
    pub fn execute(&self, m: &mut Machine) -> Result<Outcome> {
        let pc = m.regs.pc();
        match *self {
            Instruction::Nop => {}
            Instruction::Stop => {
                return Err(GbError::Unsupported {
                    component: "cpu",
                    operation: "STOP",
                })
            }
            Instruction::Halt => return Err(GbError::HaltRequested { pc }),
            Instruction::Di => m.interrupts_enabled = false,
            Instruction::Ei => m.interrupts_enabled = true,
            Instruction::Daa => m.regs.alu_daa(),
            Instruction::Cpl => m.regs.alu_cpl(),
            Instruction::Scf => m.regs.alu_set_carry(true),
            Instruction::Ccf => {
                let carry = !m.regs.c();
                m.regs.alu_set_carry(carry);
            }
            Instruction::RotateA(op) => {
                let a = m.regs.a();
                let result = m.regs.alu_shift(op, a);
                m.regs.set_a(result);
            }
            Instruction::Inc8(place) => {
                let value = place.read(m)?;
                let result = m.regs.alu_inc8(value);
                place.write(m, result)?;
            }
            Instruction::Dec8(place) => {
                let value = place.read(m)?;
                let result = m.regs.alu_dec8(value);
                place.write(m, result)?;
            }
            Instruction::Inc16(reg) => {
                let value = m.regs.get16(reg).wrapping_add(1);
                m.regs.set16(reg, value);
            }
            Instruction::Dec16(reg) => {
                let value = m.regs.get16(reg).wrapping_sub(1);
                m.regs.set16(reg, value);
            }
            Instruction::AddHl(reg) => {
                let value = m.regs.get16(reg);
                m.regs.alu_add16_hl(value);
            }
            Instruction::AddSp(offset) => {
                let sp = m.regs.sp();
                let result = m.regs.alu_add16_signed(sp, offset);
                m.regs.set_sp(result);
            }
            Instruction::Alu(op, src) => {
                let value = src.read(m)?;
                match op {
                    AluOp::Add => m.regs.alu_add(value, false),
                    AluOp::Adc => m.regs.alu_add(value, true),
                    AluOp::Sub => m.regs.alu_sub(value, false),
                    AluOp::Sbc => m.regs.alu_sub(value, true),
                    AluOp::And => m.regs.alu_and(value),
                    AluOp::Xor => m.regs.alu_xor(value),
                    AluOp::Or => m.regs.alu_or(value),
                    AluOp::Cp => m.regs.alu_cp(value),
                }
            }
            Instruction::Ld8 { dst, src } => {
                let value = src.read(m)?;
                dst.write(m, value)?;
            }
            Instruction::Ld16 { dst, src } => {
                let value = src.read(m)?;
                dst.write(m, value)?;
            }
            Instruction::LdHlStep { to_memory, step } => {
                let hl = m.regs.get16(Reg16::HL);
                if to_memory {
                    m.bus.write_byte(hl, m.regs.a())?;
                } else {
                    let value = m.bus.read_byte(hl)?;
                    m.regs.set_a(value);
                }
                let next = match step {
                    Step::Inc => hl.wrapping_add(1),
                    Step::Dec => hl.wrapping_sub(1),
                };
                m.regs.set16(Reg16::HL, next);
            }
            Instruction::LdHlSp(offset) => {
                let sp = m.regs.sp();
                let result = m.regs.alu_add16_signed(sp, offset);
                m.regs.set16(Reg16::HL, result);
            }
            Instruction::Jp { cond, target } | Instruction::Jr { cond, target } => {
                if cond.holds(&m.regs) {
                    let target = target.read(m)?;
                    m.regs.set_pc(target);
                    return Ok(Outcome::jumped(&cond, JUMP_TAKEN_CYCLES));
                }
            }
            Instruction::Call { cond, target } => {
                if cond.holds(&m.regs) {
                    m.push_u16(pc.wrapping_add(3))?;
                    m.regs.set_pc(target);
                    return Ok(Outcome::jumped(&cond, CALL_TAKEN_CYCLES));
                }
            }
            Instruction::Ret(cond) => {
                if cond.holds(&m.regs) {
                    let target = m.pop_u16()?;
                    m.regs.set_pc(target);
                    return Ok(Outcome::jumped(&cond, RET_TAKEN_CYCLES));
                }
            }
            Instruction::Reti => {
                let target = m.pop_u16()?;
                m.regs.set_pc(target);
                m.interrupts_enabled = true;
                return Ok(Outcome::jumped(&Condition::ALWAYS, 0));
            }
            Instruction::Rst(vector) => {
                m.push_u16(pc.wrapping_add(1))?;
                m.regs.set_pc(u16::from(vector));
                return Ok(Outcome::jumped(&Condition::ALWAYS, 0));
            }
            Instruction::Push(reg) => {
                let value = m.regs.get16(reg);
                m.push_u16(value)?;
            }
            Instruction::Pop(reg) => {
                let value = m.pop_u16()?;
                m.regs.set16(reg, value);
            }
            Instruction::Shift(op, place) => {
                let value = place.read(m)?;
                let result = m.regs.alu_shift(op, value);
                place.write(m, result)?;
            }
            Instruction::Bit(bit, place) => {
                let value = place.read(m)?;
                m.regs.alu_bit(bit, value);
            }
            Instruction::Res(bit, place) => {
                let value = place.read(m)?;
                place.write(m, value & !(1 << bit))?;
            }
            Instruction::Set(bit, place) => {
                let value = place.read(m)?;
                place.write(m, value | (1 << bit))?;
            }
            Instruction::Illegal(opcode) => return Err(GbError::IllegalOpcode { opcode, pc }),
        }
        Ok(Outcome::NEXT)
    }
}
