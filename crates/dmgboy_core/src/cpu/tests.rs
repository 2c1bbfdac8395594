use super::decoder::Decoder;
use super::instruction::{AluOp, Condition, Instruction};
use super::operand::{Operand8, Place8};
use super::registers::{Flags, Reg16, Reg8};
use super::scanner::ByteScanner;
use super::*;
use crate::error::GbError;
use crate::machine::cartridge::{rom_image, Cartridge};
use crate::machine::Machine;

const PROGRAM: u16 = 0xC000;

fn machine() -> Machine {
    let rom = rom_image(0x8000, 0x00, 0x00, 0x00);
    let mut m = Machine::new(Cartridge::from_rom(&rom).unwrap());
    m.regs.set_sp(0xDFFE);
    m
}

fn load(m: &mut Machine, bytes: &[u8]) {
    for (i, byte) in bytes.iter().enumerate() {
        m.bus.write_byte(PROGRAM + i as u16, *byte).unwrap();
    }
    m.regs.set_pc(PROGRAM);
}

/// Decode and execute the instruction at PC, falling through like the
/// execution loop does.
fn step(m: &mut Machine) -> crate::error::Result<(u32, Outcome)> {
    let pc = m.regs.pc();
    let decoded = {
        let mut scanner = ByteScanner::new(&m.bus, pc as usize);
        Decoder::root().decode_next(&mut scanner)?
    };
    let outcome = decoded.instruction.execute(m)?;
    if !outcome.jumped {
        m.regs.set_pc(pc.wrapping_add(decoded.length as u16));
    }
    Ok((decoded.min_cycles + outcome.extra_cycles, outcome))
}

fn run(bytes: &[u8], steps: usize) -> Machine {
    let mut m = machine();
    load(&mut m, bytes);
    for _ in 0..steps {
        step(&mut m).unwrap();
    }
    m
}

#[test]
fn load_immediate_into_a() {
    let m = run(&[0x3E, 0x05], 1);
    assert_eq!(m.regs.a(), 5);
    assert_eq!(m.regs.pc(), PROGRAM + 2);
}

#[test]
fn add_overflow_flags() {
    // LD A,$FF; LD B,$01; ADD A,B
    let m = run(&[0x3E, 0xFF, 0x06, 0x01, 0x80], 3);
    assert_eq!(m.regs.a(), 0x00);
    assert!(m.regs.z() && m.regs.h() && m.regs.c() && !m.regs.n());
}

#[test]
fn sub_borrow_flags() {
    // LD A,$00; LD C,$01; SUB C
    let m = run(&[0x3E, 0x00, 0x0E, 0x01, 0x91], 3);
    assert_eq!(m.regs.a(), 0xFF);
    assert!(!m.regs.z() && m.regs.h() && m.regs.c() && m.regs.n());
}

#[test]
fn memory_operands_resolve_at_access_time() {
    // LD HL,$C100; INC HL; LD A,(HL)
    let mut m = machine();
    m.bus.write_byte(0xC101, 0x99).unwrap();
    load(&mut m, &[0x21, 0x00, 0xC1, 0x23, 0x7E]);
    for _ in 0..3 {
        step(&mut m).unwrap();
    }
    assert_eq!(m.regs.a(), 0x99);
}

#[test]
fn relative_jump_to_itself_stays_put() {
    let mut m = machine();
    load(&mut m, &[0x18, 0xFE]);
    let (cycles, outcome) = step(&mut m).unwrap();
    assert!(outcome.jumped);
    assert_eq!(m.regs.pc(), PROGRAM);
    assert_eq!(cycles, 12);
}

#[test]
fn conditional_jump_costs_more_when_taken() {
    let mut m = machine();
    load(&mut m, &[0x20, 0x10]);
    m.regs.set_z(true);
    let (cycles, _) = step(&mut m).unwrap();
    assert_eq!(cycles, 8);
    assert_eq!(m.regs.pc(), PROGRAM + 2);

    m.regs.set_pc(PROGRAM);
    m.regs.set_z(false);
    let (cycles, _) = step(&mut m).unwrap();
    assert_eq!(cycles, 12);
    assert_eq!(m.regs.pc(), PROGRAM + 2 + 0x10);
}

#[test]
fn call_and_return() {
    // CALL $C010 ... at $C010: RET
    let mut m = machine();
    load(&mut m, &[0xCD, 0x10, 0xC0]);
    m.bus.write_byte(0xC010, 0xC9).unwrap();

    let (cycles, _) = step(&mut m).unwrap();
    assert_eq!(cycles, 24);
    assert_eq!(m.regs.pc(), 0xC010);
    assert_eq!(m.regs.sp(), 0xDFFC);
    // High byte pushed first, so it sits above the low byte.
    assert_eq!(m.bus.read_byte(0xDFFD), Ok(0xC0));
    assert_eq!(m.bus.read_byte(0xDFFC), Ok(0x03));

    let (cycles, _) = step(&mut m).unwrap();
    assert_eq!(cycles, 16);
    assert_eq!(m.regs.pc(), PROGRAM + 3);
    assert_eq!(m.regs.sp(), 0xDFFE);
}

#[test]
fn conditional_call_and_return_cycles() {
    let mut m = machine();
    load(&mut m, &[0xDC, 0x10, 0xC0]);
    m.bus.write_byte(0xC010, 0xD8).unwrap();
    m.regs.set_c(true);
    assert_eq!(step(&mut m).unwrap().0, 24);
    assert_eq!(step(&mut m).unwrap().0, 20);
    assert_eq!(m.regs.pc(), PROGRAM + 3);

    m.regs.set_pc(PROGRAM);
    m.regs.set_c(false);
    assert_eq!(step(&mut m).unwrap().0, 12);
    assert_eq!(m.regs.pc(), PROGRAM + 3);
}

#[test]
fn restart_pushes_next_address() {
    let m = run(&[0xEF], 1);
    assert_eq!(m.regs.pc(), 0x0028);
    assert_eq!(m.bus.read_word(m.regs.sp()), Ok(PROGRAM + 1));
}

#[test]
fn push_pop_af_masks_flags() {
    // LD BC,$12FF; PUSH BC; POP AF
    let m = run(&[0x01, 0xFF, 0x12, 0xC5, 0xF1], 3);
    assert_eq!(m.regs.get16(Reg16::AF), 0x12F0);
    assert_eq!(m.regs.get8(Reg8::F) & 0x0F, 0);
}

#[test]
fn interrupt_flag_instructions() {
    let mut m = machine();
    load(&mut m, &[0xFB, 0xF3]);
    step(&mut m).unwrap();
    assert!(m.interrupts_enabled);
    step(&mut m).unwrap();
    assert!(!m.interrupts_enabled);

    m.push_u16(0x1234).unwrap();
    Instruction::Reti.execute(&mut m).unwrap();
    assert!(m.interrupts_enabled);
    assert_eq!(m.regs.pc(), 0x1234);
}

#[test]
fn accumulator_rotates_set_zero_from_result() {
    // XOR A; RLCA
    let m = run(&[0xAF, 0x07], 2);
    assert_eq!(m.regs.a(), 0);
    assert!(m.regs.z());

    // LD A,$01; RRCA
    let m = run(&[0x3E, 0x01, 0x0F], 2);
    assert_eq!(m.regs.a(), 0x80);
    assert!(!m.regs.z() && m.regs.c());
}

#[test]
fn swap_leaves_carry_alone() {
    // SCF; LD A,$F1; SWAP A
    let m = run(&[0x37, 0x3E, 0xF1, 0xCB, 0x37], 3);
    assert_eq!(m.regs.a(), 0x1F);
    assert!(m.regs.c());
    assert!(!m.regs.z() && !m.regs.n() && !m.regs.h());
}

#[test]
fn prefixed_rotate_sets_zero() {
    // XOR A; RLC A
    let m = run(&[0xAF, 0xCB, 0x07], 2);
    assert!(m.regs.z());
}

#[test]
fn hl_step_loads() {
    // LD HL,$C100; LD A,$42; LD (HL+),A; LD (HL-),A
    let m = run(&[0x21, 0x00, 0xC1, 0x3E, 0x42, 0x22, 0x32], 4);
    assert_eq!(m.bus.read_byte(0xC100), Ok(0x42));
    assert_eq!(m.bus.read_byte(0xC101), Ok(0x42));
    assert_eq!(m.regs.get16(Reg16::HL), 0xC100);
}

#[test]
fn high_page_loads() {
    // LD A,$12; LDH ($80),A; LD C,$80; LD A,$00; LD A,($FF00+C)
    let m = run(&[0x3E, 0x12, 0xE0, 0x80, 0x0E, 0x80, 0x3E, 0x00, 0xF2], 5);
    assert_eq!(m.bus.read_byte(0xFF80), Ok(0x12));
    assert_eq!(m.regs.a(), 0x12);
}

#[test]
fn bit_operations_on_memory() {
    let mut m = machine();
    m.regs.set16(Reg16::HL, 0xC200);
    Instruction::Set(3, Place8::HL).execute(&mut m).unwrap();
    assert_eq!(m.bus.read_byte(0xC200), Ok(0x08));
    Instruction::Bit(3, Place8::HL).execute(&mut m).unwrap();
    assert!(!m.regs.z());
    Instruction::Res(3, Place8::HL).execute(&mut m).unwrap();
    Instruction::Bit(3, Place8::HL).execute(&mut m).unwrap();
    assert!(m.regs.z());
}

#[test]
fn store_sp_and_stack_offsets() {
    // LD SP,$DFF0; LD ($C100),SP; ADD SP,-16; LD HL,SP+1
    let m = run(&[0x31, 0xF0, 0xDF, 0x08, 0x00, 0xC1, 0xE8, 0xF0, 0xF8, 0x01], 4);
    assert_eq!(m.bus.read_word(0xC100), Ok(0xDFF0));
    assert_eq!(m.regs.sp(), 0xDFE0);
    assert_eq!(m.regs.get16(Reg16::HL), 0xDFE1);
    assert!(!m.regs.z());
}

#[test]
fn compare_with_immediate() {
    let mut m = machine();
    m.regs.set_a(0x90);
    Instruction::Alu(AluOp::Cp, Operand8::Imm(0x90))
        .execute(&mut m)
        .unwrap();
    assert_eq!(m.regs.a(), 0x90);
    assert_eq!(m.regs.flags(), Flags::Z | Flags::N);
}

#[test]
fn ret_condition_not_taken_falls_through() {
    let mut m = machine();
    m.regs.set_z(false);
    let outcome = Instruction::Ret(Condition::Z).execute(&mut m).unwrap();
    assert_eq!(outcome, Outcome::NEXT);
}

#[test]
fn halt_and_illegal_opcodes_are_fatal() {
    let mut m = machine();
    load(&mut m, &[0x76]);
    assert_eq!(step(&mut m), Err(GbError::HaltRequested { pc: PROGRAM }));

    load(&mut m, &[0xFD]);
    assert_eq!(
        step(&mut m),
        Err(GbError::IllegalOpcode {
            opcode: 0xFD,
            pc: PROGRAM
        })
    );
}

#[test]
fn writing_rom_through_an_instruction_is_fatal() {
    // LD ($2000),A on a cartridge without a bank controller.
    let mut m = machine();
    load(&mut m, &[0xEA, 0x00, 0x20]);
    assert!(matches!(
        step(&mut m),
        Err(GbError::UnsupportedWrite { addr: 0x2000, .. })
    ));
}
