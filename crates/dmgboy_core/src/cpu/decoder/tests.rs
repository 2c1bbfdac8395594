use super::*;
use crate::cpu::instruction::{AluOp, ShiftOp};
use crate::cpu::operand::{Operand16, Operand8};

fn decode(bytes: &[u8]) -> Decoded {
    let bytes = bytes.to_vec();
    let mut scanner = ByteScanner::new(&bytes, 0);
    Decoder::root().decode_next(&mut scanner).unwrap()
}

#[test]
fn every_root_opcode_has_one_factory() {
    for opcode in 0..=u8::MAX {
        assert!(
            Decoder::root().factory_for(opcode).is_ok(),
            "root opcode {opcode:#04X}"
        );
    }
}

#[test]
fn every_prefixed_opcode_has_one_factory() {
    for opcode in 0..=u8::MAX {
        assert!(
            Decoder::prefixed().factory_for(opcode).is_ok(),
            "CB {opcode:#04X}"
        );
    }
}

#[test]
fn lookahead_does_not_consume() {
    for opcode in 0..=u8::MAX {
        let bytes = vec![opcode, 0x00, 0x00];
        let mut scanner = ByteScanner::new(&bytes, 0);
        let first = Decoder::root().min_cycles(&mut scanner).unwrap();
        assert_eq!(scanner.position(), 0, "{opcode:#04X}");
        let second = Decoder::root().min_cycles(&mut scanner).unwrap();
        assert_eq!(first, second);
        assert_eq!(scanner.position(), 0);

        let bytes = vec![0xCB, opcode];
        let mut scanner = ByteScanner::new(&bytes, 0);
        let first = Decoder::root().min_cycles(&mut scanner).unwrap();
        assert_eq!(scanner.position(), 0, "CB {opcode:#04X}");
        assert_eq!(Decoder::root().min_cycles(&mut scanner).unwrap(), first);
    }
}

#[test]
fn nop_scenario() {
    let decoded = decode(&[0x00]);
    assert_eq!(decoded.instruction, Instruction::Nop);
    assert_eq!(decoded.min_cycles, 4);
    assert_eq!(decoded.length, 1);
}

#[test]
fn prefixed_rlc_a_scenario() {
    let decoded = decode(&[0xCB, 0x07]);
    assert_eq!(
        decoded.instruction,
        Instruction::Shift(ShiftOp::Rlc, Place8::Reg(Reg8::A))
    );
    assert_eq!(decoded.min_cycles, 8);
    assert_eq!(decoded.length, 2);
    assert_eq!(decoded.instruction.to_string(), "RLC A");
}

#[test]
fn load_immediate_scenario() {
    let decoded = decode(&[0x3E, 0x05]);
    assert_eq!(
        decoded.instruction,
        Instruction::Ld8 {
            dst: Place8::Reg(Reg8::A),
            src: Operand8::Imm(0x05),
        }
    );
    assert_eq!(decoded.min_cycles, 8);
    assert_eq!(decoded.length, 2);
}

#[test]
fn instruction_lengths() {
    let cases: &[(&[u8], usize)] = &[
        (&[0x01, 0x34, 0x12], 3),
        (&[0x08, 0x00, 0xC0], 3),
        (&[0x18, 0xFE], 2),
        (&[0x36, 0x10], 2),
        (&[0xC3, 0x50, 0x01], 3),
        (&[0xCD, 0x00, 0x40], 3),
        (&[0xE0, 0x44], 2),
        (&[0xEA, 0x00, 0xC0], 3),
        (&[0xE8, 0x02], 2),
        (&[0xF8, 0x02], 2),
        (&[0xFE, 0x90], 2),
        (&[0x10, 0x00], 2),
        (&[0xCB, 0x7E], 2),
        (&[0xE9], 1),
    ];
    for (bytes, length) in cases {
        assert_eq!(decode(bytes).length, *length, "{bytes:02X?}");
    }
}

#[test]
fn cycle_costs() {
    let cases: &[(&[u8], u32)] = &[
        (&[0x34], 12),
        (&[0x3C], 4),
        (&[0x36, 0x00], 12),
        (&[0x46], 8),
        (&[0x41], 4),
        (&[0x86], 8),
        (&[0x20, 0x00], 8),
        (&[0x18, 0x00], 12),
        (&[0xC0], 8),
        (&[0xC9], 16),
        (&[0xCD, 0x00, 0x00], 24),
        (&[0xC4, 0x00, 0x00], 12),
        (&[0xC5], 16),
        (&[0xF1], 12),
        (&[0xFF], 16),
        (&[0x08, 0x00, 0x00], 20),
        (&[0xCB, 0x46], 12),
        (&[0xCB, 0x86], 16),
        (&[0xCB, 0x36], 16),
        (&[0xCB, 0x11], 8),
    ];
    for (bytes, cycles) in cases {
        assert_eq!(decode(bytes).min_cycles, *cycles, "{bytes:02X?}");
    }
}

#[test]
fn operands_and_mnemonics() {
    let cases: &[(&[u8], &str)] = &[
        (&[0x3E, 0x05], "LD A,$05"),
        (&[0x21, 0x00, 0xC0], "LD HL,$C000"),
        (&[0x08, 0x10, 0xC0], "LD ($C010),SP"),
        (&[0x77], "LD (HL),A"),
        (&[0x1A], "LD A,(DE)"),
        (&[0x2A], "LD A,(HL+)"),
        (&[0x32], "LD (HL-),A"),
        (&[0xE0, 0x44], "LD ($FF44),A"),
        (&[0xF2], "LD A,($FF00+C)"),
        (&[0x20, 0xFE], "JR NZ,-2"),
        (&[0xC3, 0x50, 0x01], "JP $0150"),
        (&[0xDA, 0x00, 0x20], "JP C,$2000"),
        (&[0xE9], "JP HL"),
        (&[0xCC, 0x34, 0x12], "CALL Z,$1234"),
        (&[0xD0], "RET NC"),
        (&[0xD9], "RETI"),
        (&[0xEF], "RST $28"),
        (&[0xF5], "PUSH AF"),
        (&[0x9E], "SBC A,(HL)"),
        (&[0xFE, 0x90], "CP $90"),
        (&[0x17], "RLA"),
        (&[0xE8, 0xFF], "ADD SP,-1"),
        (&[0xF8, 0x02], "LD HL,SP+2"),
        (&[0xCB, 0x7C], "BIT 7,H"),
        (&[0xCB, 0xBE], "RES 7,(HL)"),
        (&[0xCB, 0xC7], "SET 0,A"),
        (&[0xCB, 0x37], "SWAP A"),
        (&[0xDD], "ILLEGAL $DD"),
    ];
    for (bytes, text) in cases {
        assert_eq!(decode(bytes).instruction.to_string(), *text, "{bytes:02X?}");
    }
}

#[test]
fn decoded_operands_are_structural() {
    assert_eq!(
        decode(&[0xC6, 0x10]).instruction,
        Instruction::Alu(AluOp::Add, Operand8::Imm(0x10))
    );
    assert_eq!(
        decode(&[0x28, 0x05]).instruction,
        Instruction::Jr {
            cond: Condition::Z,
            target: Operand16::Relative(5),
        }
    );
    // Two decodes of the same bytes are interchangeable.
    assert_eq!(decode(&[0x7E]), decode(&[0x7E]));
}

struct Everything;

impl InstructionFactory for Everything {
    fn name(&self) -> &'static str {
        "everything"
    }

    fn matches(&self, _opcode: u8) -> bool {
        true
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Ok(Instruction::Nop)
    }
}

struct Zero;

impl InstructionFactory for Zero {
    fn name(&self) -> &'static str {
        "zero"
    }

    fn matches(&self, opcode: u8) -> bool {
        opcode == 0
    }

    fn cycles(&self, _opcode: u8) -> u32 {
        4
    }

    fn decode(&self, scanner: &mut ByteScanner<'_>) -> Result<Instruction> {
        scanner.read_u8()?;
        Ok(Instruction::Nop)
    }
}

#[test]
fn overlapping_factories_are_fatal() {
    let decoder = Decoder::new("test", vec![Box::new(Everything), Box::new(Zero)]);
    assert_eq!(
        decoder.factory_for(0x00).err(),
        Some(GbError::AmbiguousOpcode {
            decoder: "test",
            opcode: 0x00,
            factories: vec!["everything", "zero"],
        })
    );
    assert!(decoder.factory_for(0x01).is_ok());
}

#[test]
fn missing_factory_is_fatal() {
    let decoder = Decoder::new("test", vec![Box::new(Zero)]);
    let bytes = vec![0x01];
    let mut scanner = ByteScanner::new(&bytes, 0);
    assert_eq!(
        decoder.decode(&mut scanner),
        Err(GbError::UnknownOpcode {
            decoder: "test",
            opcode: 0x01
        })
    );
}
