use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: Z (zero)
    /// - bit 6: N (subtract)
    /// - bit 5: H (half carry)
    /// - bit 4: C (carry)
    /// - bits 0–3 are always zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u8 {
        const Z = 0b1000_0000;
        const N = 0b0100_0000;
        const H = 0b0010_0000;
        const C = 0b0001_0000;
    }
}

/// Named 8-bit registers, identified by their storage slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Reg8::A => 0,
            Reg8::F => 1,
            Reg8::B => 2,
            Reg8::C => 3,
            Reg8::D => 4,
            Reg8::E => 5,
            Reg8::H => 6,
            Reg8::L => 7,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Reg8::A => "A",
            Reg8::F => "F",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        }
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six 16-bit registers. Each one spans two adjacent slots, high byte
/// first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Reg16 {
    /// Index of the high byte slot; the low byte lives right after it.
    #[inline]
    pub const fn high_slot(self) -> usize {
        match self {
            Reg16::AF => 0,
            Reg16::BC => 2,
            Reg16::DE => 4,
            Reg16::HL => 6,
            Reg16::SP => 8,
            Reg16::PC => 10,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Reg16::AF => "AF",
            Reg16::BC => "BC",
            Reg16::DE => "DE",
            Reg16::HL => "HL",
            Reg16::SP => "SP",
            Reg16::PC => "PC",
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const SLOT_COUNT: usize = 12;
const F_SLOT: usize = 1;

/// Register file for the DMG CPU (LR35902).
///
/// Twelve byte slots in the order A, F, B, C, D, E, H, L, SP high, SP low,
/// PC high, PC low. The 16-bit views are composed from these slots, so a
/// write through either view is immediately visible through the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    slots: [u8; SLOT_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get8(&self, reg: Reg8) -> u8 {
        self.slots[reg.slot()]
    }

    #[inline]
    pub fn set8(&mut self, reg: Reg8, value: u8) {
        self.write_slot(reg.slot(), value);
    }

    #[inline]
    pub fn get16(&self, reg: Reg16) -> u16 {
        let hi = reg.high_slot();
        u16::from_be_bytes([self.slots[hi], self.slots[hi + 1]])
    }

    #[inline]
    pub fn set16(&mut self, reg: Reg16, value: u16) {
        let [high, low] = value.to_be_bytes();
        let hi = reg.high_slot();
        self.write_slot(hi, high);
        self.write_slot(hi + 1, low);
    }

    #[inline]
    fn write_slot(&mut self, slot: usize, value: u8) {
        // Lower 4 bits of F are always zero.
        self.slots[slot] = if slot == F_SLOT { value & 0xF0 } else { value };
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.get16(Reg16::PC)
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.set16(Reg16::PC, value);
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.get16(Reg16::SP)
    }

    #[inline]
    pub fn set_sp(&mut self, value: u16) {
        self.set16(Reg16::SP, value);
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.get8(Reg8::A)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.set8(Reg8::A, value);
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.slots[F_SLOT])
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.slots[F_SLOT] = flags.bits();
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, on: bool) {
        let mut flags = self.flags();
        flags.set(flag, on);
        self.set_flags(flags);
    }

    pub fn z(&self) -> bool {
        self.flag(Flags::Z)
    }

    pub fn set_z(&mut self, on: bool) {
        self.set_flag(Flags::Z, on);
    }

    pub fn n(&self) -> bool {
        self.flag(Flags::N)
    }

    pub fn set_n(&mut self, on: bool) {
        self.set_flag(Flags::N, on);
    }

    pub fn h(&self) -> bool {
        self.flag(Flags::H)
    }

    pub fn set_h(&mut self, on: bool) {
        self.set_flag(Flags::H, on);
    }

    pub fn c(&self) -> bool {
        self.flag(Flags::C)
    }

    pub fn set_c(&mut self, on: bool) {
        self.set_flag(Flags::C, on);
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code (Pan Docs values).
    pub fn apply_dmg_boot_state(&mut self) {
        self.set16(Reg16::AF, 0x01B0);
        self.set16(Reg16::BC, 0x0013);
        self.set16(Reg16::DE, 0x00D8);
        self.set16(Reg16::HL, 0x014D);
        self.set16(Reg16::SP, 0xFFFE);
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
            self.get16(Reg16::AF),
            self.get16(Reg16::BC),
            self.get16(Reg16::DE),
            self.get16(Reg16::HL),
            self.get16(Reg16::SP),
            self.get16(Reg16::PC),
        )
    }
}
