use super::instruction::ShiftOp;
use super::registers::{Flags, Reg16, Registers};

impl Registers {
    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.a();
        let carry_in = u8::from(use_carry && self.c());

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = u16::from(a) + u16::from(value) + u16::from(carry_in);
        let result = full as u8;

        self.set_a(result);
        self.set_flags(Flags::empty());
        self.set_z(result == 0);
        self.set_h(half & 0x10 != 0);
        self.set_c(full > 0xFF);
    }

    /// Core 8-bit SUB/SBC operation on A.
    ///
    /// The carry-in is subtracted together with the operand, as one
    /// `a - (value + carry)` computed in a wider signed type, so a borrow
    /// caused only by the carry still shows up in H and C.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let result = self.sub_flags(value, use_carry);
        self.set_a(result);
    }

    /// Compare A with `value`, setting flags as if `A - value` was performed.
    /// A itself is not modified.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.sub_flags(value, false);
    }

    fn sub_flags(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.a();
        let carry_in = i16::from(use_carry && self.c());

        let half = i16::from(a & 0x0F) - i16::from(value & 0x0F) - carry_in;
        let full = i16::from(a) - i16::from(value) - carry_in;
        let result = full as u8;

        self.set_flags(Flags::N);
        self.set_z(result == 0);
        self.set_h(half < 0);
        self.set_c(full < 0);
        result
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.a() & value;
        self.set_a(result);
        self.set_flags(Flags::H);
        self.set_z(result == 0);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.a() | value;
        self.set_a(result);
        self.set_flags(Flags::empty());
        self.set_z(result == 0);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.a() ^ value;
        self.set_a(result);
        self.set_flags(Flags::empty());
        self.set_z(result == 0);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Uses C, H, N, and A to compute a correction value, then updates A,
    /// Z, H, C; N is left unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.a();
        let mut adjust: u8 = if self.c() { 0x60 } else { 0x00 };
        if self.h() {
            adjust |= 0x06;
        }

        if !self.n() {
            // After an addition.
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            // After a subtraction.
            a = a.wrapping_sub(adjust);
        }

        self.set_c(adjust >= 0x60);
        self.set_h(false);
        self.set_z(a == 0);
        self.set_a(a);
    }

    pub(super) fn alu_cpl(&mut self) {
        let a = !self.a();
        self.set_a(a);
        self.set_n(true);
        self.set_h(true);
    }

    /// SCF (`carry = true`) and CCF (`carry = !C`).
    pub(super) fn alu_set_carry(&mut self, carry: bool) {
        self.set_n(false);
        self.set_h(false);
        self.set_c(carry);
    }

    /// 8-bit increment helper used by INC r and INC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_z(result == 0);
        self.set_n(false);
        self.set_h((value & 0x0F) == 0x0F);
        result
    }

    /// 8-bit decrement helper used by DEC r and DEC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_z(result == 0);
        self.set_n(true);
        self.set_h((value & 0x0F) == 0);
        result
    }

    /// 16-bit add helper for `ADD HL,rr`.
    ///
    /// Z is unaffected; N is cleared; H and C come from bits 11 and 15.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.get16(Reg16::HL);
        let result = hl.wrapping_add(value);

        self.set_n(false);
        self.set_h((hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_c(u32::from(hl) + u32::from(value) > 0xFFFF);

        self.set16(Reg16::HL, result);
    }

    /// Add a signed 8-bit offset to a 16-bit base (ADD SP,r8 and
    /// LD HL,SP+r8).
    ///
    /// Z and N are cleared; H and C are computed from the low byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, offset: i8) -> u16 {
        let offset = offset as i16 as u16;
        self.set_flags(Flags::empty());
        self.set_h((base & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_c((base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        base.wrapping_add(offset)
    }

    /// Rotates, shifts and SWAP.
    ///
    /// C takes the bit shifted out (SWAP clears it), Z reflects the result,
    /// N and H are cleared.
    pub(super) fn alu_shift(&mut self, op: ShiftOp, value: u8) -> u8 {
        let carry_in = u8::from(self.c());
        let (result, carry) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry_in, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), self.c()),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        self.set_flags(Flags::empty());
        self.set_z(result == 0);
        self.set_c(carry);
        result
    }

    /// BIT b,r: Z is set when the bit is clear. C is untouched.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.set_z(value & (1 << bit) == 0);
        self.set_n(false);
        self.set_h(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_a(a: u8) -> Registers {
        let mut regs = Registers::new();
        regs.set_a(a);
        regs
    }

    #[test]
    fn add_overflow_sets_z_h_c() {
        let mut regs = with_a(0xFF);
        regs.alu_add(0x01, false);
        assert_eq!(regs.a(), 0x00);
        assert_eq!(regs.flags(), Flags::Z | Flags::H | Flags::C);
    }

    #[test]
    fn adc_uses_carry() {
        let mut regs = with_a(0x0E);
        regs.set_c(true);
        regs.alu_add(0x01, true);
        assert_eq!(regs.a(), 0x10);
        assert_eq!(regs.flags(), Flags::H);
    }

    #[test]
    fn sub_borrow_sets_h_c_n() {
        let mut regs = with_a(0x00);
        regs.alu_sub(0x01, false);
        assert_eq!(regs.a(), 0xFF);
        assert_eq!(regs.flags(), Flags::N | Flags::H | Flags::C);
    }

    #[test]
    fn sbc_borrow_from_carry_alone() {
        // 0x10 - 0x10 - 1: the operand alone does not borrow, the carry does.
        let mut regs = with_a(0x10);
        regs.set_c(true);
        regs.alu_sub(0x10, true);
        assert_eq!(regs.a(), 0xFF);
        assert_eq!(regs.flags(), Flags::N | Flags::H | Flags::C);

        // Low nibble: 0x0 - 0xF - 1 borrows, and 0x00 - 0xFF - 1 does too.
        let mut regs = with_a(0x00);
        regs.set_c(true);
        regs.alu_sub(0xFF, true);
        assert_eq!(regs.a(), 0x00);
        assert_eq!(regs.flags(), Flags::Z | Flags::N | Flags::H | Flags::C);
    }

    #[test]
    fn cp_leaves_a_alone() {
        let mut regs = with_a(0x42);
        regs.alu_cp(0x42);
        assert_eq!(regs.a(), 0x42);
        assert_eq!(regs.flags(), Flags::Z | Flags::N);
    }

    #[test]
    fn logic_flags() {
        let mut regs = with_a(0xF0);
        regs.alu_and(0x0F);
        assert_eq!(regs.flags(), Flags::Z | Flags::H);

        let mut regs = with_a(0xF0);
        regs.set_c(true);
        regs.alu_or(0x0F);
        assert_eq!(regs.a(), 0xFF);
        assert_eq!(regs.flags(), Flags::empty());

        let mut regs = with_a(0xAA);
        regs.alu_xor(0xAA);
        assert_eq!(regs.flags(), Flags::Z);
    }

    #[test]
    fn inc_dec_keep_carry() {
        let mut regs = Registers::new();
        regs.set_c(true);
        assert_eq!(regs.alu_inc8(0x0F), 0x10);
        assert_eq!(regs.flags(), Flags::H | Flags::C);
        assert_eq!(regs.alu_dec8(0x01), 0x00);
        assert_eq!(regs.flags(), Flags::Z | Flags::N | Flags::C);
        assert_eq!(regs.alu_dec8(0x00), 0xFF);
        assert_eq!(regs.flags(), Flags::N | Flags::H | Flags::C);
    }

    #[test]
    fn add_hl_leaves_z() {
        let mut regs = Registers::new();
        regs.set16(Reg16::HL, 0x0FFF);
        regs.set_z(true);
        regs.alu_add16_hl(0x0001);
        assert_eq!(regs.get16(Reg16::HL), 0x1000);
        assert_eq!(regs.flags(), Flags::Z | Flags::H);

        regs.set16(Reg16::HL, 0xFFFF);
        regs.alu_add16_hl(0x0001);
        assert_eq!(regs.get16(Reg16::HL), 0x0000);
        assert_eq!(regs.flags(), Flags::Z | Flags::H | Flags::C);
    }

    #[test]
    fn add_signed_clears_z_and_uses_low_byte() {
        let mut regs = Registers::new();
        regs.set_z(true);
        assert_eq!(regs.alu_add16_signed(0xFFF8, 8), 0x0000);
        assert_eq!(regs.flags(), Flags::H | Flags::C);
        assert_eq!(regs.alu_add16_signed(0x0001, -1), 0x0000);
        assert_eq!(regs.flags(), Flags::H | Flags::C);
        assert_eq!(regs.alu_add16_signed(0x0100, -1), 0x00FF);
        assert_eq!(regs.flags(), Flags::empty());
    }

    #[test]
    fn daa_after_add() {
        let mut regs = with_a(0x45);
        regs.alu_add(0x38, false);
        regs.alu_daa();
        assert_eq!(regs.a(), 0x83);
        assert!(!regs.c());
    }

    #[test]
    fn shifts() {
        let mut regs = Registers::new();
        assert_eq!(regs.alu_shift(ShiftOp::Rlc, 0x85), 0x0B);
        assert!(regs.c());
        assert_eq!(regs.alu_shift(ShiftOp::Rl, 0x00), 0x01);
        assert!(!regs.c() && !regs.z());
        assert_eq!(regs.alu_shift(ShiftOp::Sra, 0x81), 0xC0);
        assert!(regs.c());
        assert_eq!(regs.alu_shift(ShiftOp::Srl, 0x01), 0x00);
        assert_eq!(regs.flags(), Flags::Z | Flags::C);
        assert_eq!(regs.alu_shift(ShiftOp::Swap, 0xF1), 0x1F);
        assert_eq!(regs.flags(), Flags::C);
        regs.set_c(true);
        assert_eq!(regs.alu_shift(ShiftOp::Rr, 0x02), 0x81);
        assert!(!regs.c());
    }

    #[test]
    fn swap_keeps_carry() {
        let mut regs = Registers::new();
        regs.set_flags(Flags::N | Flags::H | Flags::C);
        assert_eq!(regs.alu_shift(ShiftOp::Swap, 0x00), 0x00);
        assert_eq!(regs.flags(), Flags::Z | Flags::C);

        regs.set_c(false);
        assert_eq!(regs.alu_shift(ShiftOp::Swap, 0x12), 0x21);
        assert_eq!(regs.flags(), Flags::empty());
    }

    #[test]
    fn bit_test_keeps_carry() {
        let mut regs = Registers::new();
        regs.set_c(true);
        regs.alu_bit(7, 0x7F);
        assert_eq!(regs.flags(), Flags::Z | Flags::H | Flags::C);
        regs.alu_bit(0, 0x01);
        assert_eq!(regs.flags(), Flags::H | Flags::C);
    }
}
