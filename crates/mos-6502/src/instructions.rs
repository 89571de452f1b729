//! Instruction execution.
//!
//! Each handler returns its extra-cycle eligibility. The dispatcher ANDs it
//! with the addressing mode's: an indexed read only pays the page-cross
//! cycle when both sides allow it, while writes and read-modify-write
//! instructions (which return 0) never do. Branch handlers return the
//! +1/+2 taken/page-crossed extras directly; the Relative mode's 0b11 mask
//! keeps them intact.

use emu_core::Bus;

use crate::flags;
use crate::table::Op;
use crate::Mos6502;

/// IRQ/BRK vector.
pub(crate) const IRQ_VECTOR: u16 = 0xFFFE;
/// NMI vector.
pub(crate) const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector.
pub(crate) const RESET_VECTOR: u16 = 0xFFFC;

impl Mos6502 {
    /// Add `value` plus a carry-in to the accumulator, setting C, V, Z, N.
    ///
    /// Signed overflow is set when A and the operand agree in sign but the
    /// sum does not. SBC and RRA reuse this with an inverted operand or a
    /// rotated-out carry.
    fn add_to_a(&mut self, value: u8, carry_in: bool) {
        let sum = u16::from(self.a) + u16::from(value) + u16::from(carry_in);
        let result = sum as u8;
        self.set_flag(flags::V, (self.a ^ result) & (value ^ result) & 0x80 != 0);
        self.set_flag(flags::C, sum > 0xFF);
        self.set_zn(result);
        self.a = result;
    }

    /// Compare a register with the fetched operand (CMP/CPX/CPY/DCP).
    fn compare(&mut self, reg: u8, value: u8) {
        self.set_flag(flags::C, reg >= value);
        self.set_flag(flags::Z, reg == value);
        self.set_flag(flags::N, reg.wrapping_sub(value) & 0x80 != 0);
    }

    /// Branch on `condition`: +1 cycle taken, +2 taken across a page.
    fn branch(&mut self, condition: bool) -> u8 {
        if !condition {
            return 0;
        }
        let old_pc = self.pc;
        self.pc = old_pc.wrapping_add(self.fetched as i8 as u16);
        1 + u8::from((self.pc & 0xFF00) != (old_pc & 0xFF00))
    }

    /// Run the instruction handler for the decoded opcode.
    pub(crate) fn execute(&mut self, op: Op, bus: &mut impl Bus) -> u8 {
        match op {
            // Loads and stores
            Op::Lda => {
                self.a = self.fetched;
                self.set_zn(self.a);
                1
            }
            Op::Ldx => {
                self.x = self.fetched;
                self.set_zn(self.x);
                1
            }
            Op::Ldy => {
                self.y = self.fetched;
                self.set_zn(self.y);
                1
            }
            Op::Sta => {
                bus.write(self.addr, self.a);
                0
            }
            Op::Stx => {
                bus.write(self.addr, self.x);
                0
            }
            Op::Sty => {
                bus.write(self.addr, self.y);
                0
            }

            // Register transfers
            Op::Tax => {
                self.x = self.a;
                self.set_zn(self.x);
                0
            }
            Op::Tay => {
                self.y = self.a;
                self.set_zn(self.y);
                0
            }
            Op::Txa => {
                self.a = self.x;
                self.set_zn(self.a);
                0
            }
            Op::Tya => {
                self.a = self.y;
                self.set_zn(self.a);
                0
            }
            Op::Tsx => {
                self.x = self.sp;
                self.set_zn(self.x);
                0
            }
            Op::Txs => {
                // The only transfer that sets no flags
                self.sp = self.x;
                0
            }

            // Stack
            Op::Pha => {
                self.push(bus, self.a);
                0
            }
            Op::Php => {
                // B and U read as set in the pushed copy
                self.push(bus, self.p | flags::B | flags::U);
                0
            }
            Op::Pla => {
                self.a = self.pull(bus);
                self.set_zn(self.a);
                0
            }
            Op::Plp => {
                self.p = self.pull(bus) & !(flags::B | flags::U);
                0
            }

            // Logical
            Op::And => {
                self.a &= self.fetched;
                self.set_zn(self.a);
                1
            }
            Op::Eor => {
                self.a ^= self.fetched;
                self.set_zn(self.a);
                1
            }
            Op::Ora => {
                self.a |= self.fetched;
                self.set_zn(self.a);
                1
            }
            Op::Bit => {
                self.set_flag(flags::Z, self.a & self.fetched == 0);
                self.set_flag(flags::V, self.fetched & 0x40 != 0);
                self.set_flag(flags::N, self.fetched & 0x80 != 0);
                0
            }

            // Arithmetic
            Op::Adc => {
                self.add_to_a(self.fetched, self.flag(flags::C));
                1
            }
            Op::Sbc => {
                // A - M - (1 - C) == A + !M + C in two's complement
                self.add_to_a(!self.fetched, self.flag(flags::C));
                1
            }
            Op::Cmp => {
                self.compare(self.a, self.fetched);
                1
            }
            Op::Cpx => {
                self.compare(self.x, self.fetched);
                0
            }
            Op::Cpy => {
                self.compare(self.y, self.fetched);
                0
            }

            // Increment and decrement
            Op::Inc => {
                let value = self.fetched.wrapping_add(1);
                bus.write(self.addr, value);
                self.set_zn(value);
                0
            }
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_zn(self.x);
                0
            }
            Op::Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_zn(self.y);
                0
            }
            Op::Dec => {
                let value = self.fetched.wrapping_sub(1);
                bus.write(self.addr, value);
                self.set_zn(value);
                0
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_zn(self.x);
                0
            }
            Op::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_zn(self.y);
                0
            }

            // Shifts and rotates
            Op::Asl => {
                let carry = self.fetched & 0x80 != 0;
                let value = self.fetched << 1;
                bus.write(self.addr, value);
                self.set_flag(flags::C, carry);
                self.set_zn(value);
                0
            }
            Op::AslA => {
                let carry = self.a & 0x80 != 0;
                self.a <<= 1;
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }
            Op::Lsr => {
                let carry = self.fetched & 0x01 != 0;
                let value = self.fetched >> 1;
                bus.write(self.addr, value);
                self.set_flag(flags::C, carry);
                self.set_zn(value);
                0
            }
            Op::LsrA => {
                let carry = self.a & 0x01 != 0;
                self.a >>= 1;
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }
            Op::Rol => {
                let carry = self.fetched & 0x80 != 0;
                let value = (self.fetched << 1) | u8::from(self.flag(flags::C));
                bus.write(self.addr, value);
                self.set_flag(flags::C, carry);
                self.set_zn(value);
                0
            }
            Op::RolA => {
                let carry = self.a & 0x80 != 0;
                self.a = (self.a << 1) | u8::from(self.flag(flags::C));
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }
            Op::Ror => {
                let carry = self.fetched & 0x01 != 0;
                let value = (self.fetched >> 1) | (u8::from(self.flag(flags::C)) << 7);
                bus.write(self.addr, value);
                self.set_flag(flags::C, carry);
                self.set_zn(value);
                0
            }
            Op::RorA => {
                let carry = self.a & 0x01 != 0;
                self.a = (self.a >> 1) | (u8::from(self.flag(flags::C)) << 7);
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }

            // Jumps and calls
            Op::Jmp => {
                self.pc = self.addr;
                0
            }
            Op::Jsr => {
                // The pushed return address is one less than the next
                // instruction; RTS compensates.
                let ret = self.pc.wrapping_sub(1);
                self.push(bus, (ret >> 8) as u8);
                self.push(bus, ret as u8);
                self.pc = self.addr;
                0
            }
            Op::Rts => {
                let low = self.pull(bus);
                let high = self.pull(bus);
                self.pc = u16::from_le_bytes([low, high]).wrapping_add(1);
                0
            }

            // Branches
            Op::Bcc => {
                let taken = !self.flag(flags::C);
                self.branch(taken)
            }
            Op::Bcs => {
                let taken = self.flag(flags::C);
                self.branch(taken)
            }
            Op::Bne => {
                let taken = !self.flag(flags::Z);
                self.branch(taken)
            }
            Op::Beq => {
                let taken = self.flag(flags::Z);
                self.branch(taken)
            }
            Op::Bpl => {
                let taken = !self.flag(flags::N);
                self.branch(taken)
            }
            Op::Bmi => {
                let taken = self.flag(flags::N);
                self.branch(taken)
            }
            Op::Bvc => {
                let taken = !self.flag(flags::V);
                self.branch(taken)
            }
            Op::Bvs => {
                let taken = self.flag(flags::V);
                self.branch(taken)
            }

            // Status flags
            Op::Clc => {
                self.set_flag(flags::C, false);
                0
            }
            Op::Cld => {
                self.set_flag(flags::D, false);
                0
            }
            Op::Cli => {
                self.set_flag(flags::I, false);
                0
            }
            Op::Clv => {
                self.set_flag(flags::V, false);
                0
            }
            Op::Sec => {
                self.set_flag(flags::C, true);
                0
            }
            Op::Sed => {
                self.set_flag(flags::D, true);
                0
            }
            Op::Sei => {
                self.set_flag(flags::I, true);
                0
            }

            // System
            Op::Brk => {
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);
                self.push(bus, self.p | flags::B | flags::U);
                self.set_flag(flags::I, true);
                self.pc = self.read_word(bus, IRQ_VECTOR);
                0
            }
            Op::Nop => {
                // The multi-byte NOPs still pay the page-cross cycle
                1
            }
            Op::Rti => {
                self.p = self.pull(bus) & !(flags::B | flags::U);
                let low = self.pull(bus);
                let high = self.pull(bus);
                self.pc = u16::from_le_bytes([low, high]);
                0
            }

            // Undocumented
            Op::Lax => {
                self.a = self.fetched;
                self.x = self.fetched;
                self.set_zn(self.fetched);
                1
            }
            Op::Sax => {
                bus.write(self.addr, self.a & self.x);
                0
            }
            Op::Dcp => {
                let value = self.fetched.wrapping_sub(1);
                bus.write(self.addr, value);
                self.compare(self.a, value);
                0
            }
            Op::Isc => {
                let value = self.fetched.wrapping_add(1);
                bus.write(self.addr, value);
                self.add_to_a(!value, self.flag(flags::C));
                0
            }
            Op::Slo => {
                let carry = self.fetched & 0x80 != 0;
                let value = self.fetched << 1;
                bus.write(self.addr, value);
                self.a |= value;
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }
            Op::Rla => {
                let carry = self.fetched & 0x80 != 0;
                let value = (self.fetched << 1) | u8::from(self.flag(flags::C));
                bus.write(self.addr, value);
                self.a &= value;
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }
            Op::Sre => {
                let carry = self.fetched & 0x01 != 0;
                let value = self.fetched >> 1;
                bus.write(self.addr, value);
                self.a ^= value;
                self.set_flag(flags::C, carry);
                self.set_zn(self.a);
                0
            }
            Op::Rra => {
                // The rotated-out bit is the carry-in of the add
                let carry = self.fetched & 0x01 != 0;
                let value = (self.fetched >> 1) | (u8::from(self.flag(flags::C)) << 7);
                bus.write(self.addr, value);
                self.add_to_a(value, carry);
                0
            }

            // Intercepted at decode; never dispatched.
            Op::Jam => 0,
        }
    }
}
