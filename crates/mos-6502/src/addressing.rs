//! Addressing mode resolution.
//!
//! Each mode computes the effective address and the fetched operand for the
//! instruction that follows, advancing PC past the operand bytes. The
//! return value is the mode's extra-cycle eligibility: indexed modes return
//! 1 when the indexed address crosses a page, Relative returns 0b11 so that
//! branch handlers' +1/+2 survive the `mode & op` combination, everything
//! else returns 0.

use emu_core::Bus;

use crate::table::AddrMode;
use crate::Mos6502;

impl Mos6502 {
    /// Read the byte at PC and advance PC.
    pub(crate) fn fetch(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Fetch a little-endian word at PC.
    pub(crate) fn fetch_word(&mut self, bus: &mut impl Bus) -> u16 {
        let low = self.fetch(bus);
        let high = self.fetch(bus);
        u16::from_le_bytes([low, high])
    }

    /// Read a little-endian word from memory.
    pub(crate) fn read_word(&mut self, bus: &mut impl Bus, addr: u16) -> u16 {
        let low = bus.read(addr);
        let high = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Push a byte onto the stack at $0100+SP, post-decrementing SP.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(0x0100 | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Pull a byte from the stack, pre-incrementing SP.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(0x0100 | u16::from(self.sp))
    }

    /// Run the addressing mode for the current instruction.
    pub(crate) fn resolve(&mut self, mode: AddrMode, bus: &mut impl Bus) -> u8 {
        match mode {
            AddrMode::Imp => 0,
            AddrMode::Acc => {
                self.fetched = self.a;
                0
            }
            AddrMode::Imm => {
                self.fetched = self.fetch(bus);
                0
            }
            AddrMode::Zp0 => {
                self.addr = u16::from(self.fetch(bus));
                self.fetched = bus.read(self.addr);
                0
            }
            AddrMode::Zpx => {
                // The add wraps within page 0
                self.addr = u16::from(self.fetch(bus).wrapping_add(self.x));
                self.fetched = bus.read(self.addr);
                0
            }
            AddrMode::Zpy => {
                self.addr = u16::from(self.fetch(bus).wrapping_add(self.y));
                self.fetched = bus.read(self.addr);
                0
            }
            AddrMode::Rel => {
                // Signed offset, consumed by the branch handler
                self.fetched = self.fetch(bus);
                0x03
            }
            AddrMode::Abs => {
                self.addr = self.fetch_word(bus);
                self.fetched = bus.read(self.addr);
                0
            }
            AddrMode::Abx => {
                let base = self.fetch_word(bus);
                self.addr = base.wrapping_add(u16::from(self.x));
                self.fetched = bus.read(self.addr);
                u8::from((base & 0xFF00) != (self.addr & 0xFF00))
            }
            AddrMode::Aby => {
                let base = self.fetch_word(bus);
                self.addr = base.wrapping_add(u16::from(self.y));
                self.fetched = bus.read(self.addr);
                u8::from((base & 0xFF00) != (self.addr & 0xFF00))
            }
            AddrMode::Ind => {
                // JMP only. If the pointer sits at $xxFF the high byte is
                // fetched from $xx00, not the next page.
                let ptr = self.fetch_word(bus);
                self.addr = if ptr & 0x00FF == 0x00FF {
                    let low = bus.read(ptr);
                    let high = bus.read(ptr & 0xFF00);
                    u16::from_le_bytes([low, high])
                } else {
                    self.read_word(bus, ptr)
                };
                self.fetched = bus.read(self.addr);
                0
            }
            AddrMode::Izx => {
                let zp = self.fetch(bus);
                let low = bus.read(u16::from(zp.wrapping_add(self.x)));
                let high = bus.read(u16::from(zp.wrapping_add(self.x).wrapping_add(1)));
                self.addr = u16::from_le_bytes([low, high]);
                self.fetched = bus.read(self.addr);
                0
            }
            AddrMode::Izy => {
                let zp = self.fetch(bus);
                let low = bus.read(u16::from(zp));
                let high = bus.read(u16::from(zp.wrapping_add(1)));
                let base = u16::from_le_bytes([low, high]);
                self.addr = base.wrapping_add(u16::from(self.y));
                self.fetched = bus.read(self.addr);
                u8::from((base & 0xFF00) != (self.addr & 0xFF00))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use emu_core::{Bus, SimpleBus};

    use crate::Mos6502;

    fn cpu_at(bus: &mut SimpleBus, program: &[u8]) -> Mos6502 {
        bus.load(0x8000, program);
        bus.write(0xFFFC, 0x00);
        bus.write(0xFFFD, 0x80);
        let mut cpu = Mos6502::new();
        cpu.reset(bus);
        cpu
    }

    #[test]
    fn zero_page_x_wraps() {
        let mut bus = SimpleBus::new();
        bus.write(0x007F, 0x42);
        // LDX #$FF; LDA $80,X  →  $80 + $FF wraps to $7F
        let mut cpu = cpu_at(&mut bus, &[0xA2, 0xFF, 0xB5, 0x80]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a(), 0x42);
    }

    #[test]
    fn indexed_indirect_wraps_pointer() {
        let mut bus = SimpleBus::new();
        // Pointer bytes at $00FF and $0000 (wrap)
        bus.write(0x00FF, 0x34);
        bus.write(0x0000, 0x12);
        bus.write(0x1234, 0x99);
        // LDX #$0F; LDA ($F0,X)  →  pointer at $FF/$00
        let mut cpu = cpu_at(&mut bus, &[0xA2, 0x0F, 0xA1, 0xF0]);
        cpu.step(&mut bus);
        cpu.step(&mut bus);
        assert_eq!(cpu.a(), 0x99);
    }

    #[test]
    fn jmp_indirect_page_boundary_bug() {
        let mut bus = SimpleBus::new();
        // Pointer at $02FF: low byte $34 there, high byte from $0200 (bug)
        bus.write(0x02FF, 0x34);
        bus.write(0x0200, 0x12);
        bus.write(0x0300, 0x56); // would be used without the bug
        let mut cpu = cpu_at(&mut bus, &[0x6C, 0xFF, 0x02]);
        cpu.step(&mut bus);
        assert_eq!(cpu.pc(), 0x1234);
    }
}
