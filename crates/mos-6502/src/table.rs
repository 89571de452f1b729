//! Instruction set opcode matrix.
//!
//! All 256 opcode slots are defined: the documented set, the undocumented
//! opcodes games actually use (LAX, SAX, DCP, ISC, SLO, RLA, SRE, RRA, the
//! multi-byte NOPs, the $EB SBC alias), and `Jam` for the slots with no
//! defined behavior. Base cycle counts per the Rockwell R650x matrix;
//! page-cross and branch extras are added at execution time.

use self::AddrMode::*;
use self::Op::*;

/// Instruction family. One variant per handler; opcodes sharing a handler
/// (e.g. the five LDA encodings) share a variant and differ only in
/// addressing mode and cycle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    // Load/store
    Lda, Ldx, Ldy, Sta, Stx, Sty,
    // Register transfers
    Tax, Tay, Txa, Tya, Tsx, Txs,
    // Stack
    Pha, Php, Pla, Plp,
    // Logical
    And, Eor, Ora, Bit,
    // Arithmetic
    Adc, Sbc, Cmp, Cpx, Cpy,
    // Increment/decrement
    Inc, Inx, Iny, Dec, Dex, Dey,
    // Shifts and rotates, memory and accumulator variants
    Asl, AslA, Lsr, LsrA, Rol, RolA, Ror, RorA,
    // Jumps and calls
    Jmp, Jsr, Rts,
    // Branches
    Bcc, Bcs, Bne, Beq, Bpl, Bmi, Bvc, Bvs,
    // Status flags
    Clc, Cld, Cli, Clv, Sec, Sed, Sei,
    // System
    Brk, Nop, Rti,
    // Undocumented
    Lax, Sax, Dcp, Isc, Slo, Rla, Sre, Rra,
    // Undefined slot: halts the CPU
    Jam,
}

/// Addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddrMode {
    /// Implicit: the instruction itself names its operands.
    Imp,
    /// Accumulator: the operand is A.
    Acc,
    /// Immediate: the operand is the byte after the opcode.
    Imm,
    /// Zero page: one-byte address.
    Zp0,
    /// Zero page indexed by X, wrapping within page 0.
    Zpx,
    /// Zero page indexed by Y, wrapping within page 0.
    Zpy,
    /// Relative: signed 8-bit branch offset.
    Rel,
    /// Absolute: two-byte address.
    Abs,
    /// Absolute indexed by X; +1 cycle on page cross.
    Abx,
    /// Absolute indexed by Y; +1 cycle on page cross.
    Aby,
    /// Indirect (JMP only), with the page-boundary hardware bug.
    Ind,
    /// Indexed indirect: (zp + X) pointer, wrapping within page 0.
    Izx,
    /// Indirect indexed: (zp) pointer + Y; +1 cycle on page cross.
    Izy,
}

/// One decode table entry.
pub(crate) struct Opcode {
    pub name: &'static str,
    pub op: Op,
    pub mode: AddrMode,
    pub cycles: u8,
}

const fn e(name: &'static str, op: Op, mode: AddrMode, cycles: u8) -> Opcode {
    Opcode { name, op, mode, cycles }
}

#[rustfmt::skip]
pub(crate) static OPCODES: [Opcode; 256] = [
    // 0x00
    e("BRK", Brk, Imp, 7), e("ORA", Ora, Izx, 6), e("JAM", Jam, Imp, 0), e("SLO", Slo, Izx, 8),
    e("NOP", Nop, Zp0, 3), e("ORA", Ora, Zp0, 3), e("ASL", Asl, Zp0, 5), e("SLO", Slo, Zp0, 5),
    e("PHP", Php, Imp, 3), e("ORA", Ora, Imm, 2), e("ASL", AslA, Acc, 2), e("JAM", Jam, Imp, 0),
    e("NOP", Nop, Abs, 4), e("ORA", Ora, Abs, 4), e("ASL", Asl, Abs, 6), e("SLO", Slo, Abs, 6),
    // 0x10
    e("BPL", Bpl, Rel, 2), e("ORA", Ora, Izy, 5), e("JAM", Jam, Imp, 0), e("SLO", Slo, Izy, 8),
    e("NOP", Nop, Zpx, 4), e("ORA", Ora, Zpx, 4), e("ASL", Asl, Zpx, 6), e("SLO", Slo, Zpx, 6),
    e("CLC", Clc, Imp, 2), e("ORA", Ora, Aby, 4), e("NOP", Nop, Imp, 2), e("SLO", Slo, Aby, 7),
    e("NOP", Nop, Abx, 4), e("ORA", Ora, Abx, 4), e("ASL", Asl, Abx, 7), e("SLO", Slo, Abx, 7),
    // 0x20
    e("JSR", Jsr, Abs, 6), e("AND", And, Izx, 6), e("JAM", Jam, Imp, 0), e("RLA", Rla, Izx, 8),
    e("BIT", Bit, Zp0, 3), e("AND", And, Zp0, 3), e("ROL", Rol, Zp0, 5), e("RLA", Rla, Zp0, 5),
    e("PLP", Plp, Imp, 4), e("AND", And, Imm, 2), e("ROL", RolA, Acc, 2), e("JAM", Jam, Imp, 0),
    e("BIT", Bit, Abs, 4), e("AND", And, Abs, 4), e("ROL", Rol, Abs, 6), e("RLA", Rla, Abs, 6),
    // 0x30
    e("BMI", Bmi, Rel, 2), e("AND", And, Izy, 5), e("JAM", Jam, Imp, 0), e("RLA", Rla, Izy, 8),
    e("NOP", Nop, Zpx, 4), e("AND", And, Zpx, 4), e("ROL", Rol, Zpx, 6), e("RLA", Rla, Zpx, 6),
    e("SEC", Sec, Imp, 2), e("AND", And, Aby, 4), e("NOP", Nop, Imp, 2), e("RLA", Rla, Aby, 7),
    e("NOP", Nop, Abx, 4), e("AND", And, Abx, 4), e("ROL", Rol, Abx, 7), e("RLA", Rla, Abx, 7),
    // 0x40
    e("RTI", Rti, Imp, 6), e("EOR", Eor, Izx, 6), e("JAM", Jam, Imp, 0), e("SRE", Sre, Izx, 8),
    e("NOP", Nop, Zp0, 3), e("EOR", Eor, Zp0, 3), e("LSR", Lsr, Zp0, 5), e("SRE", Sre, Zp0, 5),
    e("PHA", Pha, Imp, 3), e("EOR", Eor, Imm, 2), e("LSR", LsrA, Acc, 2), e("JAM", Jam, Imp, 0),
    e("JMP", Jmp, Abs, 3), e("EOR", Eor, Abs, 4), e("LSR", Lsr, Abs, 6), e("SRE", Sre, Abs, 6),
    // 0x50
    e("BVC", Bvc, Rel, 2), e("EOR", Eor, Izy, 5), e("JAM", Jam, Imp, 0), e("SRE", Sre, Izy, 8),
    e("NOP", Nop, Zpx, 4), e("EOR", Eor, Zpx, 4), e("LSR", Lsr, Zpx, 6), e("SRE", Sre, Zpx, 6),
    e("CLI", Cli, Imp, 2), e("EOR", Eor, Aby, 4), e("NOP", Nop, Imp, 2), e("SRE", Sre, Aby, 7),
    e("NOP", Nop, Abx, 4), e("EOR", Eor, Abx, 4), e("LSR", Lsr, Abx, 7), e("SRE", Sre, Abx, 7),
    // 0x60
    e("RTS", Rts, Imp, 6), e("ADC", Adc, Izx, 6), e("JAM", Jam, Imp, 0), e("RRA", Rra, Izx, 8),
    e("NOP", Nop, Zp0, 3), e("ADC", Adc, Zp0, 3), e("ROR", Ror, Zp0, 5), e("RRA", Rra, Zp0, 5),
    e("PLA", Pla, Imp, 4), e("ADC", Adc, Imm, 2), e("ROR", RorA, Acc, 2), e("JAM", Jam, Imp, 0),
    e("JMP", Jmp, Ind, 5), e("ADC", Adc, Abs, 4), e("ROR", Ror, Abs, 6), e("RRA", Rra, Abs, 6),
    // 0x70
    e("BVS", Bvs, Rel, 2), e("ADC", Adc, Izy, 5), e("JAM", Jam, Imp, 0), e("RRA", Rra, Izy, 8),
    e("NOP", Nop, Zpx, 4), e("ADC", Adc, Zpx, 4), e("ROR", Ror, Zpx, 6), e("RRA", Rra, Zpx, 6),
    e("SEI", Sei, Imp, 2), e("ADC", Adc, Aby, 4), e("NOP", Nop, Imp, 2), e("RRA", Rra, Aby, 7),
    e("NOP", Nop, Abx, 4), e("ADC", Adc, Abx, 4), e("ROR", Ror, Abx, 7), e("RRA", Rra, Abx, 7),
    // 0x80
    e("NOP", Nop, Imm, 2), e("STA", Sta, Izx, 6), e("JAM", Jam, Imp, 0), e("SAX", Sax, Izx, 6),
    e("STY", Sty, Zp0, 3), e("STA", Sta, Zp0, 3), e("STX", Stx, Zp0, 3), e("SAX", Sax, Zp0, 3),
    e("DEY", Dey, Imp, 2), e("JAM", Jam, Imp, 0), e("TXA", Txa, Imp, 2), e("JAM", Jam, Imp, 0),
    e("STY", Sty, Abs, 4), e("STA", Sta, Abs, 4), e("STX", Stx, Abs, 4), e("SAX", Sax, Abs, 4),
    // 0x90
    e("BCC", Bcc, Rel, 2), e("STA", Sta, Izy, 6), e("JAM", Jam, Imp, 0), e("JAM", Jam, Imp, 0),
    e("STY", Sty, Zpx, 4), e("STA", Sta, Zpx, 4), e("STX", Stx, Zpy, 4), e("SAX", Sax, Zpy, 4),
    e("TYA", Tya, Imp, 2), e("STA", Sta, Aby, 5), e("TXS", Txs, Imp, 2), e("JAM", Jam, Imp, 0),
    e("JAM", Jam, Imp, 0), e("STA", Sta, Abx, 5), e("JAM", Jam, Imp, 0), e("JAM", Jam, Imp, 0),
    // 0xA0
    e("LDY", Ldy, Imm, 2), e("LDA", Lda, Izx, 6), e("LDX", Ldx, Imm, 2), e("LAX", Lax, Izx, 6),
    e("LDY", Ldy, Zp0, 3), e("LDA", Lda, Zp0, 3), e("LDX", Ldx, Zp0, 3), e("LAX", Lax, Zp0, 3),
    e("TAY", Tay, Imp, 2), e("LDA", Lda, Imm, 2), e("TAX", Tax, Imp, 2), e("LAX", Lax, Imm, 2),
    e("LDY", Ldy, Abs, 4), e("LDA", Lda, Abs, 4), e("LDX", Ldx, Abs, 4), e("LAX", Lax, Abs, 4),
    // 0xB0
    e("BCS", Bcs, Rel, 2), e("LDA", Lda, Izy, 5), e("JAM", Jam, Imp, 0), e("LAX", Lax, Izy, 5),
    e("LDY", Ldy, Zpx, 4), e("LDA", Lda, Zpx, 4), e("LDX", Ldx, Zpy, 4), e("LAX", Lax, Zpy, 4),
    e("CLV", Clv, Imp, 2), e("LDA", Lda, Aby, 4), e("TSX", Tsx, Imp, 2), e("JAM", Jam, Imp, 0),
    e("LDY", Ldy, Abx, 4), e("LDA", Lda, Abx, 4), e("LDX", Ldx, Aby, 4), e("LAX", Lax, Aby, 4),
    // 0xC0
    e("CPY", Cpy, Imm, 2), e("CMP", Cmp, Izx, 6), e("JAM", Jam, Imp, 0), e("DCP", Dcp, Izx, 8),
    e("CPY", Cpy, Zp0, 3), e("CMP", Cmp, Zp0, 3), e("DEC", Dec, Zp0, 5), e("DCP", Dcp, Zp0, 5),
    e("INY", Iny, Imp, 2), e("CMP", Cmp, Imm, 2), e("DEX", Dex, Imp, 2), e("JAM", Jam, Imp, 0),
    e("CPY", Cpy, Abs, 4), e("CMP", Cmp, Abs, 4), e("DEC", Dec, Abs, 6), e("DCP", Dcp, Abs, 6),
    // 0xD0
    e("BNE", Bne, Rel, 2), e("CMP", Cmp, Izy, 5), e("JAM", Jam, Imp, 0), e("DCP", Dcp, Izy, 8),
    e("NOP", Nop, Zpx, 4), e("CMP", Cmp, Zpx, 4), e("DEC", Dec, Zpx, 6), e("DCP", Dcp, Zpx, 6),
    e("CLD", Cld, Imp, 2), e("CMP", Cmp, Aby, 4), e("NOP", Nop, Imp, 2), e("DCP", Dcp, Aby, 7),
    e("NOP", Nop, Abx, 4), e("CMP", Cmp, Abx, 4), e("DEC", Dec, Abx, 7), e("DCP", Dcp, Abx, 7),
    // 0xE0
    e("CPX", Cpx, Imm, 2), e("SBC", Sbc, Izx, 6), e("JAM", Jam, Imp, 0), e("ISC", Isc, Izx, 8),
    e("CPX", Cpx, Zp0, 3), e("SBC", Sbc, Zp0, 3), e("INC", Inc, Zp0, 5), e("ISC", Isc, Zp0, 5),
    e("INX", Inx, Imp, 2), e("SBC", Sbc, Imm, 2), e("NOP", Nop, Imp, 2), e("SBC", Sbc, Imm, 2),
    e("CPX", Cpx, Abs, 4), e("SBC", Sbc, Abs, 4), e("INC", Inc, Abs, 6), e("ISC", Isc, Abs, 6),
    // 0xF0
    e("BEQ", Beq, Rel, 2), e("SBC", Sbc, Izy, 5), e("JAM", Jam, Imp, 0), e("ISC", Isc, Izy, 8),
    e("NOP", Nop, Zpx, 4), e("SBC", Sbc, Zpx, 4), e("INC", Inc, Zpx, 6), e("ISC", Isc, Zpx, 6),
    e("SED", Sed, Imp, 2), e("SBC", Sbc, Aby, 4), e("NOP", Nop, Imp, 2), e("ISC", Isc, Aby, 7),
    e("NOP", Nop, Abx, 4), e("SBC", Sbc, Abx, 4), e("INC", Inc, Abx, 7), e("ISC", Isc, Abx, 7),
];
