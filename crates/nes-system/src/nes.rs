//! The NES system: master clock, CPU/PPU interleaving, NMI plumbing.
//!
//! The master clock runs at the PPU dot rate. Each `cycle()` ticks the PPU
//! one dot, every fourth cycle also ticks the CPU, and a VBlank NMI
//! latched by the PPU is handed to the CPU at its next instruction
//! boundary. The ordering inside `cycle()` (PPU first, then CPU, then NMI
//! delivery, then the counter) is a contract: an NMI raised at the dot
//! that sets VBlank must not reach the CPU before the flag is visible.

use emu_core::{Bus, Tickable};
use mos_6502::{Jam, Mos6502};

use crate::bus::NesBus;
use crate::cartridge::{Cartridge, CartridgeError};
use crate::controller::{Button, Port};
use crate::image::Image;
use crate::input::InputQueue;
use crate::ppu::Ppu;

/// CPU cycles run at a quarter of the master (dot) clock.
const CPU_DIVISOR: u64 = 4;

/// Start of the PRG window; programs that leave it have quiesced.
const ROM_START: u16 = 0x8000;

/// The console: CPU, bus-attached devices, and the master clock.
pub struct Nes {
    cpu: Mos6502,
    bus: NesBus,
    /// NMI latched from the PPU, awaiting an instruction boundary.
    nmi_pending: bool,
    /// Master clock tick count.
    clock_counter: u64,
    /// Scripted button events, applied at frame boundaries.
    input_queue: InputQueue,
}

impl Nes {
    /// Build a system around a parsed cartridge and reset it.
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        let mut nes = Self {
            cpu: Mos6502::new(),
            bus: NesBus::new(cartridge),
            nmi_pending: false,
            clock_counter: 0,
            input_queue: InputQueue::new(),
        };
        nes.reset();
        nes
    }

    /// Parse an iNES image and build a system around it.
    ///
    /// # Errors
    ///
    /// Returns a [`CartridgeError`] if the image is malformed or needs an
    /// unsupported mapper.
    pub fn from_ines(data: &[u8]) -> Result<Self, CartridgeError> {
        Cartridge::from_ines(data).map(Self::new)
    }

    /// Reset the CPU (through the vector at `$FFFC`) and the PPU.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.ppu.reset();
        self.nmi_pending = false;
    }

    /// Advance the master clock one tick.
    pub fn cycle(&mut self) {
        self.bus.ppu.tick();
        if self.bus.ppu.take_nmi() {
            self.nmi_pending = true;
        }

        if self.clock_counter % CPU_DIVISOR == 0 {
            self.cpu.cycle(&mut self.bus);
        }

        if self.nmi_pending && self.cpu.is_idle() && self.cpu.jam().is_none() {
            self.cpu.nmi(&mut self.bus);
            self.nmi_pending = false;
        }

        self.clock_counter += 1;
    }

    /// Run the master clock until the PPU reports a completed frame.
    ///
    /// Scripted input events due for this frame are applied to controller 1
    /// before the first tick.
    pub fn run_until_frame(&mut self) {
        self.input_queue
            .process(self.bus.ppu.frame_count(), &mut self.bus.controller1);
        loop {
            self.cycle();
            if self.bus.ppu.frame_completed() {
                break;
            }
        }
    }

    /// Complete the in-flight CPU instruction, then run exactly one more.
    ///
    /// This drives the CPU bus only (the PPU does not advance), which is
    /// what instruction-level test harnesses want.
    pub fn step(&mut self) {
        if self.nmi_pending && self.cpu.is_idle() && self.cpu.jam().is_none() {
            self.cpu.nmi(&mut self.bus);
            self.nmi_pending = false;
        }
        self.cpu.step(&mut self.bus);
    }

    /// False once the CPU has jammed or execution has fallen out of the
    /// PRG window (e.g. BRK through a zeroed vector).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cpu.jam().is_none() && self.cpu.pc() >= ROM_START
    }

    // === CPU and clock inspection ===

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.set_pc(pc);
    }

    /// Lifetime CPU cycle count (reset and interrupt sequences included).
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    /// Lifetime CPU instruction count.
    #[must_use]
    pub fn instructions(&self) -> u64 {
        self.cpu.instructions()
    }

    /// Master clock ticks since construction.
    #[must_use]
    pub fn clock_counter(&self) -> u64 {
        self.clock_counter
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame_count()
    }

    /// The CPU's illegal-opcode trap, if it hit one.
    #[must_use]
    pub fn jam(&self) -> Option<Jam> {
        self.cpu.jam()
    }

    /// The PPU, for timing inspection.
    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.bus.ppu
    }

    // === Bus access ===

    /// Read through the CPU bus (register side effects included).
    pub fn cpu_bus_read(&mut self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    /// Write through the CPU bus.
    pub fn cpu_bus_write(&mut self, addr: u16, value: u8) {
        self.bus.write(addr, value);
    }

    /// Read through the PPU bus.
    pub fn ppu_bus_read(&mut self, addr: u16) -> u8 {
        self.bus.ppu.bus_read(&self.bus.cartridge, addr)
    }

    /// Write through the PPU bus.
    pub fn ppu_bus_write(&mut self, addr: u16, value: u8) {
        self.bus.ppu.bus_write(&mut self.bus.cartridge, addr, value);
    }

    // === Input ===

    /// Update one button of one controller.
    pub fn set_button(&mut self, port: Port, button: Button, pressed: bool) {
        let controller = match port {
            Port::P1 => &mut self.bus.controller1,
            Port::P2 => &mut self.bus.controller2,
        };
        controller.set_button(button, pressed);
    }

    /// The scripted input queue (applied to controller 1 per frame).
    pub fn input_queue(&mut self) -> &mut InputQueue {
        &mut self.input_queue
    }

    // === Frame accessors ===

    /// Render the current frame (background approximation).
    #[must_use]
    pub fn render_frame(&self) -> Image {
        self.bus.ppu.render_background(&self.bus.cartridge)
    }

    /// Render a pattern table through a palette.
    #[must_use]
    pub fn render_pattern_table(&self, table: u8, palette: u8) -> Image {
        self.bus.ppu.render_pattern_table(&self.bus.cartridge, table, palette)
    }

    /// Render one nametable.
    #[must_use]
    pub fn render_nametable(&self, idx: u8) -> Image {
        self.bus.ppu.render_nametable(&self.bus.cartridge, idx)
    }
}

impl Tickable for Nes {
    fn tick(&mut self) {
        self.cycle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Mirroring;

    /// 32 KiB of NOPs with the reset vector at $8000.
    fn make_nes() -> Nes {
        let mut prg = vec![0xEA; 0x8000];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        let cart = Cartridge::new(prg, vec![0; 0x2000], 0, Mirroring::Horizontal).expect("NROM");
        Nes::new(cart)
    }

    #[test]
    fn reset_reads_the_vector() {
        let nes = make_nes();
        assert_eq!(nes.pc(), 0x8000);
    }

    #[test]
    fn cpu_runs_every_fourth_master_tick() {
        let mut nes = make_nes();
        // 28 master ticks = 7 CPU cycles: exactly the reset sequence
        for _ in 0..28 {
            nes.cycle();
        }
        assert_eq!(nes.cycles(), 7);
        assert_eq!(nes.instructions(), 0);
        // Two more CPU cycles complete the first NOP
        for _ in 0..8 {
            nes.cycle();
        }
        assert_eq!(nes.cycles(), 9);
        assert_eq!(nes.instructions(), 1);
    }

    #[test]
    fn run_until_frame_stops_at_frame_boundary() {
        let mut nes = make_nes();
        nes.run_until_frame();
        assert_eq!(nes.frame_count(), 1);
        assert_eq!(nes.ppu().scanline(), -1);
        nes.run_until_frame();
        assert_eq!(nes.frame_count(), 2);
    }

    #[test]
    fn ram_mirror_round_trip() {
        let mut nes = make_nes();
        for (addr, value) in [(0x0000u16, 0x11u8), (0x07FF, 0x22), (0x0455, 0x33)] {
            nes.cpu_bus_write(addr, value);
            for n in 0..4u16 {
                assert_eq!(nes.cpu_bus_read(addr + n * 0x0800), value);
            }
        }
    }

    #[test]
    fn palette_alias_through_ppu_bus() {
        let mut nes = make_nes();
        nes.ppu_bus_write(0x3F10, 0x2A);
        assert_eq!(nes.ppu_bus_read(0x3F00), 0x2A);
    }

    #[test]
    fn ticks_through_the_tickable_trait() {
        let mut nes = make_nes();
        nes.tick();
        assert_eq!(nes.clock_counter(), 1);
    }

    #[test]
    fn buttons_reach_the_selected_port() {
        let mut nes = make_nes();
        nes.set_button(Port::P1, Button::A, true);
        nes.set_button(Port::P2, Button::Start, true);
        nes.cpu_bus_write(0x4016, 1);
        nes.cpu_bus_write(0x4016, 0);
        assert_eq!(nes.cpu_bus_read(0x4016), 1); // P1 A pressed
        assert_eq!(nes.cpu_bus_read(0x4017), 0); // P2 A not pressed
    }
}
