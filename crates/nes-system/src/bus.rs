//! CPU-side address routing.
//!
//! Memory map:
//! - `$0000-$07FF`: 2 KiB internal RAM
//! - `$0800-$1FFF`: mirrors of RAM
//! - `$2000-$2007`: PPU registers
//! - `$2008-$3FFF`: mirrors of the PPU registers
//! - `$4000-$4017`: APU and I/O registers ($4016/$4017 controllers)
//! - `$4018-$401F`: normally disabled APU test mode
//! - `$4020-$FFFF`: cartridge PRG

use emu_core::Bus;

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::memory::MirroredRam;
use crate::ppu::Ppu;

/// The NES CPU bus, implementing `emu_core::Bus`.
pub struct NesBus {
    pub ram: MirroredRam<2048>,
    pub ppu: Ppu,
    pub apu: Apu,
    pub cartridge: Cartridge,
    pub controller1: Controller,
    pub controller2: Controller,
}

impl NesBus {
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            ram: MirroredRam::new(),
            ppu: Ppu::new(cartridge.mirroring()),
            apu: Apu::new(),
            cartridge,
            controller1: Controller::new(),
            controller2: Controller::new(),
        }
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x2000..=0x3FFF => self.ppu.cpu_read(addr & 0x0007, &self.cartridge),
            0x4016 => self.controller1.read(),
            0x4017 => self.controller2.read(),
            0x4000..=0x401F => self.apu.read(addr),
            0x4020..=0xFFFF => self.cartridge.prg_read(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram.write(addr, value),
            0x2000..=0x3FFF => {
                self.ppu.cpu_write(addr & 0x0007, value, &mut self.cartridge);
            }
            0x4016 => {
                // One strobe line feeds both controllers
                self.controller1.write(value);
                self.controller2.write(value);
            }
            0x4000..=0x401F => self.apu.write(addr, value),
            0x4020..=0xFFFF => self.cartridge.prg_write(addr, value),
        }
    }
}
