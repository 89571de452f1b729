//! Cycle-accurate NES core.
//!
//! The master clock ticks at the PPU dot rate: one tick advances the PPU by
//! one dot, and every fourth tick the CPU advances one cycle. One frame is
//! 341 dots × 262 scanlines. VBlank NMIs are latched by the system and
//! delivered to the CPU at the next instruction boundary.
//!
//! Only NROM (mapper 0) cartridges are supported. The APU and OAM
//! registers are stubs with stable interfaces; audio and sprite rendering
//! are out of scope.

mod apu;
mod bus;
pub mod capture;
mod cartridge;
mod controller;
mod image;
mod input;
mod memory;
mod nes;
pub mod ppu;

pub use bus::NesBus;
pub use cartridge::{parse_ines, Cartridge, CartridgeError, Mapper, Mirroring};
pub use controller::{Button, Controller, Port};
pub use image::{Image, Rgb};
pub use input::{InputEvent, InputQueue};
pub use memory::{MirroredRam, PaletteRam, Vram};
pub use nes::Nes;
pub use ppu::Ppu;
