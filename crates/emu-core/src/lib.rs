//! Core traits and types for cycle-accurate emulation.
//!
//! Everything ticks at the master clock frequency. All component timing
//! derives from this. No exceptions.

mod bus;
mod cpu;
mod tickable;
mod ticks;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use tickable::Tickable;
pub use ticks::Ticks;
