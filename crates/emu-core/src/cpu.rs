//! CPU core trait.

use crate::Bus;

/// A CPU core driven by a master clock.
///
/// CPUs access memory through a bus passed into every entry point; the
/// machine that owns both decides how they are wired. A CPU is either idle
/// (between instructions) or part-way through one; interrupts are only
/// accepted while idle.
pub trait Cpu<B: Bus> {
    /// Advance the CPU by one cycle of work.
    fn cycle(&mut self, bus: &mut B);

    /// Complete any in-flight instruction, then run exactly one more.
    fn step(&mut self, bus: &mut B);

    /// Reset the CPU to its initial state.
    fn reset(&mut self, bus: &mut B);

    /// Request a maskable interrupt. Ignored while interrupts are disabled.
    fn irq(&mut self, bus: &mut B);

    /// Request a non-maskable interrupt.
    fn nmi(&mut self, bus: &mut B);

    /// Current program counter.
    fn pc(&self) -> u16;

    /// True between instructions, when an interrupt can be taken.
    fn is_idle(&self) -> bool;
}
