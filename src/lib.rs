//! A Game Boy (DMG / SM83) CPU interpreter and the 16-bit bus it runs
//! against. [`Emulator`] is the single value that owns the CPU, the bus,
//! and every peripheral reachable through it — there is no process-wide
//! state anywhere in this crate (see `DESIGN.md`).
//!
//! The picture/audio/timer/joypad peripherals implemented here are
//! intentionally minimal: enough to satisfy the tick/IO contract the CPU
//! needs (VRAM/OAM storage, DIV/TIMA timing, register pass-through) without
//! attempting accurate picture or audio output. A real frontend is expected
//! to own the framebuffer and host windowing layer itself.

pub mod apu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod interrupt_system;
pub mod joypad;
pub mod memory;
pub mod ppu;
pub mod serial_port;
pub mod timer;
pub mod util;

use std::path::Path;

use bus::Bus;
use cartridge::Cartridge;
use cpu::{Cpu, Registers};
use error::LoadError;
use joypad::Buttons;

/// Scheduling state surrounding `step()`: whether the core should still be
/// driven at all, and whether the driver has cooperatively paused it. Does
/// not duplicate `Cpu::status` (HALT/STOP), which is about the CPU's own
/// execution state rather than the driver's.
#[derive(Debug, Copy, Clone)]
pub struct EmulatorContext {
    pub running: bool,
    pub paused: bool,
    pub ticks: u64,
}

/// Owns everything: register file, bus-routed memory, every peripheral, and
/// the loaded cartridge. Threading this single value through every
/// operation (rather than reaching for process-wide statics, as the
/// reference implementation this core was modeled on does) is what makes
/// the core safe to embed in a frontend of any shape.
pub struct Emulator {
    cpu: Cpu,
    bus: Bus,
    running: bool,
    paused: bool,
}

impl Emulator {
    pub fn init() -> Emulator {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::new(),
            running: true,
            paused: false,
        }
    }

    /// Loads a ROM file and installs it on the bus. A header-checksum
    /// mismatch is logged as a warning and does not fail the load (see
    /// `Cartridge::load`); only I/O errors and undersized files do.
    pub fn load_cartridge<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let cartridge = Cartridge::load(path)?;
        self.bus.cartridge = Some(cartridge);
        Ok(())
    }

    /// Runs one instruction (or services a pending interrupt, or idles one
    /// M-cycle while halted). Returns `false` once the core has locked up
    /// (invalid opcode, unsupported mapper write) or `stop()` was called;
    /// the caller should stop invoking `step` at that point. A paused
    /// emulator returns `true` without advancing anything.
    pub fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.paused {
            return true;
        }
        self.running = self.cpu.step(&mut self.bus);
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances every ticking peripheral by `n` M-cycles outside of a CPU
    /// instruction — a seam for a driver that needs to keep peripherals
    /// moving while the core is paused or between cartridge loads.
    pub fn add_cycles(&mut self, n: u32) {
        for _ in 0..n {
            self.bus.advance_mcycle();
        }
    }

    pub fn context(&self) -> EmulatorContext {
        EmulatorContext {
            running: self.running,
            paused: self.paused,
            ticks: self.bus.ticks,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.reg
    }

    pub fn status(&self) -> cpu::Status {
        self.cpu.status
    }

    pub fn ticks(&self) -> u64 {
        self.bus.ticks
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.bus.cartridge.as_ref()
    }

    /// Reads a byte off the bus without consuming a cycle — for inspectors
    /// and tests, not called from the fetch/execute path.
    pub fn peek(&self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    /// Call on a KEY_DOWN-equivalent event: `buttons` are newly pressed,
    /// everything else is left as it was. Mirrors the joypad plug-in
    /// contract of `spec.md` §6.
    pub fn notify_buttons_pressed(&mut self, buttons: Buttons) {
        let pressed = self.bus.joypad_pressed() | buttons;
        self.bus.set_buttons_pressed(pressed);
    }

    /// Call on a KEY_UP-equivalent event.
    pub fn notify_buttons_released(&mut self, buttons: Buttons) {
        let pressed = self.bus.joypad_pressed() & !buttons;
        self.bus.set_buttons_pressed(pressed);
    }
}

impl Default for Emulator {
    fn default() -> Emulator {
        Emulator::init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_emulator_is_running_and_not_paused() {
        let emu = Emulator::init();
        assert!(emu.is_running());
        assert!(!emu.context().paused);
    }

    #[test]
    fn stop_makes_the_next_step_return_false() {
        let mut emu = Emulator::init();
        emu.stop();
        assert!(!emu.step());
        assert!(!emu.is_running());
    }

    #[test]
    fn paused_step_does_not_advance_ticks() {
        let mut emu = Emulator::init();
        emu.pause();
        let before = emu.ticks();
        assert!(emu.step());
        assert_eq!(emu.ticks(), before);
    }

    #[test]
    fn add_cycles_advances_ticks_by_four_per_cycle() {
        let mut emu = Emulator::init();
        let before = emu.ticks();
        emu.add_cycles(3);
        assert_eq!(emu.ticks(), before + 12);
    }
}
