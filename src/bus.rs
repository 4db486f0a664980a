//! The 16-bit address space: routes every access to the region that owns
//! it, and advances every ticking peripheral once per M-cycle so timing
//! stays derived from real bus traffic instead of a table lookup.

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::interrupt_system::InterruptSystem;
use crate::joypad::{Buttons, Joypad};
use crate::memory::InternalMem;
use crate::ppu::Ppu;
use crate::serial_port::SerialPort;
use crate::timer::Timer;

pub struct Bus {
    pub cartridge: Option<Cartridge>,
    pub mem: InternalMem,
    pub ppu: Ppu,
    pub apu: Apu,
    pub timer: Timer,
    pub serial: SerialPort,
    pub joypad: Joypad,
    pub interrupts: InterruptSystem,
    /// Total T-cycles elapsed since power-on. Exposed for the frontend's
    /// frame-pacing loop; the core itself never reads it back.
    pub ticks: u64,
}

impl Bus {
    pub fn new() -> Bus {
        Bus {
            cartridge: None,
            mem: InternalMem::new(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            timer: Timer::new(),
            serial: SerialPort::new(),
            joypad: Joypad::new(),
            interrupts: InterruptSystem::new(),
            ticks: 0,
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match &self.cartridge {
                Some(cart) => cart.read(addr),
                None => {
                    log::warn!("read from {:#06X} with no cartridge loaded", addr);
                    0xFF
                }
            },
            0x8000..=0x9FFF => self.ppu.read_vram(addr - 0x8000),
            0xC000..=0xDFFF => self.mem.read_wram(addr - 0xC000),
            0xE000..=0xFDFF => self.mem.read_wram(addr - 0xE000),
            0xFE00..=0xFE9F => self.ppu.read_oam(addr - 0xFE00),
            0xFEA0..=0xFEFF => 0x00,
            0xFF00 => self.joypad.read_p1(),
            0xFF01 => self.serial.read_sb(),
            0xFF02 => self.serial.read_sc(),
            0xFF04 => self.timer.read_div(),
            0xFF05 => self.timer.read_tima(),
            0xFF06 => self.timer.read_tma(),
            0xFF07 => self.timer.read_tac(),
            0xFF0F => self.interrupts.read_if(),
            0xFF10..=0xFF3F => self.apu.read_reg(addr),
            0xFF40..=0xFF4B => self.ppu.read_reg(addr),
            0xFF80..=0xFFFE => self.mem.read_hram(addr - 0xFF80),
            0xFFFF => self.interrupts.read_ie(),
            _ => {
                log::warn!("read from unimplemented IO register {:#06X}", addr);
                0xFF
            }
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match &mut self.cartridge {
                Some(cart) => cart.write(addr, val),
                None => log::warn!("write to {:#06X}={:#04X} with no cartridge loaded", addr, val),
            },
            0x8000..=0x9FFF => self.ppu.write_vram(addr - 0x8000, val),
            0xC000..=0xDFFF => self.mem.write_wram(addr - 0xC000, val),
            0xE000..=0xFDFF => self.mem.write_wram(addr - 0xE000, val),
            0xFE00..=0xFE9F => self.ppu.write_oam(addr - 0xFE00, val),
            0xFEA0..=0xFEFF => {}
            0xFF00 => self.joypad.write_p1(val),
            0xFF01 => self.serial.write_sb(val),
            0xFF02 => self.serial.write_sc(val),
            0xFF04 => self.timer.write_div(),
            0xFF05 => self.timer.write_tima(val),
            0xFF06 => self.timer.write_tma(val),
            0xFF07 => self.timer.write_tac(val),
            0xFF0F => self.interrupts.write_if(val),
            0xFF10..=0xFF3F => self.apu.write_reg(addr, val),
            0xFF40..=0xFF4B => self.ppu.write_reg(addr, val),
            0xFF80..=0xFFFE => self.mem.write_hram(addr - 0xFF80, val),
            0xFFFF => self.interrupts.write_ie(val),
            _ => log::warn!("write to unimplemented IO register {:#06X}={:#04X}", addr, val),
        }
    }

    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write16(&mut self, addr: u16, val: u16) {
        self.write(addr, (val & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (val >> 8) as u8);
    }

    pub fn joypad_pressed(&self) -> Buttons {
        self.joypad.pressed()
    }

    pub fn set_buttons_pressed(&mut self, buttons: Buttons) {
        self.joypad.set_pressed(buttons, &mut self.interrupts);
    }

    /// Advances every ticking peripheral by one M-cycle's worth of T-cycles.
    /// Called once per bus access from [`crate::cpu::Cpu`], so real timing
    /// emerges from instruction execution instead of a table lookup.
    pub fn advance_mcycle(&mut self) {
        const T_CYCLES_PER_M: u32 = 4;
        self.timer.tick(T_CYCLES_PER_M, &mut self.interrupts);
        self.ppu.tick(T_CYCLES_PER_M, &mut self.interrupts);
        self.serial.tick(&mut self.interrupts);
        self.ticks += T_CYCLES_PER_M as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_ram_mirrors_wram_both_directions() {
        let mut bus = Bus::new();
        bus.write(0xC010, 0x42);
        assert_eq!(bus.read(0xE010), 0x42);
        bus.write(0xE020, 0x99);
        assert_eq!(bus.read(0xC020), 0x99);
    }

    #[test]
    fn prohibited_region_reads_zero_and_ignores_writes() {
        let mut bus = Bus::new();
        bus.write(0xFEA5, 0x55);
        assert_eq!(bus.read(0xFEA5), 0x00);
    }

    #[test]
    fn word_roundtrip_is_little_endian() {
        let mut bus = Bus::new();
        bus.write16(0xC000, 0xBEEF);
        assert_eq!(bus.read(0xC000), 0xEF);
        assert_eq!(bus.read(0xC001), 0xBE);
        assert_eq!(bus.read16(0xC000), 0xBEEF);
    }

    #[test]
    fn hram_roundtrip() {
        let mut bus = Bus::new();
        bus.write(0xFF90, 0x77);
        assert_eq!(bus.read(0xFF90), 0x77);
    }
}
