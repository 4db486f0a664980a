//! The P1/JOYP register (0xFF00) and the 8 DMG buttons.

use crate::interrupt_system::{Interrupt, InterruptSystem};
use bitflags::bitflags;

bitflags! {
    #[derive(Default)]
    pub struct Buttons: u8 {
        const RIGHT  = 0b0000_0001;
        const LEFT   = 0b0000_0010;
        const UP     = 0b0000_0100;
        const DOWN   = 0b0000_1000;
        const A      = 0b0001_0000;
        const B      = 0b0010_0000;
        const SELECT = 0b0100_0000;
        const START  = 0b1000_0000;
    }
}

/// `select` bits 4/5 of P1 choose which half of `pressed` is visible; the
/// visible nibble reads back inverted (0 = pressed) in bits 0-3.
pub struct Joypad {
    select_dirs: bool,
    select_buttons: bool,
    pressed: Buttons,
}

impl Joypad {
    pub fn new() -> Joypad {
        Joypad {
            select_dirs: false,
            select_buttons: false,
            pressed: Buttons::empty(),
        }
    }

    pub fn set_pressed(&mut self, buttons: Buttons, interrupts: &mut InterruptSystem) {
        let newly_pressed = buttons & !self.pressed;
        self.pressed = buttons;
        if !newly_pressed.is_empty() {
            interrupts.request(Interrupt::Joypad);
        }
    }

    pub fn pressed(&self) -> Buttons {
        self.pressed
    }

    pub fn read_p1(&self) -> u8 {
        let mut nibble = 0x0F;
        if self.select_dirs {
            nibble &= !(self.pressed.bits() & 0x0F);
        }
        if self.select_buttons {
            nibble &= !((self.pressed.bits() >> 4) & 0x0F);
        }

        let select_bits = ((!self.select_dirs as u8) << 4) | ((!self.select_buttons as u8) << 5);
        0b1100_0000 | select_bits | nibble
    }

    pub fn write_p1(&mut self, val: u8) {
        self.select_dirs = val & 0b0001_0000 == 0;
        self.select_buttons = val & 0b0010_0000 == 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpressed_reads_all_ones_in_low_nibble() {
        let mut jp = Joypad::new();
        jp.write_p1(0b0000_0000);
        assert_eq!(jp.read_p1() & 0x0F, 0x0F);
    }

    #[test]
    fn pressed_direction_clears_its_bit_when_selected() {
        let mut jp = Joypad::new();
        let mut ir = InterruptSystem::new();
        jp.set_pressed(Buttons::RIGHT, &mut ir);
        jp.write_p1(0b0001_0000); // select directions
        assert_eq!(jp.read_p1() & 0x01, 0x00);
    }

    #[test]
    fn new_press_requests_joypad_interrupt() {
        let mut jp = Joypad::new();
        let mut ir = InterruptSystem::new();
        jp.set_pressed(Buttons::START, &mut ir);
        assert_eq!(ir.lowest_pending(), None); // IE not set, but IF should carry it
        assert_ne!(ir.read_if() & Interrupt::Joypad as u8, 0);
    }
}
