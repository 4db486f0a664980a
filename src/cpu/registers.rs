//! Storage and access for the CPU's register file. See [`Registers`].

use bitflags::bitflags;

#[derive(Default)]
pub struct Registers {
    pub a: u8,
    pub flags: Flags,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub sp: u16,
    pub pc: u16,
}

bitflags! {
    #[derive(Default)]
    pub struct Flags: u8 {
        const Z = 0b_1000_0000;
        const N = 0b_0100_0000;
        const H = 0b_0010_0000;
        const C = 0b_0001_0000;
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum R8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// All 16-bit registers of the Game Boy CPU.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum R16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Registers {
    pub fn new() -> Registers {
        Default::default()
    }

    /// DMG hardware register state right after the boot ROM hands off
    /// control at PC=0x0100. This is the reference state this core starts
    /// from; no boot ROM is executed.
    pub fn new_post_boot() -> Registers {
        let mut reg = Registers::new();
        reg.a = 0x01;
        reg.flags = Flags::from_bits_truncate(0xB0);
        reg.bc = 0x0013;
        reg.de = 0x00D8;
        reg.hl = 0x014D;
        reg.sp = 0xFFFE;
        reg.pc = 0x0100;
        reg
    }

    pub fn get_r8(&self, r: R8) -> u8 {
        match r {
            R8::A => self.a,
            R8::B => self.bc.to_le_bytes()[1],
            R8::C => self.bc.to_le_bytes()[0],
            R8::D => self.de.to_le_bytes()[1],
            R8::E => self.de.to_le_bytes()[0],
            R8::H => self.hl.to_le_bytes()[1],
            R8::L => self.hl.to_le_bytes()[0],
        }
    }

    pub fn set_r8(&mut self, r: R8, val: u8) {
        let r16 = match r {
            R8::A => {
                self.a = val;
                return;
            }
            R8::B | R8::C => &mut self.bc,
            R8::D | R8::E => &mut self.de,
            R8::H | R8::L => &mut self.hl,
        };

        let mut bytes = r16.to_le_bytes();

        match r {
            R8::B | R8::D | R8::H => bytes[1] = val,
            R8::C | R8::E | R8::L => bytes[0] = val,
            R8::A => unreachable!(),
        }

        *r16 = u16::from_le_bytes(bytes);
    }

    pub fn get_r16(&self, rr: R16) -> u16 {
        match rr {
            R16::AF => u16::from_le_bytes([self.flags.bits(), self.a]),
            R16::BC => self.bc,
            R16::DE => self.de,
            R16::HL => self.hl,
            R16::SP => self.sp,
            R16::PC => self.pc,
        }
    }

    /// Writes to AF force the low nibble of F to zero, since `Flags` only
    /// defines bits 7..4 and `from_bits_truncate` drops the rest.
    pub fn set_r16(&mut self, rr: R16, val: u16) {
        match rr {
            R16::AF => {
                let bytes = val.to_le_bytes();
                self.flags = Flags::from_bits_truncate(bytes[0]);
                self.a = bytes[1];
            }
            R16::BC => self.bc = val,
            R16::DE => self.de = val,
            R16::HL => self.hl = val,
            R16::SP => self.sp = val,
            R16::PC => self.pc = val,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn af_write_masks_low_nibble() {
        let mut reg = Registers::new();
        reg.set_r16(R16::AF, 0x1234);
        assert_eq!(reg.get_r16(R16::AF), 0x1230);
    }

    #[test]
    fn pair_roundtrip() {
        let mut reg = Registers::new();
        for &rr in &[R16::BC, R16::DE, R16::HL, R16::SP, R16::PC] {
            reg.set_r16(rr, 0xBEEF);
            assert_eq!(reg.get_r16(rr), 0xBEEF);
        }
    }

    #[test]
    fn r8_aliases_r16_halves() {
        let mut reg = Registers::new();
        reg.set_r16(R16::BC, 0x1234);
        assert_eq!(reg.get_r8(R8::B), 0x12);
        assert_eq!(reg.get_r8(R8::C), 0x34);

        reg.set_r8(R8::B, 0xAB);
        assert_eq!(reg.get_r16(R16::BC), 0xAB34);
    }

    #[test]
    fn post_boot_state_matches_dmg_reference() {
        let reg = Registers::new_post_boot();
        assert_eq!(reg.get_r16(R16::AF), 0x01B0);
        assert_eq!(reg.get_r16(R16::BC), 0x0013);
        assert_eq!(reg.get_r16(R16::DE), 0x00D8);
        assert_eq!(reg.get_r16(R16::HL), 0x014D);
        assert_eq!(reg.sp, 0xFFFE);
        assert_eq!(reg.pc, 0x0100);
    }
}
