//! APU register stub: stores the NR1x-NR5x register file and wave RAM so
//! software that probes or configures sound hardware doesn't break, without
//! generating any audio. No timer/ticking is required for that contract.

const WAVE_RAM_LEN: usize = 0x10;

pub struct Apu {
    regs: [u8; 0x17], // NR10 (0xFF10) .. NR52 (0xFF26)
    wave_ram: [u8; WAVE_RAM_LEN],
}

impl Apu {
    pub fn new() -> Apu {
        Apu {
            regs: [0; 0x17],
            wave_ram: [0; WAVE_RAM_LEN],
        }
    }

    pub fn read_reg(&self, addr: u16) -> u8 {
        match addr {
            0xFF10..=0xFF26 => self.regs[(addr - 0xFF10) as usize],
            0xFF30..=0xFF3F => self.wave_ram[(addr - 0xFF30) as usize],
            _ => 0xFF,
        }
    }

    pub fn write_reg(&mut self, addr: u16, val: u8) {
        match addr {
            0xFF10..=0xFF26 => self.regs[(addr - 0xFF10) as usize] = val,
            0xFF30..=0xFF3F => self.wave_ram[(addr - 0xFF30) as usize] = val,
            _ => log::warn!("write to unimplemented APU register {:#06X}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_roundtrip() {
        let mut apu = Apu::new();
        apu.write_reg(0xFF24, 0x77);
        assert_eq!(apu.read_reg(0xFF24), 0x77);
    }

    #[test]
    fn wave_ram_roundtrip() {
        let mut apu = Apu::new();
        apu.write_reg(0xFF30, 0xAB);
        assert_eq!(apu.read_reg(0xFF30), 0xAB);
    }
}
