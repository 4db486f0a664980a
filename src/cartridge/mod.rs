//! Cartridge loading: header parsing, checksum validation, and the ROM/RAM
//! read-write surface the bus delegates to for 0x0000-0x7FFF and
//! 0xA000-0xBFFF.

mod header;

pub use header::{CartridgeKind, RamSize, RomHeader, RomSize};

use crate::error::LoadError;
use std::fs;
use std::path::Path;

const HEADER_START: usize = 0x0100;
const MIN_ROM_LEN: usize = 0x0150;

pub struct Cartridge {
    rom: Box<[u8]>,
    ext_ram: Box<[u8]>,
    header: RomHeader,
    /// Set the first time a write targets ROM on a cartridge whose mapper
    /// this core doesn't implement. Checked by `Cpu::step` the same way an
    /// invalid opcode is: the core locks and logs a fatal error.
    unsupported_mapper_hit: bool,
}

impl Cartridge {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Cartridge, LoadError> {
        let rom = fs::read(path)?.into_boxed_slice();
        Cartridge::from_bytes(rom)
    }

    fn from_bytes(rom: Box<[u8]>) -> Result<Cartridge, LoadError> {
        if rom.len() < MIN_ROM_LEN {
            return Err(LoadError::TooSmall);
        }

        let header = RomHeader::parse(&rom[HEADER_START..HEADER_START + 0x50]);

        if header.checksum_ok {
            log::info!("cartridge '{}' header checksum OK", header.title);
        } else {
            log::warn!(
                "cartridge '{}' header checksum mismatch (expected {:#04X}); loading anyway",
                header.title,
                header.checksum,
            );
        }

        log::info!(
            "loaded cartridge: title='{}' licensee='{}' type={:?} rom_size={:?} ram_size={:?}",
            header.title,
            header.licensee,
            header.kind,
            header.rom_size,
            header.ram_size,
        );

        let ram_len = header.ram_size.bytes();
        let ext_ram = vec![0u8; ram_len].into_boxed_slice();

        Ok(Cartridge {
            rom,
            ext_ram,
            header,
            unsupported_mapper_hit: false,
        })
    }

    pub fn header(&self) -> &RomHeader {
        &self.header
    }

    /// See the doc comment on `unsupported_mapper_hit`.
    pub fn unsupported_mapper_hit(&self) -> bool {
        self.unsupported_mapper_hit
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.rom.get(addr as usize).copied().unwrap_or(0xFF),
            0xA000..=0xBFFF => {
                let off = (addr - 0xA000) as usize;
                self.ext_ram.get(off).copied().unwrap_or(0xFF)
            }
            _ => unreachable!("cartridge read out of its owned range: {:#06X}", addr),
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF => {
                if self.header.kind != CartridgeKind::RomOnly && !self.unsupported_mapper_hit {
                    self.unsupported_mapper_hit = true;
                    log::error!(
                        "cartridge type {:?} requires mapper logic this core doesn't implement; \
                         write to {:#06X}={:#04X} ignored, core will halt",
                        self.header.kind,
                        addr,
                        val,
                    );
                }
                // ROM-only cartridges simply ignore writes below 0x8000.
            }
            0xA000..=0xBFFF => {
                let off = (addr - 0xA000) as usize;
                if let Some(byte) = self.ext_ram.get_mut(off) {
                    *byte = val;
                }
            }
            _ => unreachable!("cartridge write out of its owned range: {:#06X}", addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_valid_header() -> Vec<u8> {
        let mut rom = vec![0u8; MIN_ROM_LEN];
        // title at 0x134
        rom[0x134..0x138].copy_from_slice(b"TEST");
        rom[0x147] = 0x00; // ROM_ONLY
        rom[0x148] = 0x00; // 32 KiB, no banking
        rom[0x149] = 0x00; // no RAM

        let mut checksum: u8 = 0;
        for b in &rom[0x134..=0x14C] {
            checksum = checksum.wrapping_sub(*b).wrapping_sub(1);
        }
        rom[0x14D] = checksum;
        rom
    }

    #[test]
    fn valid_checksum_parses_ok() {
        let rom = rom_with_valid_header();
        let header = RomHeader::parse(&rom[HEADER_START..HEADER_START + 0x50]);
        assert!(header.checksum_ok);
        assert_eq!(header.title, "TEST");
        assert_eq!(header.kind, CartridgeKind::RomOnly);
    }

    #[test]
    fn corrupted_checksum_is_detected_but_not_fatal() {
        let mut rom = rom_with_valid_header();
        rom[0x134] ^= 0xFF;
        let header = RomHeader::parse(&rom[HEADER_START..HEADER_START + 0x50]);
        assert!(!header.checksum_ok);
    }

    #[test]
    fn rom_only_ignores_writes_below_0x8000() {
        let rom = rom_with_valid_header();
        let mut cart = Cartridge::from_bytes(rom.into_boxed_slice()).unwrap();
        let before = cart.read(0x0000);
        cart.write(0x0000, 0xFF);
        assert_eq!(cart.read(0x0000), before);
        assert!(!cart.unsupported_mapper_hit());
    }

    #[test]
    fn ext_ram_roundtrips() {
        let mut rom = rom_with_valid_header();
        rom[0x149] = 0x02; // 8 KiB RAM
        let mut checksum: u8 = 0;
        for b in &rom[0x134..=0x14C] {
            checksum = checksum.wrapping_sub(*b).wrapping_sub(1);
        }
        rom[0x14D] = checksum;

        let mut cart = Cartridge::from_bytes(rom.into_boxed_slice()).unwrap();
        cart.write(0xA010, 0x55);
        assert_eq!(cart.read(0xA010), 0x55);
    }
}
