//! Error types returned from the fallible edges of the core: cartridge
//! loading is the only operation that can fail outright; everything that
//! goes wrong during `step()` is instead surfaced by a `false` return and a
//! fatal log entry (see [`crate::cpu::Cpu::step`]).

use crate::cartridge::CartridgeKind;
use std::fmt;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    TooSmall,
    UnsupportedCartridge(CartridgeKind),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "could not read cartridge file: {}", e),
            LoadError::TooSmall => write!(f, "file is smaller than the minimum header size"),
            LoadError::UnsupportedCartridge(kind) => {
                write!(f, "unsupported cartridge type: {:?}", kind)
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> LoadError {
        LoadError::Io(e)
    }
}

/// Surfaced only through logging; see module docs. Kept as a type so
/// `Cpu::step` has something concrete to log and so tests can assert on the
/// shape of a fault without depending on log output.
#[derive(Debug, Copy, Clone)]
pub enum CpuError {
    InvalidOpcode(u8),
    InvalidAddrMode(u8),
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::InvalidOpcode(op) => write!(f, "invalid opcode {:#04X}", op),
            CpuError::InvalidAddrMode(op) => {
                write!(f, "no addressing mode implemented for opcode {:#04X}", op)
            }
        }
    }
}
