//! The smallest possible consumer of the core's control surface: loads a
//! ROM and runs it until the CPU locks up or is interrupted.

use gb_core::Emulator;
use std::env;
use std::process;

fn main() {
    env_logger::init();

    let rom_path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: gb-core <rom-path>");
            process::exit(1);
        }
    };

    let mut emu = Emulator::init();
    if let Err(e) = emu.load_cartridge(&rom_path) {
        log::error!("could not load '{}': {}", rom_path, e);
        process::exit(1);
    }

    while emu.step() {}

    log::info!(
        "core stopped after {} ticks, pc={:#06X}",
        emu.ticks(),
        emu.registers().pc,
    );
}
