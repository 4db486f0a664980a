//! Turns the byte(s) at PC into a decoded [`Instruction`](super::instr_table::Instruction)
//! plus the operand(s) it needs, following the fetch action named for each
//! of the 21 addressing modes.

use super::instr_table::{decode_cb, AddrMode, Mnemonic, Reg, TABLE};
use super::registers::{R16, R8};
use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    /// Reads one opcode byte (the CB-prefix byte included) and fully
    /// populates `self.state` for the instruction about to execute.
    pub(super) fn fetch(&mut self, bus: &mut Bus) {
        let pc = self.reg.pc;
        let opcode = self.bus_read(bus, pc);

        if self.halt_bug {
            self.halt_bug = false;
        } else {
            self.reg.pc = self.reg.pc.wrapping_add(1);
        }

        let inst = if opcode == 0xCB {
            let cb_opcode = self.bus_read(bus, self.reg.pc);
            self.reg.pc = self.reg.pc.wrapping_add(1);
            self.state.cur_opcode = cb_opcode;
            decode_cb(cb_opcode)
        } else {
            self.state.cur_opcode = opcode;
            TABLE[opcode as usize]
        };

        self.state.cur_inst = inst;
        self.state.mem_dest = 0;
        self.state.dest_is_mem = false;
        self.state.fetched_data = self.fetch_operand(bus, &inst);
    }

    fn fetch_operand(&mut self, bus: &mut Bus, inst: &super::instr_table::Instruction) -> u16 {
        use AddrMode::*;

        match inst.addr_mode {
            Imp => 0,

            R => {
                if inst.mnemonic == Mnemonic::Jp && inst.primary_reg == Reg::HL {
                    self.get16(inst.primary_reg)
                } else if inst.primary_reg.is_16bit() {
                    self.get16(inst.primary_reg)
                } else {
                    self.get8(inst.primary_reg) as u16
                }
            }

            RR => {
                if inst.secondary_reg.is_16bit() {
                    self.get16(inst.secondary_reg)
                } else {
                    self.get8(inst.secondary_reg) as u16
                }
            }

            RD8 => self.fetch_d8(bus) as u16,

            RD16 => self.fetch_d16(bus),

            D16 => self.fetch_d16(bus),

            MrR => {
                self.state.mem_dest = self.reg_pair_or_io_addr(inst.primary_reg);
                self.state.dest_is_mem = true;
                self.get8(inst.secondary_reg) as u16
            }

            RMr => {
                let addr = self.reg_pair_or_io_addr(inst.secondary_reg);
                self.bus_read(bus, addr) as u16
            }

            RHli => {
                let addr = self.get16(Reg::HL);
                let val = self.bus_read(bus, addr) as u16;
                self.set16(Reg::HL, addr.wrapping_add(1));
                val
            }

            RHld => {
                let addr = self.get16(Reg::HL);
                let val = self.bus_read(bus, addr) as u16;
                self.set16(Reg::HL, addr.wrapping_sub(1));
                val
            }

            HliR => {
                let addr = self.get16(Reg::HL);
                self.state.mem_dest = addr;
                self.state.dest_is_mem = true;
                self.set16(Reg::HL, addr.wrapping_add(1));
                self.get8(inst.secondary_reg) as u16
            }

            HldR => {
                let addr = self.get16(Reg::HL);
                self.state.mem_dest = addr;
                self.state.dest_is_mem = true;
                self.set16(Reg::HL, addr.wrapping_sub(1));
                self.get8(inst.secondary_reg) as u16
            }

            RA8 => {
                let off = self.fetch_d8(bus) as u16;
                let addr = 0xFF00 | off;
                self.bus_read(bus, addr) as u16
            }

            A8R => {
                let off = self.fetch_d8(bus) as u16;
                self.state.mem_dest = 0xFF00 | off;
                self.state.dest_is_mem = true;
                self.get8(inst.secondary_reg) as u16
            }

            HlSpr | D8 => sign_extend(self.fetch_d8(bus)),

            A16R => {
                let addr = self.fetch_d16(bus);
                self.state.mem_dest = addr;
                self.state.dest_is_mem = true;
                self.get8(inst.secondary_reg) as u16
            }

            D16R => {
                let addr = self.fetch_d16(bus);
                self.state.mem_dest = addr;
                self.state.dest_is_mem = true;
                self.get16(inst.secondary_reg)
            }

            MrD8 => {
                self.state.mem_dest = self.get16(inst.primary_reg);
                self.state.dest_is_mem = true;
                self.fetch_d8(bus) as u16
            }

            Mr => {
                let addr = self.get16(inst.primary_reg);
                self.state.mem_dest = addr;
                self.state.dest_is_mem = true;
                self.bus_read(bus, addr) as u16
            }

            RA16 => {
                let addr = self.fetch_d16(bus);
                self.bus_read(bus, addr) as u16
            }
        }
    }

    fn fetch_d8(&mut self, bus: &mut Bus) -> u8 {
        let pc = self.reg.pc;
        let val = self.bus_read(bus, pc);
        self.reg.pc = self.reg.pc.wrapping_add(1);
        val
    }

    fn fetch_d16(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.fetch_d8(bus) as u16;
        let hi = self.fetch_d8(bus) as u16;
        (hi << 8) | lo
    }

    /// `LD (C),A` / `LD A,(C)` name the 8-bit `C` register as their
    /// `MrR`/`RMr` operand, meaning "the I/O page at 0xFF00+C" rather than a
    /// 16-bit register pair holding an address.
    fn reg_pair_or_io_addr(&self, r: Reg) -> u16 {
        if r == Reg::C {
            0xFF00 | self.get8(Reg::C) as u16
        } else {
            self.get16(r)
        }
    }
}

/// Sign-extends a `d8`/`r8` operand into the `u16` the fetch record stores
/// it as, preserving the bit pattern `execute` needs to interpret as `i8`.
fn sign_extend(val: u8) -> u16 {
    val as i8 as i16 as u16
}

pub(super) fn reg_to_r8(r: Reg) -> R8 {
    match r {
        Reg::A => R8::A,
        Reg::B => R8::B,
        Reg::C => R8::C,
        Reg::D => R8::D,
        Reg::E => R8::E,
        Reg::H => R8::H,
        Reg::L => R8::L,
        _ => panic!("{:?} is not an 8-bit register", r),
    }
}

pub(super) fn reg_to_r16(r: Reg) -> R16 {
    match r {
        Reg::AF => R16::AF,
        Reg::BC => R16::BC,
        Reg::DE => R16::DE,
        Reg::HL => R16::HL,
        Reg::SP => R16::SP,
        Reg::PC => R16::PC,
        _ => panic!("{:?} is not a 16-bit register", r),
    }
}
