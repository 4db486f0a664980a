//! Mnemonic dispatch and the ALU/flag semantics for every decoded
//! instruction. `fetch` has already resolved every operand into
//! `self.state` by the time `execute` runs, so most handlers here just
//! read `fetched_data`, compute, and write the result back.

use super::instr_table::{AddrMode, Condition, Mnemonic, Reg};
use super::registers::Flags;
use super::Cpu;
use crate::bus::Bus;
use crate::util::BitOps;

fn flags(z: bool, n: bool, h: bool, c: bool) -> Flags {
    let mut f = Flags::empty();
    if z {
        f.insert(Flags::Z);
    }
    if n {
        f.insert(Flags::N);
    }
    if h {
        f.insert(Flags::H);
    }
    if c {
        f.insert(Flags::C);
    }
    f
}

impl Cpu {
    pub(super) fn execute(&mut self, bus: &mut Bus) {
        match self.state.cur_inst.mnemonic {
            Mnemonic::Nop => {}
            Mnemonic::Ld | Mnemonic::Ldh => self.exec_ld(bus),
            Mnemonic::Inc => self.exec_inc(bus),
            Mnemonic::Dec => self.exec_dec(bus),
            Mnemonic::Rlca => self.exec_rlca(),
            Mnemonic::Rrca => self.exec_rrca(),
            Mnemonic::Rla => self.exec_rla(),
            Mnemonic::Rra => self.exec_rra(),
            Mnemonic::Daa => self.exec_daa(),
            Mnemonic::Cpl => self.exec_cpl(),
            Mnemonic::Scf => self.exec_scf(),
            Mnemonic::Ccf => self.exec_ccf(),
            Mnemonic::Jr => self.exec_jr(bus),
            Mnemonic::Jp => self.exec_jp(bus),
            Mnemonic::Call => self.exec_call(bus),
            Mnemonic::Ret => self.exec_ret(bus),
            Mnemonic::Reti => self.exec_reti(bus),
            Mnemonic::Rst => self.exec_rst(bus),
            Mnemonic::Push => self.exec_push(bus),
            Mnemonic::Pop => self.exec_pop(bus),
            Mnemonic::Add => self.exec_add(bus),
            Mnemonic::Adc => self.exec_adc(),
            Mnemonic::Sub => self.exec_sub(),
            Mnemonic::Sbc => self.exec_sbc(),
            Mnemonic::And => self.exec_and(),
            Mnemonic::Xor => self.exec_xor(),
            Mnemonic::Or => self.exec_or(),
            Mnemonic::Cp => self.exec_cp(),
            Mnemonic::Di => {
                bus.interrupts.ime = false;
                bus.interrupts.ime_pending = false;
                bus.interrupts.ime_armed = false;
            }
            Mnemonic::Ei => bus.interrupts.ime_pending = true,
            Mnemonic::Halt => self.exec_halt(bus),
            Mnemonic::Stop => {
                log::info!("cpu entering stop state");
                self.status.halted = true;
                self.status.stop = true;
            }
            Mnemonic::Prefix => unreachable!("0xCB is consumed during fetch, never dispatched here"),
            Mnemonic::Invalid => unreachable!("Cpu::step returns before execute for an invalid opcode"),
            Mnemonic::Rlc => self.exec_rlc(bus),
            Mnemonic::Rrc => self.exec_rrc(bus),
            Mnemonic::Rl => self.exec_rl(bus),
            Mnemonic::Rr => self.exec_rr(bus),
            Mnemonic::Sla => self.exec_sla(bus),
            Mnemonic::Sra => self.exec_sra(bus),
            Mnemonic::Swap => self.exec_swap(bus),
            Mnemonic::Srl => self.exec_srl(bus),
            Mnemonic::Bit => self.exec_bit(),
            Mnemonic::Res => self.exec_res(bus),
            Mnemonic::Set => self.exec_set(bus),
        }
    }

    pub(super) fn cond_met(&self, cond: Condition) -> bool {
        match cond {
            Condition::None => true,
            Condition::Z => self.reg.flags.contains(Flags::Z),
            Condition::NZ => !self.reg.flags.contains(Flags::Z),
            Condition::C => self.reg.flags.contains(Flags::C),
            Condition::NC => !self.reg.flags.contains(Flags::C),
        }
    }

    /// Writes an operation's result to wherever the decoded instruction
    /// names as its destination: `mem_dest` if the addressing mode wrote a
    /// memory operand during fetch, `primary_reg` otherwise. The only
    /// 16-bit memory destination is `LD (a16),SP`.
    fn store(&mut self, bus: &mut Bus, val: u16) {
        let inst = self.state.cur_inst;
        if self.state.dest_is_mem {
            if inst.secondary_reg.is_16bit() {
                self.bus_write16(bus, self.state.mem_dest, val);
            } else {
                self.bus_write(bus, self.state.mem_dest, val as u8);
            }
        } else if inst.primary_reg.is_16bit() {
            self.set16(inst.primary_reg, val);
        } else {
            self.set8(inst.primary_reg, val as u8);
        }
    }

    fn exec_ld(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        if inst.addr_mode == AddrMode::HlSpr {
            let (result, h, c) = add_sp_e(self.reg.sp, self.state.fetched_data);
            self.reg.flags = flags(false, false, h, c);
            self.set16(Reg::HL, result);
            self.tick(bus);
            return;
        }
        // LD SP,HL is the one 16-bit-register-to-16-bit-register transfer in
        // the set; like the other whole-pair operations it costs an extra
        // internal M-cycle beyond the opcode fetch.
        if inst.addr_mode == AddrMode::RR && inst.primary_reg.is_16bit() && inst.secondary_reg.is_16bit()
        {
            self.tick(bus);
        }
        let data = self.state.fetched_data;
        self.store(bus, data);
    }

    fn exec_inc(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        if inst.addr_mode == AddrMode::R && inst.primary_reg.is_16bit() {
            let val = self.get16(inst.primary_reg).wrapping_add(1);
            self.set16(inst.primary_reg, val);
            self.tick(bus);
            return;
        }
        let val = self.state.fetched_data as u8;
        let result = val.wrapping_add(1);
        self.reg.flags.set(Flags::Z, result == 0);
        self.reg.flags.remove(Flags::N);
        self.reg.flags.set(Flags::H, (val & 0x0F) == 0x0F);
        self.store(bus, result as u16);
    }

    fn exec_dec(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        if inst.addr_mode == AddrMode::R && inst.primary_reg.is_16bit() {
            let val = self.get16(inst.primary_reg).wrapping_sub(1);
            self.set16(inst.primary_reg, val);
            self.tick(bus);
            return;
        }
        let val = self.state.fetched_data as u8;
        let result = val.wrapping_sub(1);
        self.reg.flags.set(Flags::Z, result == 0);
        self.reg.flags.insert(Flags::N);
        self.reg.flags.set(Flags::H, (val & 0x0F) == 0);
        self.store(bus, result as u16);
    }

    fn exec_rlca(&mut self) {
        let a = self.reg.a;
        let carry = a >> 7;
        self.reg.a = (a << 1) | carry;
        self.reg.flags = flags(false, false, false, carry == 1);
    }

    fn exec_rrca(&mut self) {
        let a = self.reg.a;
        let carry = a & 1;
        self.reg.a = (a >> 1) | (carry << 7);
        self.reg.flags = flags(false, false, false, carry == 1);
    }

    fn exec_rla(&mut self) {
        let a = self.reg.a;
        let carry_in = self.reg.flags.contains(Flags::C) as u8;
        let carry_out = a >> 7;
        self.reg.a = (a << 1) | carry_in;
        self.reg.flags = flags(false, false, false, carry_out == 1);
    }

    fn exec_rra(&mut self) {
        let a = self.reg.a;
        let carry_in = self.reg.flags.contains(Flags::C) as u8;
        let carry_out = a & 1;
        self.reg.a = (a >> 1) | (carry_in << 7);
        self.reg.flags = flags(false, false, false, carry_out == 1);
    }

    /// Decimal-adjusts A after a BCD ADD/SUB, per the canonical SM83
    /// correction table keyed on N/H/C from the previous instruction.
    fn exec_daa(&mut self) {
        let mut a = self.reg.a;
        let n = self.reg.flags.contains(Flags::N);
        let h = self.reg.flags.contains(Flags::H);
        let mut c = self.reg.flags.contains(Flags::C);

        let mut correction: u8 = 0;
        if h || (!n && (a & 0x0F) > 0x09) {
            correction |= 0x06;
        }
        if c || (!n && a > 0x99) {
            correction |= 0x60;
            c = true;
        }
        a = if n {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };

        self.reg.flags.set(Flags::Z, a == 0);
        self.reg.flags.remove(Flags::H);
        self.reg.flags.set(Flags::C, c);
        self.reg.a = a;
    }

    fn exec_cpl(&mut self) {
        self.reg.a = !self.reg.a;
        self.reg.flags.insert(Flags::N);
        self.reg.flags.insert(Flags::H);
    }

    fn exec_scf(&mut self) {
        self.reg.flags.remove(Flags::N);
        self.reg.flags.remove(Flags::H);
        self.reg.flags.insert(Flags::C);
    }

    fn exec_ccf(&mut self) {
        let c = self.reg.flags.contains(Flags::C);
        self.reg.flags.remove(Flags::N);
        self.reg.flags.remove(Flags::H);
        self.reg.flags.set(Flags::C, !c);
    }

    fn exec_jr(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        if self.cond_met(inst.condition) {
            let offset = self.state.fetched_data;
            self.reg.pc = self.reg.pc.wrapping_add(offset);
            self.tick(bus);
        }
    }

    fn exec_jp(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        if self.cond_met(inst.condition) {
            self.reg.pc = self.state.fetched_data;
            if inst.addr_mode == AddrMode::D16 {
                self.tick(bus);
            }
        }
    }

    fn exec_call(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        let target = self.state.fetched_data;
        if self.cond_met(inst.condition) {
            self.tick(bus);
            let pc = self.reg.pc;
            self.push_word(bus, pc);
            self.reg.pc = target;
        }
    }

    fn exec_ret(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        if inst.condition != Condition::None {
            self.tick(bus);
        }
        if self.cond_met(inst.condition) {
            let addr = self.pop_word(bus);
            self.reg.pc = addr;
            self.tick(bus);
        }
    }

    fn exec_reti(&mut self, bus: &mut Bus) {
        let addr = self.pop_word(bus);
        self.reg.pc = addr;
        self.tick(bus);
        bus.interrupts.ime = true;
        bus.interrupts.ime_pending = false;
        bus.interrupts.ime_armed = false;
    }

    fn exec_rst(&mut self, bus: &mut Bus) {
        let vector = self.state.cur_inst.param as u16;
        self.tick(bus);
        let pc = self.reg.pc;
        self.push_word(bus, pc);
        self.reg.pc = vector;
    }

    fn exec_push(&mut self, bus: &mut Bus) {
        self.tick(bus);
        let val = self.state.fetched_data;
        self.push_word(bus, val);
    }

    fn exec_pop(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;
        let val = self.pop_word(bus);
        self.set16(inst.primary_reg, val);
    }

    fn exec_add(&mut self, bus: &mut Bus) {
        let inst = self.state.cur_inst;

        if inst.primary_reg == Reg::SP && inst.addr_mode == AddrMode::D8 {
            let (result, h, c) = add_sp_e(self.reg.sp, self.state.fetched_data);
            self.reg.flags = flags(false, false, h, c);
            self.reg.sp = result;
            self.tick(bus);
            self.tick(bus);
            return;
        }

        if inst.primary_reg.is_16bit() {
            let a = self.get16(Reg::HL);
            let b = self.state.fetched_data;
            let (result, carry) = a.overflowing_add(b);
            let h = (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF;
            let z = self.reg.flags.contains(Flags::Z);
            self.reg.flags = flags(z, false, h, carry);
            self.set16(Reg::HL, result);
            self.tick(bus);
            return;
        }

        let a = self.reg.a;
        let b = self.state.fetched_data as u8;
        let (result, carry) = a.overflowing_add(b);
        let h = (a & 0x0F) + (b & 0x0F) > 0x0F;
        self.reg.flags = flags(result == 0, false, h, carry);
        self.reg.a = result;
    }

    fn exec_adc(&mut self) {
        let a = self.reg.a;
        let b = self.state.fetched_data as u8;
        let carry_in = self.reg.flags.contains(Flags::C) as u8;
        let result = a.wrapping_add(b).wrapping_add(carry_in);
        let h = (a & 0x0F) + (b & 0x0F) + carry_in > 0x0F;
        let c = a as u16 + b as u16 + carry_in as u16 > 0xFF;
        self.reg.flags = flags(result == 0, false, h, c);
        self.reg.a = result;
    }

    fn exec_sub(&mut self) {
        let a = self.reg.a;
        let b = self.state.fetched_data as u8;
        let result = a.wrapping_sub(b);
        let h = (a & 0x0F) < (b & 0x0F);
        let c = a < b;
        self.reg.flags = flags(result == 0, true, h, c);
        self.reg.a = result;
    }

    fn exec_sbc(&mut self) {
        let a = self.reg.a;
        let b = self.state.fetched_data as u8;
        let carry_in = self.reg.flags.contains(Flags::C) as u8;
        let result = a.wrapping_sub(b).wrapping_sub(carry_in);
        let h = (a & 0x0F) < (b & 0x0F) + carry_in;
        let c = (a as u16) < (b as u16) + (carry_in as u16);
        self.reg.flags = flags(result == 0, true, h, c);
        self.reg.a = result;
    }

    fn exec_and(&mut self) {
        let result = self.reg.a & (self.state.fetched_data as u8);
        self.reg.flags = flags(result == 0, false, true, false);
        self.reg.a = result;
    }

    fn exec_xor(&mut self) {
        let result = self.reg.a ^ (self.state.fetched_data as u8);
        self.reg.flags = flags(result == 0, false, false, false);
        self.reg.a = result;
    }

    fn exec_or(&mut self) {
        let result = self.reg.a | (self.state.fetched_data as u8);
        self.reg.flags = flags(result == 0, false, false, false);
        self.reg.a = result;
    }

    fn exec_cp(&mut self) {
        let a = self.reg.a;
        let b = self.state.fetched_data as u8;
        let result = a.wrapping_sub(b);
        let h = (a & 0x0F) < (b & 0x0F);
        let c = a < b;
        self.reg.flags = flags(result == 0, true, h, c);
    }

    /// HALT with IME clear and an interrupt already pending doesn't halt at
    /// all: the next opcode fetch runs but fails to advance PC, duplicating
    /// the byte after HALT. See `fetch::fetch`.
    fn exec_halt(&mut self, bus: &mut Bus) {
        if !bus.interrupts.ime && bus.interrupts.pending_mask() != 0 {
            self.halt_bug = true;
        } else {
            self.status.halted = true;
        }
    }

    fn exec_rlc(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry = val >> 7;
        let result = (val << 1) | carry;
        self.reg.flags = flags(result == 0, false, false, carry == 1);
        self.store(bus, result as u16);
    }

    fn exec_rrc(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry = val & 1;
        let result = (val >> 1) | (carry << 7);
        self.reg.flags = flags(result == 0, false, false, carry == 1);
        self.store(bus, result as u16);
    }

    fn exec_rl(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry_in = self.reg.flags.contains(Flags::C) as u8;
        let carry_out = val >> 7;
        let result = (val << 1) | carry_in;
        self.reg.flags = flags(result == 0, false, false, carry_out == 1);
        self.store(bus, result as u16);
    }

    fn exec_rr(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry_in = self.reg.flags.contains(Flags::C) as u8;
        let carry_out = val & 1;
        let result = (val >> 1) | (carry_in << 7);
        self.reg.flags = flags(result == 0, false, false, carry_out == 1);
        self.store(bus, result as u16);
    }

    fn exec_sla(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry = val >> 7;
        let result = val << 1;
        self.reg.flags = flags(result == 0, false, false, carry == 1);
        self.store(bus, result as u16);
    }

    fn exec_sra(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry = val & 1;
        let result = (val >> 1) | (val & 0x80);
        self.reg.flags = flags(result == 0, false, false, carry == 1);
        self.store(bus, result as u16);
    }

    fn exec_swap(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let result = (val << 4) | (val >> 4);
        self.reg.flags = flags(result == 0, false, false, false);
        self.store(bus, result as u16);
    }

    fn exec_srl(&mut self, bus: &mut Bus) {
        let val = self.state.fetched_data as u8;
        let carry = val & 1;
        let result = val >> 1;
        self.reg.flags = flags(result == 0, false, false, carry == 1);
        self.store(bus, result as u16);
    }

    fn exec_bit(&mut self) {
        let bit = self.state.cur_inst.param;
        let val = self.state.fetched_data as u8;
        self.reg.flags.set(Flags::Z, !val.bit(bit));
        self.reg.flags.remove(Flags::N);
        self.reg.flags.insert(Flags::H);
    }

    fn exec_res(&mut self, bus: &mut Bus) {
        let bit = self.state.cur_inst.param;
        let val = self.state.fetched_data as u8;
        self.store(bus, val.res_bit(bit) as u16);
    }

    fn exec_set(&mut self, bus: &mut Bus) {
        let bit = self.state.cur_inst.param;
        let val = self.state.fetched_data as u8;
        self.store(bus, val.set_bit(bit) as u16);
    }
}

/// Shared by `ADD SP,r8` and `LD HL,SP+r8`: both add a sign-extended
/// immediate byte to SP and compute H/C from the *unsigned* low-byte
/// addition, per the documented SM83 quirk.
fn add_sp_e(sp: u16, e: u16) -> (u16, bool, bool) {
    let e8 = e as u8;
    let result = sp.wrapping_add(e);
    let h = (sp & 0x0F) + (e8 as u16 & 0x0F) > 0x0F;
    let c = (sp & 0xFF) + (e8 as u16) > 0xFF;
    (result, h, c)
}

#[cfg(test)]
mod tests {
    use super::super::registers::R16;
    use super::super::Cpu;
    use super::*;
    use crate::bus::Bus;

    fn run(bytes: &[u8]) -> (Cpu, Bus) {
        let mut bus = Bus::new();
        for (i, b) in bytes.iter().enumerate() {
            bus.mem.write_wram(i as u16, *b);
        }
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.step(&mut bus);
        (cpu, bus)
    }

    #[test]
    fn add_sets_half_and_full_carry() {
        let (mut cpu, mut bus) = run(&[0x3E, 0x0F]); // LD A,0x0F
        cpu.reg.pc = 0xC002;
        bus.mem.write_wram(2, 0xC6); // ADD A,d8
        bus.mem.write_wram(3, 0x01);
        cpu.step(&mut bus);
        assert_eq!(cpu.reg.a, 0x10);
        assert!(cpu.reg.flags.contains(Flags::H));
        assert!(!cpu.reg.flags.contains(Flags::C));
    }

    #[test]
    fn sub_sets_carry_on_borrow() {
        let mut bus = Bus::new();
        bus.mem.write_wram(0, 0xD6); // SUB d8
        bus.mem.write_wram(1, 0x01);
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.reg.a = 0x00;
        cpu.step(&mut bus);
        assert_eq!(cpu.reg.a, 0xFF);
        assert!(cpu.reg.flags.contains(Flags::C));
        assert!(cpu.reg.flags.contains(Flags::N));
    }

    #[test]
    fn daa_after_bcd_add_yields_decimal_result() {
        let mut bus = Bus::new();
        bus.mem.write_wram(0, 0xC6); // ADD A,d8
        bus.mem.write_wram(1, 0x27);
        bus.mem.write_wram(2, 0x27); // DAA
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.reg.a = 0x45;
        cpu.reg.flags = Flags::empty();
        cpu.step(&mut bus); // ADD A,0x27 -> 0x6C, H set
        assert_eq!(cpu.reg.a, 0x6C);
        cpu.step(&mut bus); // DAA
        assert_eq!(cpu.reg.a, 0x72);
        assert!(!cpu.reg.flags.contains(Flags::H));
    }

    #[test]
    fn cb_bit_checks_without_modifying_operand() {
        let mut bus = Bus::new();
        bus.mem.write_wram(0, 0xCB);
        bus.mem.write_wram(1, 0x7C); // BIT 7,H
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.reg.set_r16(R16::HL, 0x8000);
        cpu.step(&mut bus);
        assert!(!cpu.reg.flags.contains(Flags::Z)); // bit 7 of 0x80 is set -> Z clear
        assert_eq!(cpu.reg.get_r16(R16::HL), 0x8000);
    }

    #[test]
    fn cb_res_on_memory_operand_writes_back_through_bus() {
        let mut bus = Bus::new();
        bus.mem.write_wram(0, 0xCB);
        bus.mem.write_wram(1, 0x86); // RES 0,(HL)
        bus.write(0xC100, 0xFF);
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.reg.set_r16(R16::HL, 0xC100);
        cpu.step(&mut bus);
        assert_eq!(bus.read(0xC100), 0xFE);
    }

    #[test]
    fn swap_splits_nibbles_and_clears_carry() {
        let mut bus = Bus::new();
        bus.mem.write_wram(0, 0xCB);
        bus.mem.write_wram(1, 0x37); // SWAP A
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.reg.a = 0xA5;
        cpu.reg.flags.insert(Flags::C);
        cpu.step(&mut bus);
        assert_eq!(cpu.reg.a, 0x5A);
        assert!(!cpu.reg.flags.contains(Flags::C));
    }

    #[test]
    fn add_hl_bc_leaves_zero_flag_untouched() {
        let mut bus = Bus::new();
        bus.mem.write_wram(0, 0x09); // ADD HL,BC
        let mut cpu = Cpu::new();
        cpu.reg.pc = 0xC000;
        cpu.reg.sp = 0xFFFE;
        cpu.reg.set_r16(R16::HL, 0xFFFF);
        cpu.reg.set_r16(R16::BC, 0x0001);
        cpu.reg.flags.insert(Flags::Z);
        cpu.step(&mut bus);
        assert_eq!(cpu.reg.get_r16(R16::HL), 0x0000);
        assert!(cpu.reg.flags.contains(Flags::Z));
        assert!(cpu.reg.flags.contains(Flags::C));
        assert!(cpu.reg.flags.contains(Flags::H));
    }
}
