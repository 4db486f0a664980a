//! The decoded-instruction data model: the dense 256-entry primary opcode
//! table plus the regular CB-prefixed decode. Mirrors the designated
//! initializer table of the reference C implementation this core was
//! modeled on, translated into a `const` Rust array instead of unsafe
//! pointer tricks.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mnemonic {
    Nop,
    Ld,
    Ldh,
    Inc,
    Dec,
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jr,
    Jp,
    Call,
    Ret,
    Reti,
    Rst,
    Push,
    Pop,
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
    Di,
    Ei,
    Halt,
    Stop,
    Prefix,
    Invalid,
    // CB-prefixed group
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
    Bit,
    Res,
    Set,
}

/// The 21 addressing modes named by the spec. Several modes describe
/// identical fetch-time actions (`A16R`/`D16R`, `R` reused for both 8-bit
/// and 16-bit register reads) but are kept distinct because the execute
/// stage dispatches on them separately.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddrMode {
    Imp,
    R,
    RR,
    RD8,
    RD16,
    D16,
    MrR,
    RMr,
    RHli,
    RHld,
    HliR,
    HldR,
    RA8,
    A8R,
    HlSpr,
    D8,
    A16R,
    D16R,
    MrD8,
    Mr,
    RA16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Condition {
    None,
    Z,
    NZ,
    C,
    NC,
}

/// A register operand named on an `Instruction`. `None` marks "not
/// applicable" (the mode itself carries all the information needed, e.g.
/// `A8R`'s destination is always the I/O page).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Reg {
    None,
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Reg {
    pub fn is_16bit(self) -> bool {
        matches!(
            self,
            Reg::AF | Reg::BC | Reg::DE | Reg::HL | Reg::SP | Reg::PC
        )
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub addr_mode: AddrMode,
    pub primary_reg: Reg,
    pub secondary_reg: Reg,
    pub condition: Condition,
    pub param: u8,
    /// Documented T-cycle count for the branch-taken case. Not consulted by
    /// the execution engine, which derives real timing from bus accesses
    /// (see `Cpu::step`); kept here because it's part of the decoded
    /// record a disassembler or debugger would want.
    pub cycles: u8,
    pub size: u8,
}

const fn i(
    mnemonic: Mnemonic,
    addr_mode: AddrMode,
    primary_reg: Reg,
    secondary_reg: Reg,
    condition: Condition,
    param: u8,
    cycles: u8,
    size: u8,
) -> Instruction {
    Instruction {
        mnemonic,
        addr_mode,
        primary_reg,
        secondary_reg,
        condition,
        param,
        cycles,
        size,
    }
}

const INVALID: Instruction = i(
    Mnemonic::Invalid,
    AddrMode::Imp,
    Reg::None,
    Reg::None,
    Condition::None,
    0,
    4,
    1,
);

use AddrMode::*;
use Condition as Cc;
use Mnemonic as M;
use Reg::*;

pub static TABLE: [Instruction; 256] = [
    // 0x00
    i(M::Nop, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD16, BC, None, Cc::None, 0, 12, 3),
    i(M::Ld, MrR, BC, A, Cc::None, 0, 8, 1),
    i(M::Inc, R, BC, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, B, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, B, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, B, None, Cc::None, 0, 8, 2),
    i(M::Rlca, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Ld, D16R, None, SP, Cc::None, 0, 20, 3),
    i(M::Add, RR, HL, BC, Cc::None, 0, 8, 1),
    i(M::Ld, RMr, A, BC, Cc::None, 0, 8, 1),
    i(M::Dec, R, BC, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, C, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, C, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, C, None, Cc::None, 0, 8, 2),
    i(M::Rrca, Imp, None, None, Cc::None, 0, 4, 1),
    // 0x10
    i(M::Stop, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD16, DE, None, Cc::None, 0, 12, 3),
    i(M::Ld, MrR, DE, A, Cc::None, 0, 8, 1),
    i(M::Inc, R, DE, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, D, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, D, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, D, None, Cc::None, 0, 8, 2),
    i(M::Rla, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Jr, D8, None, None, Cc::None, 0, 12, 2),
    i(M::Add, RR, HL, DE, Cc::None, 0, 8, 1),
    i(M::Ld, RMr, A, DE, Cc::None, 0, 8, 1),
    i(M::Dec, R, DE, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, E, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, E, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, E, None, Cc::None, 0, 8, 2),
    i(M::Rra, Imp, None, None, Cc::None, 0, 4, 1),
    // 0x20
    i(M::Jr, D8, None, None, Cc::NZ, 0, 8, 2),
    i(M::Ld, RD16, HL, None, Cc::None, 0, 12, 3),
    i(M::Ld, HliR, HL, A, Cc::None, 0, 8, 1),
    i(M::Inc, R, HL, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, H, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, H, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, H, None, Cc::None, 0, 8, 2),
    i(M::Daa, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Jr, D8, None, None, Cc::Z, 0, 8, 2),
    i(M::Add, RR, HL, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RHli, A, HL, Cc::None, 0, 8, 1),
    i(M::Dec, R, HL, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, L, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, L, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, L, None, Cc::None, 0, 8, 2),
    i(M::Cpl, Imp, None, None, Cc::None, 0, 4, 1),
    // 0x30
    i(M::Jr, D8, None, None, Cc::NC, 0, 8, 2),
    i(M::Ld, RD16, SP, None, Cc::None, 0, 12, 3),
    i(M::Ld, HldR, HL, A, Cc::None, 0, 8, 1),
    i(M::Inc, R, SP, None, Cc::None, 0, 8, 1),
    i(M::Inc, Mr, HL, None, Cc::None, 0, 12, 1),
    i(M::Dec, Mr, HL, None, Cc::None, 0, 12, 1),
    i(M::Ld, MrD8, HL, None, Cc::None, 0, 12, 2),
    i(M::Scf, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Jr, D8, None, None, Cc::C, 0, 8, 2),
    i(M::Add, RR, HL, SP, Cc::None, 0, 8, 1),
    i(M::Ld, RHld, A, HL, Cc::None, 0, 8, 1),
    i(M::Dec, R, SP, None, Cc::None, 0, 8, 1),
    i(M::Inc, R, A, None, Cc::None, 0, 4, 1),
    i(M::Dec, R, A, None, Cc::None, 0, 4, 1),
    i(M::Ld, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Ccf, Imp, None, None, Cc::None, 0, 4, 1),
    // 0x40
    i(M::Ld, RR, B, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, B, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, B, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, B, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, B, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, B, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, B, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, B, A, Cc::None, 0, 4, 1),
    i(M::Ld, RR, C, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, C, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, C, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, C, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, C, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, C, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, C, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, C, A, Cc::None, 0, 4, 1),
    // 0x50
    i(M::Ld, RR, D, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, D, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, D, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, D, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, D, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, D, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, D, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, D, A, Cc::None, 0, 4, 1),
    i(M::Ld, RR, E, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, E, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, E, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, E, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, E, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, E, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, E, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, E, A, Cc::None, 0, 4, 1),
    // 0x60
    i(M::Ld, RR, H, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, H, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, H, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, H, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, H, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, H, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, H, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, H, A, Cc::None, 0, 4, 1),
    i(M::Ld, RR, L, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, L, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, L, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, L, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, L, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, L, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, L, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, L, A, Cc::None, 0, 4, 1),
    // 0x70
    i(M::Ld, MrR, HL, B, Cc::None, 0, 8, 1),
    i(M::Ld, MrR, HL, C, Cc::None, 0, 8, 1),
    i(M::Ld, MrR, HL, D, Cc::None, 0, 8, 1),
    i(M::Ld, MrR, HL, E, Cc::None, 0, 8, 1),
    i(M::Ld, MrR, HL, H, Cc::None, 0, 8, 1),
    i(M::Ld, MrR, HL, L, Cc::None, 0, 8, 1),
    i(M::Halt, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Ld, MrR, HL, A, Cc::None, 0, 8, 1),
    i(M::Ld, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Ld, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Ld, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Ld, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Ld, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Ld, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Ld, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RR, A, A, Cc::None, 0, 4, 1),
    // 0x80
    i(M::Add, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Add, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Add, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Add, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Add, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Add, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Add, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Add, RR, A, A, Cc::None, 0, 4, 1),
    i(M::Adc, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Adc, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Adc, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Adc, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Adc, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Adc, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Adc, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Adc, RR, A, A, Cc::None, 0, 4, 1),
    // 0x90
    i(M::Sub, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Sub, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Sub, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Sub, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Sub, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Sub, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Sub, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Sub, RR, A, A, Cc::None, 0, 4, 1),
    i(M::Sbc, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Sbc, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Sbc, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Sbc, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Sbc, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Sbc, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Sbc, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Sbc, RR, A, A, Cc::None, 0, 4, 1),
    // 0xA0
    i(M::And, RR, A, B, Cc::None, 0, 4, 1),
    i(M::And, RR, A, C, Cc::None, 0, 4, 1),
    i(M::And, RR, A, D, Cc::None, 0, 4, 1),
    i(M::And, RR, A, E, Cc::None, 0, 4, 1),
    i(M::And, RR, A, H, Cc::None, 0, 4, 1),
    i(M::And, RR, A, L, Cc::None, 0, 4, 1),
    i(M::And, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::And, RR, A, A, Cc::None, 0, 4, 1),
    i(M::Xor, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Xor, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Xor, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Xor, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Xor, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Xor, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Xor, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Xor, RR, A, A, Cc::None, 0, 4, 1),
    // 0xB0
    i(M::Or, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Or, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Or, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Or, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Or, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Or, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Or, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Or, RR, A, A, Cc::None, 0, 4, 1),
    i(M::Cp, RR, A, B, Cc::None, 0, 4, 1),
    i(M::Cp, RR, A, C, Cc::None, 0, 4, 1),
    i(M::Cp, RR, A, D, Cc::None, 0, 4, 1),
    i(M::Cp, RR, A, E, Cc::None, 0, 4, 1),
    i(M::Cp, RR, A, H, Cc::None, 0, 4, 1),
    i(M::Cp, RR, A, L, Cc::None, 0, 4, 1),
    i(M::Cp, RMr, A, HL, Cc::None, 0, 8, 1),
    i(M::Cp, RR, A, A, Cc::None, 0, 4, 1),
    // 0xC0
    i(M::Ret, Imp, None, None, Cc::NZ, 0, 8, 1),
    i(M::Pop, R, BC, None, Cc::None, 0, 12, 1),
    i(M::Jp, D16, None, None, Cc::NZ, 0, 12, 3),
    i(M::Jp, D16, None, None, Cc::None, 0, 16, 3),
    i(M::Call, D16, None, None, Cc::NZ, 0, 12, 3),
    i(M::Push, R, BC, None, Cc::None, 0, 16, 1),
    i(M::Add, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x00, 16, 1),
    i(M::Ret, Imp, None, None, Cc::Z, 0, 8, 1),
    i(M::Ret, Imp, None, None, Cc::None, 0, 16, 1),
    i(M::Jp, D16, None, None, Cc::Z, 0, 12, 3),
    i(M::Prefix, Imp, None, None, Cc::None, 0, 4, 1),
    i(M::Call, D16, None, None, Cc::Z, 0, 12, 3),
    i(M::Call, D16, None, None, Cc::None, 0, 24, 3),
    i(M::Adc, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x08, 16, 1),
    // 0xD0
    i(M::Ret, Imp, None, None, Cc::NC, 0, 8, 1),
    i(M::Pop, R, DE, None, Cc::None, 0, 12, 1),
    i(M::Jp, D16, None, None, Cc::NC, 0, 12, 3),
    INVALID,
    i(M::Call, D16, None, None, Cc::NC, 0, 12, 3),
    i(M::Push, R, DE, None, Cc::None, 0, 16, 1),
    i(M::Sub, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x10, 16, 1),
    i(M::Ret, Imp, None, None, Cc::C, 0, 8, 1),
    i(M::Reti, Imp, None, None, Cc::None, 0, 16, 1),
    i(M::Jp, D16, None, None, Cc::C, 0, 12, 3),
    INVALID,
    i(M::Call, D16, None, None, Cc::C, 0, 12, 3),
    INVALID,
    i(M::Sbc, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x18, 16, 1),
    // 0xE0
    i(M::Ldh, A8R, None, A, Cc::None, 0, 12, 2),
    i(M::Pop, R, HL, None, Cc::None, 0, 12, 1),
    i(M::Ld, MrR, C, A, Cc::None, 0, 8, 1),
    INVALID,
    INVALID,
    i(M::Push, R, HL, None, Cc::None, 0, 16, 1),
    i(M::And, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x20, 16, 1),
    i(M::Add, D8, SP, None, Cc::None, 0, 16, 2),
    i(M::Jp, R, HL, None, Cc::None, 0, 4, 1),
    i(M::Ld, A16R, None, A, Cc::None, 0, 16, 3),
    INVALID,
    INVALID,
    INVALID,
    i(M::Xor, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x28, 16, 1),
    // 0xF0
    i(M::Ldh, RA8, A, None, Cc::None, 0, 12, 2),
    i(M::Pop, R, AF, None, Cc::None, 0, 12, 1),
    i(M::Ld, RMr, A, C, Cc::None, 0, 8, 1),
    i(M::Di, Imp, None, None, Cc::None, 0, 4, 1),
    INVALID,
    i(M::Push, R, AF, None, Cc::None, 0, 16, 1),
    i(M::Or, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x30, 16, 1),
    i(M::Ld, HlSpr, HL, SP, Cc::None, 0, 12, 2),
    i(M::Ld, RR, SP, HL, Cc::None, 0, 8, 1),
    i(M::Ld, RA16, A, None, Cc::None, 0, 16, 3),
    i(M::Ei, Imp, None, None, Cc::None, 0, 4, 1),
    INVALID,
    INVALID,
    i(M::Cp, RD8, A, None, Cc::None, 0, 8, 2),
    i(M::Rst, Imp, None, None, Cc::None, 0x38, 16, 1),
];

/// Maps a CB operand selector (the opcode's low 3 bits) to a register, with
/// 6 meaning "the byte at (HL)" rather than a register.
fn cb_operand(selector: u8) -> Reg {
    match selector & 0x07 {
        0 => B,
        1 => C,
        2 => D,
        3 => E,
        4 => H,
        5 => L,
        6 => HL,
        7 => A,
        _ => unreachable!(),
    }
}

/// Decodes a CB-prefixed opcode. Not a literal table: the CB opcode space
/// is fully regular (top 2 bits select the group, next 3 bits select the
/// bit index or rotate/shift kind, bottom 3 bits select the operand), so
/// deriving it at decode time is observably identical to a dense array.
pub fn decode_cb(opcode: u8) -> Instruction {
    let operand = cb_operand(opcode);
    let addr_mode = if matches!(operand, HL) { Mr } else { R };
    let bit = (opcode >> 3) & 0x07;

    let mnemonic = match opcode >> 6 {
        0b00 => match bit {
            0 => M::Rlc,
            1 => M::Rrc,
            2 => M::Rl,
            3 => M::Rr,
            4 => M::Sla,
            5 => M::Sra,
            6 => M::Swap,
            7 => M::Srl,
            _ => unreachable!(),
        },
        0b01 => M::Bit,
        0b10 => M::Res,
        0b11 => M::Set,
        _ => unreachable!(),
    };

    let cycles = match (matches!(operand, HL), mnemonic) {
        (true, M::Bit) => 12,
        (true, _) => 16,
        (false, _) => 8,
    };

    i(mnemonic, addr_mode, operand, None, Cc::None, bit, cycles, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_opcodes_match_spec_list() {
        let invalid = [
            0xD3u8, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
        ];
        for op in 0..=255u8 {
            let is_invalid = TABLE[op as usize].mnemonic == Mnemonic::Invalid;
            assert_eq!(is_invalid, invalid.contains(&op), "opcode {:#04X}", op);
        }
    }

    #[test]
    fn halt_opcode_is_0x76() {
        assert_eq!(TABLE[0x76].mnemonic, Mnemonic::Halt);
    }

    #[test]
    fn cb_bit_opcode_decodes_bit_index_and_operand() {
        // 0x7C = BIT 7,H
        let inst = decode_cb(0x7C);
        assert_eq!(inst.mnemonic, Mnemonic::Bit);
        assert_eq!(inst.param, 7);
        assert_eq!(inst.primary_reg, H);
        assert_eq!(inst.addr_mode, R);
    }

    #[test]
    fn cb_hl_operand_uses_mr_addressing() {
        // 0x86 = RES 0,(HL)
        let inst = decode_cb(0x86);
        assert_eq!(inst.mnemonic, Mnemonic::Res);
        assert_eq!(inst.primary_reg, HL);
        assert_eq!(inst.addr_mode, Mr);
    }
}
