//! Hack Assembly Instruction Definitions
//!
//! This module defines the instruction records emitted by the
//! translator and their serialization to the text grammar consumed by
//! the downstream assembler: address-immediate lines (`@symbol`,
//! `@number`), register-transfer lines (`dest=comp`, `comp;jump`),
//! target markers (`(label)`), and inert `//` comment lines.

use std::fmt;

/// The five fixed-address control registers in low RAM
///
/// SP is the operand stack pointer; LCL/ARG/THIS/THAT are the segment
/// base registers saved and restored by the call/return protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Sp,   // RAM[0], stack pointer
    Lcl,  // RAM[1], local base
    Arg,  // RAM[2], argument base
    This, // RAM[3], this base
    That, // RAM[4], that base
}

impl Register {
    /// The register's fixed RAM address
    pub fn address(self) -> u16 {
        match self {
            Register::Sp => 0,
            Register::Lcl => 1,
            Register::Arg => 2,
            Register::This => 3,
            Register::That => 4,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Sp => write!(f, "SP"),
            Register::Lcl => write!(f, "LCL"),
            Register::Arg => write!(f, "ARG"),
            Register::This => write!(f, "THIS"),
            Register::That => write!(f, "THAT"),
        }
    }
}

/// C-instruction destination field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dest::M => write!(f, "M"),
            Dest::D => write!(f, "D"),
            Dest::MD => write!(f, "MD"),
            Dest::A => write!(f, "A"),
            Dest::AM => write!(f, "AM"),
            Dest::AD => write!(f, "AD"),
            Dest::AMD => write!(f, "AMD"),
        }
    }
}

/// C-instruction computation field (the full Hack ALU vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comp {
    Zero,      // 0
    One,       // 1
    NegOne,    // -1
    D,         // D
    A,         // A
    M,         // M
    NotD,      // !D
    NotA,      // !A
    NotM,      // !M
    NegD,      // -D
    NegA,      // -A
    NegM,      // -M
    DPlusOne,  // D+1
    APlusOne,  // A+1
    MPlusOne,  // M+1
    DMinusOne, // D-1
    AMinusOne, // A-1
    MMinusOne, // M-1
    DPlusA,    // D+A
    DPlusM,    // D+M
    DMinusA,   // D-A
    DMinusM,   // D-M
    AMinusD,   // A-D
    MMinusD,   // M-D
    DAndA,     // D&A
    DAndM,     // D&M
    DOrA,      // D|A
    DOrM,      // D|M
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comp::Zero => write!(f, "0"),
            Comp::One => write!(f, "1"),
            Comp::NegOne => write!(f, "-1"),
            Comp::D => write!(f, "D"),
            Comp::A => write!(f, "A"),
            Comp::M => write!(f, "M"),
            Comp::NotD => write!(f, "!D"),
            Comp::NotA => write!(f, "!A"),
            Comp::NotM => write!(f, "!M"),
            Comp::NegD => write!(f, "-D"),
            Comp::NegA => write!(f, "-A"),
            Comp::NegM => write!(f, "-M"),
            Comp::DPlusOne => write!(f, "D+1"),
            Comp::APlusOne => write!(f, "A+1"),
            Comp::MPlusOne => write!(f, "M+1"),
            Comp::DMinusOne => write!(f, "D-1"),
            Comp::AMinusOne => write!(f, "A-1"),
            Comp::MMinusOne => write!(f, "M-1"),
            Comp::DPlusA => write!(f, "D+A"),
            Comp::DPlusM => write!(f, "D+M"),
            Comp::DMinusA => write!(f, "D-A"),
            Comp::DMinusM => write!(f, "D-M"),
            Comp::AMinusD => write!(f, "A-D"),
            Comp::MMinusD => write!(f, "M-D"),
            Comp::DAndA => write!(f, "D&A"),
            Comp::DAndM => write!(f, "D&M"),
            Comp::DOrA => write!(f, "D|A"),
            Comp::DOrM => write!(f, "D|M"),
        }
    }
}

/// C-instruction jump field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jump {
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jump::JGT => write!(f, "JGT"),
            Jump::JEQ => write!(f, "JEQ"),
            Jump::JGE => write!(f, "JGE"),
            Jump::JLT => write!(f, "JLT"),
            Jump::JNE => write!(f, "JNE"),
            Jump::JLE => write!(f, "JLE"),
            Jump::JMP => write!(f, "JMP"),
        }
    }
}

/// One Hack assembly instruction record
///
/// `AddrSym` covers everything the downstream assembler resolves
/// through its symbol table: static cells (`File.3`), branch/return
/// labels, and scratch variables (`addr`, `frame`, `ret`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    AddrImm(u16),          // @number
    AddrReg(Register),     // @SP, @LCL, ...
    AddrSym(String),       // @symbol
    Assign(Dest, Comp),    // dest=comp
    Branch(Comp, Jump),    // comp;jump (target is the A register)
    Marker(String),        // (label)
    Comment(String),       // // text
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::AddrImm(value) => write!(f, "@{}", value),
            AsmInst::AddrReg(register) => write!(f, "@{}", register),
            AsmInst::AddrSym(symbol) => write!(f, "@{}", symbol),
            AsmInst::Assign(dest, comp) => write!(f, "{}={}", dest, comp),
            AsmInst::Branch(comp, jump) => write!(f, "{};{}", comp, jump),
            AsmInst::Marker(label) => write!(f, "({})", label),
            AsmInst::Comment(text) => write!(f, "// {}", text),
        }
    }
}

/// Serialize an instruction sequence to assembler text, one record
/// per line
pub fn write_assembly(instructions: &[AsmInst]) -> String {
    let mut out = String::new();
    for instruction in instructions {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}
