//! Hack VM Translator - Assembly Generation Backend
//!
//! This crate handles the final phase of translation: generating Hack
//! assembly from decoded VM commands. It includes:
//!
//! - Hack assembly instruction records and their text serialization
//! - The command-to-assembly generator and its program-wide state
//!   (label counters, current translation-unit name)
//! - A machine simulator used by tests to check RAM effects

pub mod asm;
pub mod emit;
pub mod testing;

pub use asm::{write_assembly, AsmInst, Comp, Dest, Jump, Register};
pub use emit::CodeGen;
