//! Hack VM Translator - Main Driver
//!
//! Orchestrates translation of one or many source units into a single
//! assembly output with a globally consistent label namespace.

pub mod translate;

pub use translate::{
    translate_path, translate_program, translate_to_instructions, SourceUnit,
};
