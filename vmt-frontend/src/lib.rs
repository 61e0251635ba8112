//! Hack VM Translator - Command Model and Parser
//!
//! This crate defines the VM command vocabulary and the line-oriented
//! command stream that decodes VM source text into commands.

pub mod command;
pub mod parser;

pub use command::{AluOp, Command, Segment};
pub use parser::CommandStream;
