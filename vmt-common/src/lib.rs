//! Hack VM Translator - Common Types and Utilities
//!
//! This crate contains shared types and error definitions used across
//! all components of the Hack VM translator.

pub mod error;
pub mod source_loc;

pub use error::TranslateError;
pub use source_loc::SourceLocation;
