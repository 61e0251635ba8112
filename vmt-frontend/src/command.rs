//! VM command vocabulary
//!
//! One decoded VM command per source line. A command is fully
//! self-contained: emitting it never requires looking at later
//! commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic/logical stack operations
///
/// Binary ops consume two operands and push one result; `Neg` and
/// `Not` consume and push one. Comparisons push -1 (all ones) for
/// true and 0 for false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AluOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl AluOp {
    /// Match a command keyword (already uppercased) against the op set
    pub fn from_keyword(keyword: &str) -> Option<AluOp> {
        match keyword {
            "ADD" => Some(AluOp::Add),
            "SUB" => Some(AluOp::Sub),
            "NEG" => Some(AluOp::Neg),
            "EQ" => Some(AluOp::Eq),
            "GT" => Some(AluOp::Gt),
            "LT" => Some(AluOp::Lt),
            "AND" => Some(AluOp::And),
            "OR" => Some(AluOp::Or),
            "NOT" => Some(AluOp::Not),
            _ => None,
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AluOp::Add => write!(f, "ADD"),
            AluOp::Sub => write!(f, "SUB"),
            AluOp::Neg => write!(f, "NEG"),
            AluOp::Eq => write!(f, "EQ"),
            AluOp::Gt => write!(f, "GT"),
            AluOp::Lt => write!(f, "LT"),
            AluOp::And => write!(f, "AND"),
            AluOp::Or => write!(f, "OR"),
            AluOp::Not => write!(f, "NOT"),
        }
    }
}

/// The eight logical memory segments a push/pop command can address
///
/// `Constant` is push-only by contract; popping it is undefined
/// behavior and deliberately unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    /// Match a segment name case-insensitively
    pub fn from_keyword(keyword: &str) -> Option<Segment> {
        match keyword.to_ascii_uppercase().as_str() {
            "ARGUMENT" => Some(Segment::Argument),
            "LOCAL" => Some(Segment::Local),
            "STATIC" => Some(Segment::Static),
            "CONSTANT" => Some(Segment::Constant),
            "THIS" => Some(Segment::This),
            "THAT" => Some(Segment::That),
            "POINTER" => Some(Segment::Pointer),
            "TEMP" => Some(Segment::Temp),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Argument => write!(f, "ARGUMENT"),
            Segment::Local => write!(f, "LOCAL"),
            Segment::Static => write!(f, "STATIC"),
            Segment::Constant => write!(f, "CONSTANT"),
            Segment::This => write!(f, "THIS"),
            Segment::That => write!(f, "THAT"),
            Segment::Pointer => write!(f, "POINTER"),
            Segment::Temp => write!(f, "TEMP"),
        }
    }
}

/// One decoded VM command
///
/// Label names in `Label`/`Goto`/`IfGoto` are already qualified by the
/// enclosing function (`f$name`) when the parser has seen a
/// `function` command in the current unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Arithmetic(AluOp),
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, locals: u16 },
    Call { name: String, args: u16 },
    Return,
}
