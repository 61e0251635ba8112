//! Line-oriented VM command parser
//!
//! Decodes VM source text one command per line. Comments (`//` to end
//! of line) and blank lines produce no command. Keywords and segment
//! names are matched case-insensitively.
//!
//! The parser owns the current-function context: once a `function`
//! command has been seen, label/goto/if-goto names are qualified as
//! `<function>$<name>` at parse time. The context is sticky until the
//! next `function` command; it is never reset at end of file.

use crate::command::{AluOp, Command, Segment};
use log::trace;
use vmt_common::{SourceLocation, TranslateError};

/// A pull-based stream of decoded commands over one translation unit
pub struct CommandStream<'a> {
    filename: String,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    function: Option<String>,
}

impl<'a> CommandStream<'a> {
    /// Create a stream over one unit's source text
    ///
    /// `filename` is the translation-unit name used in error locations.
    pub fn new(filename: &str, source: &'a str) -> Self {
        Self {
            filename: filename.to_string(),
            lines: source.lines().enumerate(),
            function: None,
        }
    }

    /// Decode the next command, or `None` at end of input
    pub fn next_command(
        &mut self,
    ) -> Result<Option<(Command, SourceLocation)>, TranslateError> {
        while let Some((index, raw)) = self.lines.next() {
            let line = match raw.find("//") {
                Some(i) => &raw[..i],
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let location = SourceLocation::new(&self.filename, index as u32 + 1);
            let command = self.decode(line, &location)?;
            trace!("{}: {:?}", location, command);
            return Ok(Some((command, location)));
        }
        Ok(None)
    }

    fn decode(
        &mut self,
        line: &str,
        location: &SourceLocation,
    ) -> Result<Command, TranslateError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let keyword = match fields.first() {
            Some(k) => k.to_ascii_uppercase(),
            None => {
                return Err(TranslateError::syntax("empty command", location));
            }
        };

        if let Some(op) = AluOp::from_keyword(&keyword) {
            return Ok(Command::Arithmetic(op));
        }

        match keyword.as_str() {
            "PUSH" => {
                let segment = expect_segment(&fields, location)?;
                let index = parse_count(expect_field(&fields, 2, "index", location)?, location)?;
                Ok(Command::Push { segment, index })
            }
            "POP" => {
                let segment = expect_segment(&fields, location)?;
                let index = parse_count(expect_field(&fields, 2, "index", location)?, location)?;
                Ok(Command::Pop { segment, index })
            }
            "LABEL" => {
                let name = expect_field(&fields, 1, "label name", location)?;
                Ok(Command::Label(self.qualify(name)))
            }
            "GOTO" => {
                let name = expect_field(&fields, 1, "label name", location)?;
                Ok(Command::Goto(self.qualify(name)))
            }
            "IF-GOTO" => {
                let name = expect_field(&fields, 1, "label name", location)?;
                Ok(Command::IfGoto(self.qualify(name)))
            }
            "FUNCTION" => {
                let name = expect_field(&fields, 1, "function name", location)?.to_string();
                let locals =
                    parse_count(expect_field(&fields, 2, "locals count", location)?, location)?;
                self.function = Some(name.clone());
                Ok(Command::Function { name, locals })
            }
            "CALL" => {
                let name = expect_field(&fields, 1, "function name", location)?.to_string();
                let args =
                    parse_count(expect_field(&fields, 2, "args count", location)?, location)?;
                Ok(Command::Call { name, args })
            }
            "RETURN" => Ok(Command::Return),
            _ => Err(TranslateError::lexical(
                format!("unknown command: {}", fields[0]),
                location,
            )),
        }
    }

    /// Qualify a branch label with the enclosing function's name
    fn qualify(&self, name: &str) -> String {
        match &self.function {
            Some(function) => format!("{}${}", function, name),
            None => name.to_string(),
        }
    }
}

fn expect_field<'b>(
    fields: &[&'b str],
    index: usize,
    what: &str,
    location: &SourceLocation,
) -> Result<&'b str, TranslateError> {
    fields.get(index).copied().ok_or_else(|| {
        TranslateError::syntax(format!("missing {}", what), location)
    })
}

fn expect_segment(
    fields: &[&str],
    location: &SourceLocation,
) -> Result<Segment, TranslateError> {
    let name = expect_field(fields, 1, "segment name", location)?;
    Segment::from_keyword(name).ok_or_else(|| {
        TranslateError::syntax(format!("unknown segment: {}", name), location)
    })
}

fn parse_count(
    text: &str,
    location: &SourceLocation,
) -> Result<u16, TranslateError> {
    text.parse::<u16>().map_err(|_| {
        TranslateError::syntax(
            format!("expected a non-negative integer, found: {}", text),
            location,
        )
    })
}
