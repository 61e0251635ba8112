//! Multi-unit translation driver
//!
//! The driver always emits the bootstrap first (stack pointer init
//! plus a call to the entry point), then feeds every unit's commands
//! through one shared `CodeGen` instance so label and call counters
//! stay globally unique. The parser, and with it the current-function
//! label qualification, is per unit.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use vmt_codegen::{write_assembly, AsmInst, CodeGen};
use vmt_common::TranslateError;
use vmt_frontend::CommandStream;

/// One translation unit: a name (the source file stem, used for
/// static-segment symbols) and its VM source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
        }
    }
}

/// Translate an ordered list of units into one assembly text
///
/// Output is deterministic: the same units in the same order produce
/// byte-identical text on every run.
pub fn translate_program(units: &[SourceUnit]) -> Result<String, TranslateError> {
    Ok(write_assembly(&translate_to_instructions(units)?))
}

/// Translate an ordered list of units into one instruction sequence
pub fn translate_to_instructions(
    units: &[SourceUnit],
) -> Result<Vec<AsmInst>, TranslateError> {
    let mut gen = CodeGen::new();
    gen.emit_bootstrap();
    for unit in units {
        debug!("translating unit {}", unit.name);
        gen.set_unit_name(&unit.name);
        let mut stream = CommandStream::new(&unit.name, &unit.source);
        while let Some((command, location)) = stream.next_command()? {
            gen.emit_command(&command, &location)?;
        }
    }
    Ok(gen.into_instructions())
}

/// Translate a `.vm` file or a directory of `.vm` files, writing the
/// derived output file and returning its path
///
/// Single file: `<stem>.asm` next to the input. Directory:
/// `<dir>/<dirname>.asm`, with the unit order fixed by sorting file
/// names so builds are reproducible.
pub fn translate_path(input: &Path) -> Result<PathBuf, TranslateError> {
    let (units, output) = collect_units(input)?;
    let assembly = translate_program(&units)?;
    fs::write(&output, assembly)?;
    Ok(output)
}

fn collect_units(input: &Path) -> Result<(Vec<SourceUnit>, PathBuf), TranslateError> {
    if input.is_dir() {
        let mut paths: Vec<PathBuf> = fs::read_dir(input)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
            .collect();
        paths.sort();

        let mut units = Vec::with_capacity(paths.len());
        for path in &paths {
            units.push(read_unit(path)?);
        }

        let dir_name = file_name_str(input)?;
        let output = input.join(format!("{}.asm", dir_name));
        Ok((units, output))
    } else {
        let units = vec![read_unit(input)?];
        let output = input.with_extension("asm");
        Ok((units, output))
    }
}

fn read_unit(path: &Path) -> Result<SourceUnit, TranslateError> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| TranslateError::Io {
            message: format!("invalid source file name: {}", path.display()),
        })?;
    let source = fs::read_to_string(path)?;
    Ok(SourceUnit::new(name, &source))
}

fn file_name_str(path: &Path) -> Result<&str, TranslateError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TranslateError::Io {
            message: format!("invalid directory name: {}", path.display()),
        })
}
