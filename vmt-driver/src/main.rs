//! Hack VM Translator command line driver
//!
//! Translates a `.vm` source file, or a directory of `.vm` files, into
//! one Hack assembly file for the downstream assembler.

use clap::Parser;
use std::path::PathBuf;
use vmt_driver::translate_path;

#[derive(Parser)]
#[command(name = "vmt")]
#[command(about = "Hack VM to assembly translator")]
#[command(version = "0.1.0")]
struct Cli {
    /// A .vm source file, or a directory containing .vm source files
    input: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match translate_path(&cli.input) {
        Ok(output) => {
            println!("Assembly written to: {}", output.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_takes_one_positional_path() {
        let cli = Cli::try_parse_from(["vmt", "projects/Prog"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("projects/Prog"));
    }

    #[test]
    fn test_cli_requires_an_input() {
        assert!(Cli::try_parse_from(["vmt"]).is_err());
    }
}
