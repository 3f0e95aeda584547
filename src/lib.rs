pub mod util;
pub mod interpreter;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clap::Parser as ClapParser;
use crate::interpreter::output::Console;
use crate::interpreter::session::{RunStatus, Session};

pub const EXIT_USAGE: u8 = 64;
pub const EXIT_DATA_ERROR: u8 = 65;
pub const EXIT_IO_ERROR: u8 = 74;

pub const PROMPT: &str = "mint> ";

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run (must end in .mt); starts an interactive prompt if omitted")]
    pub input: Option<PathBuf>,
    #[clap(long, help = "Print the syntax tree of each statement instead of running it")]
    pub print_ast: bool,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

/// Installs the log subscriber. `RUST_LOG` wins over the default level, which
/// is `debug` with `--verbose` and `warn` otherwise.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

pub fn run(config: &Config) -> ExitCode {
    match &config.input {
        Some(path) => run_file(path, config.print_ast),
        None => match run_prompt(config.print_ast) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::from(EXIT_IO_ERROR)
            },
        },
    }
}

pub fn is_script_path(path: &Path) -> bool {
    path.extension().map_or(false, |extension| extension == "mt")
}

pub fn run_file(path: &Path, print_ast: bool) -> ExitCode {
    if !is_script_path(path) {
        eprintln!("Mint files must end with .mt");
        return ExitCode::from(EXIT_USAGE);
    }

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Could not read {}: {}", path.display(), err);
            return ExitCode::from(EXIT_IO_ERROR);
        },
    };

    tracing::debug!(path = %path.display(), "running script");

    let mut session = Session::new(Console);
    let status = if print_ast { session.print_ast(&source) } else { session.run(&source) };

    match status {
        RunStatus::Ok => ExitCode::SUCCESS,
        RunStatus::StaticError | RunStatus::RuntimeError => ExitCode::from(EXIT_DATA_ERROR),
    }
}

/// Reads and runs one line at a time until stdin is closed. Errors are
/// reported but only affect the line they occur in.
pub fn run_prompt(print_ast: bool) -> Result<(), std::io::Error> {
    let mut session = Session::new(Console);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let status = if print_ast { session.print_ast(&line) } else { session.run_prompt_line(&line) };
        tracing::trace!(?status, "ran prompt line");
    }

    println!();
    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use super::*;

    #[test]
    fn only_mint_scripts_are_run() {
        assert!(is_script_path(Path::new("program.mt")));
        assert!(is_script_path(Path::new("dir/nested.program.mt")));
        assert!(!is_script_path(Path::new("program.mint")));
        assert!(!is_script_path(Path::new("mt")));
        assert!(!is_script_path(Path::new("program")));
    }
}
