//! CLI tool to transcode a rule table file into map insertion statements.

use clap::Parser;
use env_logger::Env;
use rules_transcoder::{Mode, TranscodeError, transcode_file};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

/// Transcode a rule table into `put` statements.
///
/// Lines that do not have the expected shape are skipped.
#[derive(Parser)]
#[command(name = "rules-transcode")]
struct Cli {
    /// Input encoding
    #[arg(value_enum)]
    mode: Mode,

    /// Rule table file (defaults to LangtonRule.txt or PetelkaRule.txt)
    input: Option<PathBuf>,

    /// Write statements to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show paths and line counts on stderr, and enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), TranscodeError> {
    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(cli.mode.default_input()));

    if cli.verbose {
        eprintln!("Mode:   {:?}", cli.mode);
        eprintln!("Input:  {}", input.display());
        eprintln!(
            "Output: {}",
            cli.output
                .as_deref()
                .map_or("(stdout)".into(), |p| p.display().to_string())
        );
    }

    let result = transcode_file(&input, cli.mode)?;

    match &cli.output {
        Some(out_path) => {
            let write_err = |source| TranscodeError::Write {
                path: out_path.clone(),
                source,
            };
            if let Some(parent) = out_path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
            let file = File::create(out_path).map_err(write_err)?;
            result
                .write_to(&mut BufWriter::new(file))
                .map_err(write_err)?;
        }
        None => {
            result
                .write_to(&mut io::stdout().lock())
                .map_err(|source| TranscodeError::Write {
                    path: PathBuf::from("(stdout)"),
                    source,
                })?;
        }
    }

    if cli.verbose {
        eprintln!(
            "Lines:  {} in -> {} out ({} skipped)",
            result.lines_read,
            result.emitted(),
            result.skipped
        );
    }

    Ok(())
}
