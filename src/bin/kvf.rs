//! kvf CLI
//!
//! Command-line interface for reading and writing kvf store files.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kvf::{Config, Entry, KvfError, ReadMode, Store};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// kvf CLI
#[derive(Parser, Debug)]
#[command(name = "kvf")]
#[command(about = "Simple key-value storage tool for flat files")]
#[command(version)]
struct Args {
    /// Shared directory for lock files (same for every process on the host)
    #[arg(long, env = "KVF_LOCK_DIR", global = true)]
    lock_dir: Option<PathBuf>,

    /// Log debug output to stderr (overridden by KVF_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value; later files override earlier ones
    Get {
        /// One or more files followed by the key
        #[arg(value_name = "FILE... KEY")]
        args: Vec<String>,

        /// Value printed when no file has the key
        #[arg(short, long)]
        default: Option<String>,

        /// Treat missing files as empty instead of failing
        #[arg(short = 'm', long)]
        skip_missing_files: bool,
    },

    /// Set a value in every given file
    Set {
        /// One or more files followed by the key and the value
        #[arg(value_name = "FILE... KEY VALUE")]
        args: Vec<String>,
    },

    /// Print every entry as key=value
    List {
        /// Files to list, in order
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Treat missing files as empty instead of failing
        #[arg(short = 'm', long)]
        skip_missing_files: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error(transparent)]
    Kvf(#[from] KvfError),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only values
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("KVF_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let mut builder = Config::builder();
    if let Some(dir) = args.lock_dir {
        builder = builder.lock_dir(dir);
    }
    let store = Store::open(builder.build())?;

    match args.command {
        Commands::Get {
            args,
            default,
            skip_missing_files,
        } => {
            let (key, files) = args.split_last().ok_or(CliError::NotEnoughArguments)?;
            if files.is_empty() {
                return Err(CliError::NotEnoughArguments);
            }
            let value = get(&store, files, key, default.as_deref(), skip_missing_files)?;

            let mut stdout = io::stdout().lock();
            stdout.write_all(value.as_bytes())?;
            stdout.flush()?;
        }
        Commands::Set { args } => {
            if args.len() < 3 {
                return Err(CliError::NotEnoughArguments);
            }
            let (files, key_value) = args.split_at(args.len() - 2);
            let entry = Entry::new(key_value[0].as_str(), key_value[1].as_str())?;

            for file in files {
                store.repository(file).set(entry.clone())?;
                tracing::debug!(file = %file, key = %entry.key, "value set");
            }
        }
        Commands::List {
            files,
            skip_missing_files,
        } => {
            if files.is_empty() {
                return Err(CliError::NotEnoughArguments);
            }
            let mode = read_mode(skip_missing_files);

            let mut stdout = io::stdout().lock();
            for file in &files {
                let records = store.repository_with_mode(file, mode).records()?;
                for entry in records.entries() {
                    writeln!(stdout, "{}={}", entry.key, entry.value)?;
                }
            }
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Resolve `key` across `files`; the last file holding it wins
///
/// A file without the key is not an error. A missing file is, unless
/// `skip_missing` is set.
fn get(
    store: &Store,
    files: &[String],
    key: &str,
    default: Option<&str>,
    skip_missing: bool,
) -> Result<String, CliError> {
    let mode = read_mode(skip_missing);
    let mut found = None;

    for file in files {
        match store.repository_with_mode(file, mode).get(key) {
            Ok(entry) => found = Some(entry.value),
            Err(e) if e.is_key_not_found() => {
                tracing::debug!(file = %file, key = %key, "key not in file");
            }
            Err(e) => return Err(e.into()),
        }
    }

    match (found, default) {
        (Some(value), _) => Ok(value),
        (None, Some(default)) => Ok(default.to_string()),
        (None, None) => Err(KvfError::KeyNotFound {
            key: key.to_string(),
        }
        .into()),
    }
}

fn read_mode(skip_missing: bool) -> ReadMode {
    if skip_missing {
        ReadMode::SkipMissing
    } else {
        ReadMode::Strict
    }
}
