//! CLI tool for guitar export and import.

mod commands;
mod exit_codes;
mod output;

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Environment variable holding an `env_logger` filter.
const LOG_ENV: &str = "GUITAR_LOG";

/// Convert tar archives to directories with metadata and back
#[derive(Parser)]
#[command(name = "guitar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Summary format
    #[arg(long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Suppress the summary and all log output but errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Unpack an archive into a directory plus metadata (alias: x)
    #[command(alias = "x")]
    Export {
        /// Archive to read; standard input if absent or `-`
        #[arg(short = 'f', long = "file", value_name = "ARCHIVE")]
        archive: Option<PathBuf>,

        /// Destination directory
        #[arg(short = 'C', long = "directory", value_name = "DIR", default_value = ".")]
        directory: PathBuf,

        /// Create symbolic links on disk instead of recording them only
        #[arg(long)]
        create_symlinks: bool,

        /// Apply each file's modification time on disk
        #[arg(long)]
        preserve_mtime: bool,

        /// Name of the metadata file
        #[arg(long, value_name = "NAME", default_value = guitar::SIDECAR_FILE_NAME)]
        sidecar: String,
    },

    /// Pack a directory and its metadata into an archive (alias: c)
    #[command(alias = "c")]
    Import {
        /// Archive to write; standard output if absent or `-`
        #[arg(short = 'f', long = "file", value_name = "ARCHIVE")]
        archive: Option<PathBuf>,

        /// Source directory
        #[arg(short = 'C', long = "directory", value_name = "DIR", default_value = ".")]
        directory: PathBuf,

        /// Write POSIX ustar headers instead of GNU headers
        #[arg(long)]
        ustar: bool,

        /// Name of the metadata file
        #[arg(long, value_name = "NAME", default_value = guitar::SIDECAR_FILE_NAME)]
        sidecar: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, 2) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(env_logger::Env::new().filter(LOG_ENV))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::BadArgs
            } else {
                ExitCode::Success
            };
            // Printing help or usage only fails if stdout/stderr are gone.
            let _ = e.print();
            std::process::exit(code.code());
        }
    };

    init_logging(cli.verbose, cli.quiet);

    let exit_code = match cli.command {
        Commands::Export {
            archive,
            directory,
            create_symlinks,
            preserve_mtime,
            sidecar,
        } => commands::export(&commands::ExportConfig {
            archive: archive.as_deref(),
            directory: &directory,
            create_symlinks,
            preserve_mtime,
            sidecar: &sidecar,
            format: cli.output,
            quiet: cli.quiet,
        }),

        Commands::Import {
            archive,
            directory,
            ustar,
            sidecar,
        } => commands::import(&commands::ImportConfig {
            archive: archive.as_deref(),
            directory: &directory,
            ustar,
            sidecar: &sidecar,
            format: cli.output,
            quiet: cli.quiet,
        }),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
