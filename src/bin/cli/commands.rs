//! Command implementations for the CLI tool.

use std::io::{self, BufWriter, IsTerminal};
use std::path::Path;

use guitar::{ExportOptions, HeaderFormat, ImportOptions, SymlinkPolicy};

use crate::OutputFormat;
use crate::exit_codes::{Direction, ExitCode, error_to_exit_code};
use crate::output::{OutputFormatter, create_formatter};

/// Configuration for the export command.
pub struct ExportConfig<'a> {
    pub archive: Option<&'a Path>,
    pub directory: &'a Path,
    pub create_symlinks: bool,
    pub preserve_mtime: bool,
    pub sidecar: &'a str,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Configuration for the import command.
pub struct ImportConfig<'a> {
    pub archive: Option<&'a Path>,
    pub directory: &'a Path,
    pub ustar: bool,
    pub sidecar: &'a str,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// `-` and a missing argument both mean the standard stream.
fn named_file(archive: Option<&Path>) -> Option<&Path> {
    archive.filter(|p| *p != Path::new("-"))
}

/// Export command implementation
pub fn export(config: &ExportConfig<'_>) -> ExitCode {
    let symlinks = if config.create_symlinks {
        SymlinkPolicy::Create
    } else {
        SymlinkPolicy::Record
    };
    let options = ExportOptions::new()
        .sidecar_name(config.sidecar)
        .symlinks(symlinks)
        .preserve_mtime(config.preserve_mtime);

    let result = match named_file(config.archive) {
        Some(path) => guitar::export_from_path(path, config.directory, &options),
        None => guitar::export_from_reader(io::stdin().lock(), config.directory, &options),
    };

    report(result, Direction::Export, config.format, config.quiet, |formatter, result| {
        formatter.format_export_result(result)
    })
}

/// Import command implementation
pub fn import(config: &ImportConfig<'_>) -> ExitCode {
    let header_format = if config.ustar {
        HeaderFormat::Ustar
    } else {
        HeaderFormat::Gnu
    };
    let options = ImportOptions::new()
        .sidecar_name(config.sidecar)
        .header_format(header_format);

    let result = match named_file(config.archive) {
        Some(path) => guitar::import_to_path(config.directory, path, &options),
        None => {
            let stdout = io::stdout();
            if stdout.is_terminal() {
                eprintln!("Error: refusing to write an archive to a terminal; use -f FILE");
                return ExitCode::BadArgs;
            }
            guitar::import_to_writer(BufWriter::new(stdout.lock()), config.directory, &options)
        }
    };

    report(result, Direction::Import, config.format, config.quiet, |formatter, result| {
        formatter.format_import_result(result)
    })
}

/// Prints the summary (to stderr, stdout may carry the archive) or the
/// error, and picks the exit code.
fn report<T>(
    result: guitar::Result<T>,
    direction: Direction,
    format: OutputFormat,
    quiet: bool,
    render: impl Fn(&dyn OutputFormatter, &T) -> String,
) -> ExitCode {
    match result {
        Ok(result) => {
            if !quiet {
                let formatter = create_formatter(format);
                eprintln!("{}", render(formatter.as_ref(), &result).trim_end());
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e, direction)
        }
    }
}
