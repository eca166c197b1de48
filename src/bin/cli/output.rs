//! Output formatting for CLI operations.

use serde_json::json;

use guitar::{ExportResult, ImportResult};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats export results
    fn format_export_result(&self, result: &ExportResult) -> String;

    /// Formats import results
    fn format_import_result(&self, result: &ImportResult) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_export_result(&self, result: &ExportResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Exported {} entries: {} files, {} directories, {} symlinks\n",
            result.entries, result.files, result.directories, result.symlinks
        ));
        output.push_str(&format!(
            "  Content:  {}\n",
            humanize_bytes(result.bytes_written)
        ));
        output.push_str(&format!(
            "  Metadata: {}\n",
            result.sidecar_path.display()
        ));
        output
    }

    fn format_import_result(&self, result: &ImportResult) -> String {
        format!(
            "Imported {} entries: {} files, {} hard links, {} content\n",
            result.entries_written,
            result.files,
            result.hard_links,
            humanize_bytes(result.bytes_written)
        )
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_export_result(&self, result: &ExportResult) -> String {
        let obj = json!({
            "entries": result.entries,
            "files": result.files,
            "directories": result.directories,
            "symlinks": result.symlinks,
            "bytes_written": result.bytes_written,
            "sidecar_path": result.sidecar_path.display().to_string(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_import_result(&self, result: &ImportResult) -> String {
        let obj = json!({
            "entries_written": result.entries_written,
            "files": result.files,
            "hard_links": result.hard_links,
            "bytes_written": result.bytes_written,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
