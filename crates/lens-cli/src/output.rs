use lens_core::domain::file_entry::{FileEntry, SyncStatus};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}

/// Short marker shown before an entry in human listings
pub fn status_marker(entry: &FileEntry) -> &'static str {
    if entry.is_folder {
        return "[dir]";
    }
    match entry.status {
        SyncStatus::Untracked => "     ",
        SyncStatus::Synced => "  ok ",
        SyncStatus::ToUpload => "  up ",
        SyncStatus::ToDownload => " down",
    }
}

/// Prints a workspace listing
pub fn print_entries(fmt: &dyn OutputFormatter, format: OutputFormat, heading: &str, entries: &[FileEntry]) {
    if format == OutputFormat::Json {
        fmt.print_json(&serde_json::json!({
            "path": heading,
            "entries": entries,
        }));
        return;
    }

    fmt.success(heading);
    if entries.is_empty() {
        fmt.info("(empty)");
    }
    for entry in entries {
        fmt.info(&format!("{} {}", status_marker(entry), entry.name));
    }
}
