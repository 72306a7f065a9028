use crate::client::ExtractionOutcome;
use crate::error::{BatchError, UserFriendlyError};
use crate::report::BatchReport;
use crate::scanner::InvoiceFile;
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CROSS: Emoji = Emoji("❌ ", "x ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");

/// Writes per-file results to stdout in the selected mode.
///
/// Results are printed regardless of `quiet`; quiet only silences the
/// informational messages around them. In human and plain modes those
/// messages go to stderr so stdout carries only results.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => eprintln!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!("  {}", style(message).dim());
                    } else {
                        eprintln!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => eprintln!("DEBUG: {}", message),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &BatchError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_file_result(&self, invoice: &InvoiceFile, outcome: &ExtractionOutcome) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&json_result(invoice, outcome)),
            OutputMode::Human | OutputMode::Plain => {
                self.print_banner(&invoice.filename);
                let mut lines = result_lines(outcome).into_iter();
                if let Some(status_line) = lines.next() {
                    if self.use_colors {
                        let styled = if outcome.is_success() {
                            style(status_line).green()
                        } else {
                            style(status_line).red()
                        };
                        println!("{}", styled);
                    } else {
                        println!("{}", status_line);
                    }
                }
                for line in lines {
                    println!("{}", line);
                }
            }
        }
    }

    /// Reports an upload that failed below HTTP and was skipped.
    pub fn print_file_failure(&self, invoice: &InvoiceFile, error: &BatchError) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&json!({
                "file": invoice.filename,
                "path": invoice.display_path(),
                "error": "transport",
                "message": error.user_message(),
            })),
            OutputMode::Human | OutputMode::Plain => {
                self.print_banner(&invoice.filename);
                println!("Error: {}", error.user_message());
            }
        }
    }

    pub fn print_file_list(&self, invoices: &[InvoiceFile]) {
        for invoice in invoices {
            match self.mode {
                OutputMode::Json => self.print_json_object(&json!({
                    "file": invoice.filename,
                    "path": invoice.display_path(),
                    "mime_type": invoice.mime_type,
                    "size": invoice.size,
                })),
                OutputMode::Human | OutputMode::Plain => println!(
                    "  {} ({}, {})",
                    invoice.display_path(),
                    invoice.mime_type,
                    invoice.format_size()
                ),
            }
        }
    }

    pub fn print_batch_summary(&self, report: &BatchReport) {
        if !self.should_show_message(1) {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Json => self.print_json_object(&json!({
                "type": "summary",
                "files": report.total_files,
                "processed": report.files_processed,
                "succeeded": report.succeeded,
                "http_errors": report.http_errors,
                "decode_errors": report.decode_errors,
                "skipped": report.failures.len(),
                "duration_ms": report.elapsed().as_millis() as u64,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => {
                println!("COMPLETED: Invoice extraction");
                println!("Files processed: {}/{}", report.files_processed, report.total_files);
                println!("Succeeded: {}", report.succeeded);
                println!("Failed: {}", report.failed());
                println!("Duration: {:?}", report.elapsed());
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_banner(&self, filename: &str) {
        println!();
        let banner = format!("=== {} ===", filename);
        if self.use_colors {
            println!("{}", style(banner).bold().cyan());
        } else {
            println!("{}", banner);
        }
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", CROSS, style(message).red().bold()),
                MessageType::Info => eprintln!("{}{}", INFO, style(message).cyan()),
            }
        } else {
            match msg_type {
                MessageType::Error => eprintln!("x {}", message),
                MessageType::Info => eprintln!("i {}", message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, report: &BatchReport) {
        println!();
        self.print_separator();

        let headline = format!(
            "Processed {} of {} invoices",
            report.files_processed, report.total_files
        );
        if self.use_colors {
            println!("{}", style(headline).green().bold());
        } else {
            println!("{}", headline);
        }

        println!("  Succeeded:     {}", report.succeeded);
        println!("  HTTP errors:   {}", report.http_errors);
        println!("  Invalid JSON:  {}", report.decode_errors);
        if !report.failures.is_empty() {
            println!("  Skipped:       {}", report.failures.len());
            for failure in &report.failures {
                println!("    - {}", failure);
            }
        }
        println!("  Time taken:    {}", format_duration(report.elapsed()));

        self.print_separator();
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Info,
}

/// Text lines printed under a file's banner, status line first.
pub fn result_lines(outcome: &ExtractionOutcome) -> Vec<String> {
    match outcome {
        ExtractionOutcome::Extracted { status, payload } => vec![
            format!("Status: {}", status),
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
        ],
        ExtractionOutcome::HttpError { status, excerpt } => vec![
            format!("Status: {}", status),
            format!("Error body: {}", excerpt),
        ],
        ExtractionOutcome::DecodeError { status, excerpt } => vec![
            format!("Status: {}", status),
            "Error: Could not decode JSON response".to_string(),
            format!("Raw body: {}", excerpt),
        ],
    }
}

pub fn json_result(invoice: &InvoiceFile, outcome: &ExtractionOutcome) -> Value {
    match outcome {
        ExtractionOutcome::Extracted { status, payload } => json!({
            "file": invoice.filename,
            "path": invoice.display_path(),
            "status": status,
            "result": payload,
        }),
        ExtractionOutcome::HttpError { status, excerpt } => json!({
            "file": invoice.filename,
            "path": invoice.display_path(),
            "status": status,
            "error": "http_error",
            "body": excerpt,
        }),
        ExtractionOutcome::DecodeError { status, excerpt } => json!({
            "file": invoice.filename,
            "path": invoice.display_path(),
            "status": status,
            "error": "invalid_json",
            "body": excerpt,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.should_show_message(0));
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }

    #[test]
    fn test_extracted_lines_are_pretty_printed() {
        let outcome = ExtractionOutcome::Extracted {
            status: 200,
            payload: json!({"invoice_number": "INV-1", "supplier_name": "Łódź Sp. z o.o."}),
        };

        let lines = result_lines(&outcome);
        assert_eq!(lines[0], "Status: 200");
        assert_eq!(
            lines[1],
            "{\n  \"invoice_number\": \"INV-1\",\n  \"supplier_name\": \"Łódź Sp. z o.o.\"\n}"
        );
    }

    #[test]
    fn test_error_lines() {
        let http = ExtractionOutcome::HttpError {
            status: 401,
            excerpt: "unauthorized".to_string(),
        };
        assert_eq!(result_lines(&http), vec!["Status: 401", "Error body: unauthorized"]);

        let decode = ExtractionOutcome::DecodeError {
            status: 200,
            excerpt: "not json".to_string(),
        };
        assert_eq!(
            result_lines(&decode),
            vec![
                "Status: 200",
                "Error: Could not decode JSON response",
                "Raw body: not json"
            ]
        );
    }

    #[test]
    fn test_json_result() {
        let invoice = InvoiceFile::new(PathBuf::from("in/a.pdf"), 10);
        let outcome = ExtractionOutcome::HttpError {
            status: 500,
            excerpt: "boom".to_string(),
        };

        let value = json_result(&invoice, &outcome);
        assert_eq!(value["file"], "a.pdf");
        assert_eq!(value["status"], 500);
        assert_eq!(value["error"], "http_error");
        assert_eq!(value["body"], "boom");
    }
}
