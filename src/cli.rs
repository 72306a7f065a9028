use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "invoice-batch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload invoice files to the Parserdata extraction API and print the results")]
#[command(
    long_about = "invoice-batch sends every PDF, PNG and JPEG invoice matching a glob pattern \
                  to the Parserdata extraction API, one file at a time, and prints the extracted \
                  fields as JSON. The API key is read from the PARSERDATA_API_KEY environment variable."
)]
#[command(after_help = "EXAMPLES:\n  \
    invoice-batch 'invoices/*'\n  \
    invoice-batch '~/Downloads/invoices/*.pdf' --output-format json\n  \
    invoice-batch 'scans/**/*' --prompt 'Extract the IBAN and due date.'\n  \
    invoice-batch --config my-config.toml --dry-run")]
pub struct Cli {
    /// Glob pattern selecting the input files (defaults to the configured pattern)
    pub pattern: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Extraction endpoint URL
    #[arg(long)]
    pub url: Option<String>,

    /// Extraction prompt sent with every file
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Request timeout in seconds
    #[arg(long, help = "Timeout for each upload (seconds)")]
    pub timeout: Option<u64>,

    /// File extensions to upload (comma-separated)
    #[arg(short, long, help = "File extensions to upload (e.g., pdf,png,jpg,jpeg)")]
    pub formats: Option<String>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Keep going when an upload fails at the network level
    #[arg(long)]
    pub continue_on_error: bool,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (list the files that would be uploaded)
    #[arg(long, help = "List matching files without uploading them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// One JSON object per file
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_pattern(self.pattern.clone())
            .with_formats(self.formats.clone())
            .with_url(self.url.clone())
            .with_prompt(self.prompt.clone())
            .with_timeout(self.timeout)
    }
}
