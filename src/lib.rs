pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{ApiKey, CliOverrides, Config, API_KEY_ENV};
pub use error::{BatchError, Result, UserFriendlyError};

pub use client::{ExtractionClient, ExtractionOptions, ExtractionOutcome, ExtractionResponse};
pub use report::BatchReport;
pub use scanner::{FileFilter, InvoiceFile, InvoiceScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use tracing::warn;

/// Uploads a set of invoices one after another and prints each result.
pub struct InvoiceBatch {
    config: Config,
    client: ExtractionClient,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    continue_on_error: bool,
}

impl InvoiceBatch {
    pub fn new(
        config: Config,
        api_key: ApiKey,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Result<Self> {
        let client = ExtractionClient::new(&config, api_key)?;
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);

        Ok(Self {
            config,
            client,
            output_formatter,
            progress_manager,
            continue_on_error: false,
        })
    }

    /// The API key is resolved before the configuration file is touched.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let api_key = ApiKey::from_env()?;
        let config = cli_args.load_config()?;

        let batch = Self::new(
            config,
            api_key,
            output_mode_for(&cli_args.output_format),
            cli_args.verbose,
            cli_args.quiet,
        )?;

        Ok(batch.with_continue_on_error(cli_args.continue_on_error))
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn with_client(mut self, client: ExtractionClient) -> Self {
        self.client = client;
        self
    }

    /// Discover files for the configured pattern and upload them all.
    pub async fn run(&self) -> Result<BatchReport> {
        let invoices = discover_invoices(&self.config)?;

        let stats = InvoiceScanner::new(&self.config.input).get_statistics(&invoices);
        self.output_formatter.debug(&stats.display_summary());
        self.output_formatter.info(&format!(
            "Found {} invoice files, uploading to {}",
            invoices.len(),
            self.client.endpoint()
        ));

        let report = self.process_files(&invoices).await?;
        self.output_formatter.print_batch_summary(&report);

        Ok(report)
    }

    /// Uploads `invoices` in order, awaiting each before starting the next.
    ///
    /// Non-200 statuses and undecodable bodies are printed and counted.
    /// Transport, timeout and read failures end the batch unless
    /// `continue_on_error` is set.
    pub async fn process_files(&self, invoices: &[InvoiceFile]) -> Result<BatchReport> {
        let mut report = BatchReport::new(invoices.len());

        for (index, invoice) in invoices.iter().enumerate() {
            let spinner = self.progress_manager.create_upload_spinner(
                &invoice.filename,
                index + 1,
                invoices.len(),
            );
            let result = self.extract_one(invoice).await;
            spinner.finish_and_clear();

            match result {
                Ok(outcome) => {
                    self.output_formatter.print_file_result(invoice, &outcome);
                    report.record(&outcome);
                }
                Err(e) if self.continue_on_error && e.is_per_file() => {
                    warn!("Skipping {}: {}", invoice.display_path(), e);
                    self.output_formatter.print_file_failure(invoice, &e);
                    report.record_failure(format!("{}: {}", invoice.filename, e.user_message()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    pub async fn extract_one(&self, invoice: &InvoiceFile) -> Result<ExtractionOutcome> {
        let response = self.client.extract(invoice).await?;
        Ok(response.classify(self.config.input.max_error_chars))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handle_error(&self, error: &BatchError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Expand the configured pattern into the sorted list of upload candidates.
pub fn discover_invoices(config: &Config) -> Result<Vec<InvoiceFile>> {
    let scanner = InvoiceScanner::new(&config.input);
    scanner.scan(&config.input.pattern)
}

pub fn output_mode_for(format: &OutputFormat) -> OutputMode {
    match format {
        OutputFormat::Human => OutputMode::Human,
        OutputFormat::Json => OutputMode::Json,
        OutputFormat::Plain => OutputMode::Plain,
    }
}

/// Generate sample configuration file
pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let sample_config = Config::create_sample_config();
    std::fs::write(output_path.as_ref(), sample_config)?;
    Ok(())
}

/// Process exit status for an error that ended the run.
pub fn exit_code_for(error: &BatchError) -> i32 {
    match error {
        BatchError::NetworkError { .. } => 5,
        BatchError::FileRead { .. } => 7,
        BatchError::Timeout { .. } => 9,
        _ => 1,
    }
}
