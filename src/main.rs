use clap::Parser;
use invoice_batch::{
    discover_invoices, exit_code_for, generate_sample_config, logging, output_mode_for, BatchError,
    Cli, InvoiceBatch, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    if cli.dry_run {
        return handle_dry_run(&cli);
    }

    let batch = match InvoiceBatch::from_cli(&cli) {
        Ok(batch) => batch,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code_for(&e);
        }
    };

    match batch.run().await {
        Ok(report) => {
            if report.failures.is_empty() {
                0
            } else {
                2 // Completed, but some uploads never reached the API
            }
        }
        Err(e) => {
            batch.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "invoice-batch.toml".to_string());

    match generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  invoice-batch --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli) -> i32 {
    let formatter = OutputFormatter::new(output_mode_for(&cli.output_format), cli.verbose, cli.quiet);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return exit_code_for(&e);
        }
    };

    let invoices = match discover_invoices(&config) {
        Ok(invoices) => invoices,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return exit_code_for(&e);
        }
    };

    if formatter.mode() != OutputMode::Json && !cli.quiet {
        println!("DRY RUN - {} files would be uploaded to {}", invoices.len(), config.api.url);
        formatter.print_separator();
    }
    formatter.print_file_list(&invoices);

    0
}

fn print_startup_error(cli: &Cli, error: &BatchError) {
    let formatter = OutputFormatter::new(output_mode_for(&cli.output_format), 0, false);
    formatter.print_user_friendly_error(error);
}
