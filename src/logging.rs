use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbosity: u8, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    format!("invoice_batch={}", level)
}

/// Diagnostics go to stderr; stdout carries only results.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    // A subscriber may already be installed when embedded in a larger program.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0, false), "invoice_batch=warn");
        assert_eq!(default_directive(1, false), "invoice_batch=info");
        assert_eq!(default_directive(2, false), "invoice_batch=debug");
        assert_eq!(default_directive(5, false), "invoice_batch=trace");
        assert_eq!(default_directive(3, true), "invoice_batch=error");
    }
}
