use crate::client::ExtractionOutcome;
use std::time::{Duration, Instant};

/// Running tally of a batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total_files: usize,
    pub files_processed: usize,
    pub succeeded: usize,
    pub http_errors: usize,
    pub decode_errors: usize,
    /// Transport or read failures skipped under `--continue-on-error`.
    pub failures: Vec<String>,
    pub start_time: Instant,
}

impl BatchReport {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            files_processed: 0,
            succeeded: 0,
            http_errors: 0,
            decode_errors: 0,
            failures: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: &ExtractionOutcome) {
        self.files_processed += 1;
        match outcome {
            ExtractionOutcome::Extracted { .. } => self.succeeded += 1,
            ExtractionOutcome::HttpError { .. } => self.http_errors += 1,
            ExtractionOutcome::DecodeError { .. } => self.decode_errors += 1,
        }
    }

    pub fn record_failure<S: Into<String>>(&mut self, failure: S) {
        self.files_processed += 1;
        self.failures.push(failure.into());
    }

    pub fn failed(&self) -> usize {
        self.http_errors + self.decode_errors + self.failures.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_counts() {
        let mut report = BatchReport::new(4);

        report.record(&ExtractionOutcome::Extracted {
            status: 200,
            payload: json!({}),
        });
        report.record(&ExtractionOutcome::HttpError {
            status: 500,
            excerpt: String::new(),
        });
        report.record(&ExtractionOutcome::DecodeError {
            status: 200,
            excerpt: "not json".to_string(),
        });
        report.record_failure("c.pdf: timed out");

        assert_eq!(report.files_processed, 4);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.failures, vec!["c.pdf: timed out"]);
    }
}
