use crate::config::InputConfig;
use crate::error::{BatchError, Result};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct InvoiceFile {
    pub path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub mime_type: String,
    pub size: u64,
}

impl InvoiceFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .to_string();

        Self {
            path,
            filename,
            extension,
            mime_type,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

pub struct InvoiceScanner {
    filter: FileFilter,
}

impl InvoiceScanner {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
        }
    }

    /// Expands `pattern` and returns the matching invoice files sorted by path.
    pub fn scan(&self, pattern: &str) -> Result<Vec<InvoiceFile>> {
        // `*` must not pick up hidden files such as `._invoice.pdf`
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..Default::default()
        };
        let paths = glob::glob_with(pattern, options).map_err(|e| BatchError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let mut invoices = Vec::new();

        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!("Skipping unreadable path {}: {}", err.path().display(), err.error());
                    continue;
                }
            };

            if let Some(invoice) = self.process_path(&path) {
                invoices.push(invoice);
            }
        }

        if invoices.is_empty() {
            return Err(BatchError::NoMatchingFiles {
                pattern: pattern.to_string(),
                extensions: self.filter.get_extensions().clone(),
            });
        }

        // glob's ordering depends on the platform's collation; pin it down
        invoices.sort_by(|a, b| a.path.cmp(&b.path));

        debug!("Discovered {} invoice files for {}", invoices.len(), pattern);

        Ok(invoices)
    }

    fn process_path(&self, path: &Path) -> Option<InvoiceFile> {
        if !self.filter.is_invoice_file(path) {
            debug!("Ignoring {} (extension not allowed)", path.display());
            return None;
        }

        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                return None;
            }
        };

        if !metadata.is_file() {
            return None;
        }

        Some(InvoiceFile::new(path.to_path_buf(), metadata.len()))
    }

    pub fn get_statistics(&self, invoices: &[InvoiceFile]) -> ScanStatistics {
        let mut files_by_extension = std::collections::HashMap::new();
        for invoice in invoices {
            *files_by_extension
                .entry(invoice.extension.clone())
                .or_insert(0) += 1;
        }

        ScanStatistics {
            total_files: invoices.len(),
            total_size: invoices.iter().map(|i| i.size).sum(),
            files_by_extension,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: std::collections::HashMap<String, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        summary
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
