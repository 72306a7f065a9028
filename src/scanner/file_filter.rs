use crate::config::InputConfig;
use std::path::Path;

/// Case-insensitive extension allow-list for upload candidates.
pub struct FileFilter {
    extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(config: &InputConfig) -> Self {
        let mut filter = Self {
            extensions: Vec::with_capacity(config.extensions.len()),
        };
        for extension in &config.extensions {
            filter.add_extension(extension.as_str());
        }
        filter
    }

    pub fn is_invoice_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn get_extensions(&self) -> &Vec<String> {
        &self.extensions
    }

    pub fn add_extension<S: Into<String>>(&mut self, extension: S) {
        let ext = extension.into().trim_start_matches('.').to_lowercase();
        if !ext.is_empty() && !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        let config = InputConfig::default();
        Self::new(&config)
    }
}
