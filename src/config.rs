use crate::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the extraction API key.
pub const API_KEY_ENV: &str = "PARSERDATA_API_KEY";

/// Value shipped in sample scripts; treated the same as an unset key.
pub const API_KEY_PLACEHOLDER: &str = "API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://api.parserdata.com/v1/extract";

pub const DEFAULT_PROMPT: &str = "Extract invoice number, invoice date, supplier name, total amount, and line items \
(description, quantity, unit price, net amount).";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub extraction: ExtractionConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub prompt: String,
    pub return_schema: bool,
    pub return_selected_fields: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub pattern: String,
    pub extensions: Vec<String>,
    pub max_error_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            extraction: ExtractionConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            timeout: 300, // 5 minutes
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            return_schema: false,
            return_selected_fields: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pattern: "invoices/*".to_string(),
            extensions: vec![
                "pdf".to_string(),
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
            ],
            max_error_chars: 2000,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BatchError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BatchError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| BatchError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["invoice-batch.toml", ".invoice-batch.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref pattern) = cli_args.pattern {
            self.input.pattern = pattern.clone();
        }

        if let Some(ref formats) = cli_args.formats {
            self.input.extensions = formats
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(ref url) = cli_args.url {
            self.api.url = url.clone();
        }

        if let Some(ref prompt) = cli_args.prompt {
            self.extraction.prompt = prompt.clone();
        }

        if let Some(timeout) = cli_args.timeout {
            self.api.timeout = timeout;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.extensions.is_empty() {
            return Err(BatchError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if self.input.pattern.trim().is_empty() {
            return Err(BatchError::Config {
                message: "Input pattern must not be empty".to_string(),
            });
        }

        if self.input.max_error_chars == 0 {
            return Err(BatchError::Config {
                message: "max_error_chars must be greater than 0".to_string(),
            });
        }

        if self.api.timeout == 0 {
            return Err(BatchError::Config {
                message: "Request timeout must be greater than 0".to_string(),
            });
        }

        if self.extraction.prompt.trim().is_empty() {
            return Err(BatchError::Config {
                message: "Extraction prompt must not be empty".to_string(),
            });
        }

        self.endpoint()?;

        Ok(())
    }

    pub fn endpoint(&self) -> Result<Url> {
        let url = Url::parse(&self.api.url).map_err(|e| BatchError::InvalidUrl {
            url: format!("{} ({})", self.api.url, e),
        })?;

        match url.scheme() {
            "https" | "http" => Ok(url),
            other => Err(BatchError::InvalidUrl {
                url: format!("{} (unsupported scheme '{}')", self.api.url, other),
            }),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

/// Secret for the `X-API-Key` header. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn from_env() -> Result<Self> {
        Self::parse(std::env::var(API_KEY_ENV).ok())
    }

    pub fn parse(value: Option<String>) -> Result<Self> {
        match value {
            // whitespace only counts for the emptiness check; the key is sent as given
            Some(key) if !key.trim().is_empty() && key.trim() != API_KEY_PLACEHOLDER => Ok(Self(key)),
            _ => Err(BatchError::MissingApiKey {
                env_var: API_KEY_ENV.to_string(),
            }),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub pattern: Option<String>,
    pub formats: Option<String>,
    pub url: Option<String>,
    pub prompt: Option<String>,
    pub timeout: Option<u64>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_formats(mut self, formats: Option<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }
}
