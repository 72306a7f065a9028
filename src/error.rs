use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("API key is not configured: set {env_var}")]
    MissingApiKey { env_var: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid file pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No matching files found for pattern: {pattern}")]
    NoMatchingFiles {
        pattern: String,
        extensions: Vec<String>,
    },

    #[error("Failed to read {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error occurred: {message}")]
    NetworkError { message: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// Whether the error came from a single upload rather than from setup.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            BatchError::FileRead { .. } | BatchError::NetworkError { .. } | BatchError::Timeout { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for BatchError {
    fn user_message(&self) -> String {
        match self {
            BatchError::MissingApiKey { env_var } => {
                format!("Set the {} environment variable to your API key", env_var)
            }
            BatchError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            BatchError::InvalidUrl { url } => {
                format!("Invalid endpoint URL: {}", url)
            }
            BatchError::InvalidPattern { pattern, message } => {
                format!("Invalid file pattern '{}': {}", pattern, message)
            }
            BatchError::NoMatchingFiles { pattern, .. } => {
                format!("No matching files found for pattern: {}", pattern)
            }
            BatchError::FileRead { path, source } => {
                format!("Could not read {}: {}", path, source)
            }
            BatchError::NetworkError { message } => {
                format!("Network error: {}", message)
            }
            BatchError::Timeout { seconds } => {
                format!("Request timed out after {} seconds", seconds)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            BatchError::MissingApiKey { env_var } => Some(format!(
                "Export your key first, e.g. `export {}=<your key>`. The placeholder value API_KEY is rejected.",
                env_var
            )),
            BatchError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config.".to_string()
            ),
            BatchError::InvalidUrl { .. } => Some(
                "Use an absolute http:// or https:// URL for --url or [api].url.".to_string()
            ),
            BatchError::InvalidPattern { .. } => Some(
                "Quote the pattern so your shell does not expand it, e.g. 'invoices/*'.".to_string()
            ),
            BatchError::NoMatchingFiles { extensions, .. } => Some(format!(
                "Only files with these extensions are uploaded: {}. Check the pattern or use --formats.",
                extensions.join(", ")
            )),
            BatchError::NetworkError { .. } => Some(
                "Check your internet connection and try again. Use --continue-on-error to keep going past failed uploads.".to_string()
            ),
            BatchError::Timeout { .. } => Some(
                "The API took longer than expected. Try again or increase the limit with --timeout.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BatchError {
    fn from(error: reqwest::Error) -> Self {
        BatchError::NetworkError {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
