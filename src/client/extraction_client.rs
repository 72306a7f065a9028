use crate::client::response::ExtractionResponse;
use crate::config::{ApiKey, Config};
use crate::error::{BatchError, Result};
use crate::scanner::InvoiceFile;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Flags sent as the JSON `options` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractionOptions {
    pub return_schema: bool,
    pub return_selected_fields: bool,
}

impl ExtractionOptions {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BatchError::Config {
            message: format!("Failed to encode request options: {}", e),
        })
    }
}

/// Uploads one invoice per call to the extraction endpoint.
pub struct ExtractionClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: ApiKey,
    prompt: String,
    options: ExtractionOptions,
    timeout: Duration,
}

impl ExtractionClient {
    pub fn new(config: &Config, api_key: ApiKey) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("invoice-batch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint()?,
            api_key,
            prompt: config.extraction.prompt.clone(),
            options: ExtractionOptions {
                return_schema: config.extraction.return_schema,
                return_selected_fields: config.extraction.return_selected_fields,
            },
            timeout: config.request_timeout(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn options(&self) -> ExtractionOptions {
        self.options
    }

    /// Sends `invoice` and waits for the full response body.
    ///
    /// Any HTTP status is returned as a response; only transport failures,
    /// timeouts and unreadable files are errors.
    pub async fn extract(&self, invoice: &InvoiceFile) -> Result<ExtractionResponse> {
        let bytes = tokio::fs::read(&invoice.path)
            .await
            .map_err(|source| BatchError::FileRead {
                path: invoice.display_path(),
                source,
            })?;

        let part = Part::bytes(bytes)
            .file_name(invoice.filename.clone())
            .mime_str(&invoice.mime_type)?;

        let form = Form::new()
            .part("file", part)
            .text("prompt", self.prompt.clone())
            .text("options", self.options.to_json()?);

        debug!(
            "POST {} file={} mime={} size={}",
            self.endpoint,
            invoice.filename,
            invoice.mime_type,
            invoice.size
        );

        let started = Instant::now();
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.expose())
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        info!(
            "{} -> HTTP {} in {:?}",
            invoice.filename,
            status,
            started.elapsed()
        );

        Ok(ExtractionResponse::new(status, body))
    }

    fn transport_error(&self, error: reqwest::Error) -> BatchError {
        if error.is_timeout() {
            return BatchError::Timeout {
                seconds: self.timeout.as_secs(),
            };
        }

        let mut message = error.to_string();
        if let Some(source) = std::error::Error::source(&error) {
            message.push_str(&format!(": {}", source));
        }
        BatchError::NetworkError { message }
    }
}
