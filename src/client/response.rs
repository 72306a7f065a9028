//! Classification of raw API responses into per-file outcomes.

use serde_json::Value;

/// Status code and body of a completed upload.
#[derive(Debug, Clone)]
pub struct ExtractionResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// 200 with a JSON body. Holds the `result` member, or the whole body.
    Extracted { status: u16, payload: Value },
    /// Any status other than 200.
    HttpError { status: u16, excerpt: String },
    /// 200 whose body failed to decode as JSON.
    DecodeError { status: u16, excerpt: String },
}

impl ExtractionResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn classify(&self, max_chars: usize) -> ExtractionOutcome {
        if self.status != 200 {
            return ExtractionOutcome::HttpError {
                status: self.status,
                excerpt: truncate_chars(&self.body, max_chars).to_string(),
            };
        }

        match serde_json::from_str::<Value>(&self.body) {
            Ok(mut decoded) => {
                let payload = if decoded.get("result").is_some() {
                    decoded["result"].take()
                } else {
                    decoded
                };
                ExtractionOutcome::Extracted {
                    status: self.status,
                    payload,
                }
            }
            Err(_) => ExtractionOutcome::DecodeError {
                status: self.status,
                excerpt: truncate_chars(&self.body, max_chars).to_string(),
            },
        }
    }
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Extracted { .. })
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_member_is_unwrapped() {
        let response = ExtractionResponse::new(200, r#"{"result": {"invoice_number": "INV-1"}}"#);
        assert_eq!(
            response.classify(2000),
            ExtractionOutcome::Extracted {
                status: 200,
                payload: json!({"invoice_number": "INV-1"}),
            }
        );
    }

    #[test]
    fn test_body_without_result_is_used_whole() {
        let response = ExtractionResponse::new(200, r#"{"invoice_number": "INV-1"}"#);
        assert_eq!(
            response.classify(2000),
            ExtractionOutcome::Extracted {
                status: 200,
                payload: json!({"invoice_number": "INV-1"}),
            }
        );
    }

    #[test]
    fn test_null_result_stays_null() {
        let response = ExtractionResponse::new(200, r#"{"result": null, "status": "empty"}"#);
        assert_eq!(
            response.classify(2000),
            ExtractionOutcome::Extracted {
                status: 200,
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn test_non_object_body_is_used_whole() {
        let response = ExtractionResponse::new(200, "[1, 2, 3]");
        assert_eq!(
            response.classify(2000),
            ExtractionOutcome::Extracted {
                status: 200,
                payload: json!([1, 2, 3]),
            }
        );
    }

    #[test]
    fn test_http_error_is_truncated() {
        let body = "internal error".repeat(400);
        let body = truncate_chars(&body, 5000).to_string();
        assert_eq!(body.chars().count(), 5000);

        let outcome = ExtractionResponse::new(500, body.clone()).classify(2000);
        match outcome {
            ExtractionOutcome::HttpError { status, excerpt } => {
                assert_eq!(status, 500);
                assert_eq!(excerpt.chars().count(), 2000);
                assert_eq!(excerpt, &body[..2000]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_non_200_success_codes_are_errors() {
        let outcome = ExtractionResponse::new(201, r#"{"result": {}}"#).classify(2000);
        assert!(matches!(outcome, ExtractionOutcome::HttpError { status: 201, .. }));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let outcome = ExtractionResponse::new(200, "not json").classify(2000);
        assert_eq!(
            outcome,
            ExtractionOutcome::DecodeError {
                status: 200,
                excerpt: "not json".to_string(),
            }
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("Łódź", 2), "Łó");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
