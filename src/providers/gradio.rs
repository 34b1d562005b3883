//! Gradio two-phase prediction client.
//!
//! The remote endpoint runs jobs asynchronously: a POST submits the query
//! and returns an event id, then a GET on that id returns the finished
//! result as an event-stream-formatted text body. Only the first `data:`
//! line of that body carries the payload.

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Hosted space the shipped widget talked to.
const DEFAULT_BASE_URL: &str = "https://faizzabrar-lawyer-test2.hf.space";

// === Errors ===

/// Failure modes of a single prediction request.
///
/// `Display` renders the short form of each failure; [`PredictError::user_message`]
/// maps it to the string shown in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    /// Transport-level failure on either phase (connect, timeout, io).
    Network(String),
    /// Non-2xx status from the submit call.
    SubmitStatus(u16),
    /// Non-2xx status from the poll call.
    PollStatus(u16),
    /// Submit response carried no usable event id.
    MissingEventId,
    /// Poll body carried no parsable, non-empty payload.
    NoValidData,
    /// Body could not be decoded where one was expected.
    Parse(String),
}

impl PredictError {
    /// Renders the error the way the transcript shows it.
    ///
    /// The two presence-check failures are shown verbatim; everything else
    /// gets the apology prefix.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::MissingEventId | PredictError::NoValidData => self.to_string(),
            _ => format!("Sorry, an error occurred: {}", self),
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::Network(msg) | PredictError::Parse(msg) => write!(f, "{}", msg),
            PredictError::SubmitStatus(status) => write!(f, "HTTP error! status: {}", status),
            PredictError::PollStatus(status) => {
                write!(f, "Error fetching result! status: {}", status)
            }
            PredictError::MissingEventId => write!(f, "No event ID received."),
            PredictError::NoValidData => {
                write!(f, "No valid data found in the final response.")
            }
        }
    }
}

impl std::error::Error for PredictError {}

// === Configuration ===

/// Configuration for the Gradio client.
#[derive(Debug, Clone)]
pub struct GradioConfig {
    pub base_url: String,
}

impl GradioConfig {
    /// Creates a config from the environment.
    ///
    /// Base URL resolution order:
    /// 1. `GRADCHAT_BASE_URL` env var (if set and non-empty)
    /// 2. `config_base_url` parameter (if Some and non-empty)
    /// 3. Default: the hosted space URL
    pub fn from_env(config_base_url: Option<&str>) -> Result<Self> {
        let base_url = Self::resolve_base_url(config_base_url)?;
        Ok(Self { base_url })
    }

    /// Resolves the base URL with precedence: env > config > default.
    /// Validates that the URL is well-formed.
    fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
        if let Ok(env_url) = std::env::var("GRADCHAT_BASE_URL") {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                Self::validate_url(trimmed)?;
                return Ok(trimmed.to_string());
            }
        }

        if let Some(config_url) = config_base_url {
            let trimmed = config_url.trim();
            if !trimmed.is_empty() {
                Self::validate_url(trimmed)?;
                return Ok(trimmed.to_string());
            }
        }

        Ok(DEFAULT_BASE_URL.to_string())
    }

    /// Validates that a URL is well-formed.
    fn validate_url(url: &str) -> Result<()> {
        url::Url::parse(url).with_context(|| format!("Invalid base URL: {}", url))?;
        Ok(())
    }
}

// === Client ===

/// Client for the two-phase predict endpoint.
pub struct GradioClient {
    config: GradioConfig,
    http: reqwest::Client,
}

impl GradioClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: GradioConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Runs the full submit-then-poll sequence for one query.
    pub async fn predict(&self, query: &str) -> std::result::Result<String, PredictError> {
        let event_id = self.submit(query).await?;
        self.poll(&event_id).await
    }

    /// Submits the query and returns the server-issued event id.
    async fn submit(&self, query: &str) -> std::result::Result<String, PredictError> {
        let url = format!("{}/call/predict", self.config.base_url);
        let request = CallRequest { data: [query] };

        tracing::debug!(url = %url, "Submitting query");
        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Submit call failed");
            return Err(PredictError::SubmitStatus(status.as_u16()));
        }

        let body: CallResponse = response.json().await.map_err(classify_reqwest_error)?;

        // An empty id string counts as absent, like the widget's falsy check.
        let event_id = body
            .event_id
            .filter(|id| !id.is_empty())
            .ok_or(PredictError::MissingEventId)?;

        tracing::debug!(event_id = %event_id, "Received event id");
        Ok(event_id)
    }

    /// Fetches the finished result for an event id.
    async fn poll(&self, event_id: &str) -> std::result::Result<String, PredictError> {
        let url = format!("{}/call/predict/{}", self.config.base_url, event_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Poll call failed");
            return Err(PredictError::PollStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_reqwest_error)?;
        tracing::debug!(bytes = body.len(), "Poll body received");

        extract_payload(&body).ok_or(PredictError::NoValidData)
    }
}

/// Classifies a reqwest error into a PredictError.
fn classify_reqwest_error(e: reqwest::Error) -> PredictError {
    if e.is_decode() {
        PredictError::Parse(e.to_string())
    } else if e.is_timeout() {
        PredictError::Network(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        PredictError::Network(format!("Connection failed: {}", e))
    } else {
        PredictError::Network(e.to_string())
    }
}

/// Pulls the result text out of an event-stream body: first `data:` line,
/// JSON string-array payload, first element. Later `data:` lines, comments,
/// and retry directives are ignored.
fn extract_payload(body: &str) -> Option<String> {
    let payload = body
        .lines()
        .find_map(|line| line.strip_prefix("data:"))?
        .trim();
    let values: Vec<String> = serde_json::from_str(payload).ok()?;
    values.into_iter().next()
}

// === Wire Types ===

#[derive(Debug, Serialize)]
struct CallRequest<'a> {
    data: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    #[serde(default)]
    event_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_payload_takes_first_element() {
        let body = "data: [\"hello\", \"ignored\"]\n\n";
        assert_eq!(extract_payload(body), Some("hello".to_string()));
    }

    #[test]
    fn test_extract_payload_takes_first_data_line() {
        let body = "data: [\"first\"]\ndata: [\"second\"]\n";
        assert_eq!(extract_payload(body), Some("first".to_string()));
    }

    #[test]
    fn test_extract_payload_skips_event_lines() {
        let body = "event: complete\ndata: [\"done\"]\n\n";
        assert_eq!(extract_payload(body), Some("done".to_string()));
    }

    #[test]
    fn test_extract_payload_without_space_after_colon() {
        assert_eq!(extract_payload("data:[\"x\"]"), Some("x".to_string()));
    }

    #[test]
    fn test_extract_payload_missing_data_line() {
        assert_eq!(extract_payload("event: heartbeat\n"), None);
    }

    #[test]
    fn test_extract_payload_empty_array() {
        assert_eq!(extract_payload("data: []\n"), None);
    }

    #[test]
    fn test_extract_payload_invalid_json() {
        assert_eq!(extract_payload("data: not-json\n"), None);
    }

    #[test]
    fn test_extract_payload_non_string_array() {
        assert_eq!(extract_payload("data: [42]\n"), None);
    }

    #[test]
    fn test_extract_payload_empty_payload() {
        assert_eq!(extract_payload("data:\n"), None);
    }

    #[test]
    fn test_display_submit_status() {
        let e = PredictError::SubmitStatus(500);
        assert_eq!(e.to_string(), "HTTP error! status: 500");
        assert_eq!(
            e.user_message(),
            "Sorry, an error occurred: HTTP error! status: 500"
        );
    }

    #[test]
    fn test_display_poll_status() {
        let e = PredictError::PollStatus(502);
        assert_eq!(e.to_string(), "Error fetching result! status: 502");
        assert_eq!(
            e.user_message(),
            "Sorry, an error occurred: Error fetching result! status: 502"
        );
    }

    /// Presence-check failures are shown verbatim, without the apology
    /// prefix.
    #[test]
    fn test_sentinel_messages_have_no_prefix() {
        assert_eq!(
            PredictError::MissingEventId.user_message(),
            "No event ID received."
        );
        assert_eq!(
            PredictError::NoValidData.user_message(),
            "No valid data found in the final response."
        );
    }

    #[test]
    fn test_network_message_is_wrapped() {
        let e = PredictError::Network("Connection failed: refused".to_string());
        assert_eq!(
            e.user_message(),
            "Sorry, an error occurred: Connection failed: refused"
        );
    }

    #[test]
    fn test_base_url_falls_back_to_default() {
        let config = GradioConfig::resolve_base_url(None).unwrap();
        assert_eq!(config, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_prefers_config_value() {
        let config = GradioConfig::resolve_base_url(Some("https://example.com")).unwrap();
        assert_eq!(config, "https://example.com");
    }

    #[test]
    fn test_base_url_ignores_blank_config_value() {
        let config = GradioConfig::resolve_base_url(Some("   ")).unwrap();
        assert_eq!(config, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_rejects_malformed_config_value() {
        assert!(GradioConfig::resolve_base_url(Some("not a url")).is_err());
    }
}
