//! Invasive-species verification via a remote text-generation API
//!
//! One prompt per call, one attempt, bounded by the transport timeout. Every
//! failure is folded into a [`VerificationOutcome`]; nothing here returns an
//! error to the caller.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::models::verdict::UNEXPECTED_RESPONSE_REASON;
use crate::models::{Severity, VerificationOutcome, VerificationVerdict};

const USER_AGENT: &str = concat!("PlantGuard/", env!("CARGO_PKG_VERSION"));

/// JSON pointer to the generated text inside the response envelope
const GENERATED_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// Transport-level failures
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("response body is not JSON: {0}")]
    Body(String),
}

/// Sends a prompt, returns the raw JSON envelope
#[async_trait]
pub trait VerifierTransport: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Value, TransportError>;
}

/// Connection settings for [`GeminiTransport`]
#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub api_key: String,
    pub model: String,
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub endpoint: String,
    pub timeout: Duration,
}

/// Google generative-language `generateContent` transport
///
/// Holds one pooled `reqwest::Client`, shared by concurrent requests.
pub struct GeminiTransport {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(settings: &VerifierSettings) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            settings.endpoint.trim_end_matches('/'),
            settings.model
        );

        Ok(Self {
            http_client,
            url,
            api_key: settings.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VerifierTransport for GeminiTransport {
    async fn generate(&self, prompt: &str) -> Result<Value, TransportError> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        // Errors are stripped of their URL: it carries the API key.
        let response = self
            .http_client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| match classify_reqwest_error(e) {
                TransportError::Network(msg) => TransportError::Body(msg),
                other => other,
            })
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.without_url().to_string())
    }
}

/// Verdict fields the remote model is asked to return
#[derive(Debug, Deserialize)]
struct VerdictPayload {
    is_invasive: bool,
    severity: String,
    reason: String,
}

/// Remote invasive-species checker
pub struct InvasiveVerifier {
    transport: Box<dyn VerifierTransport>,
}

impl InvasiveVerifier {
    pub fn new(transport: Box<dyn VerifierTransport>) -> Self {
        Self { transport }
    }

    /// Ask whether `name` is invasive in `location`
    ///
    /// `name` must be non-empty. An empty (or whitespace) `location` returns
    /// [`VerificationOutcome::NoLocation`] without touching the network.
    pub async fn verify(&self, name: &str, location: &str) -> VerificationOutcome {
        debug_assert!(!name.trim().is_empty(), "species name must not be empty");

        let location = location.trim();
        if location.is_empty() {
            return VerificationOutcome::NoLocation;
        }

        let prompt = build_prompt(name, location);
        tracing::debug!(species = name, location, "Requesting invasive verification");

        let envelope = match self.transport.generate(&prompt).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(species = name, location, error = %e, "Verification transport failed");
                return VerificationOutcome::TransportFailure(e.to_string());
            }
        };

        let outcome = interpret_envelope(&envelope);
        match &outcome {
            VerificationOutcome::Verified(verdict) => tracing::info!(
                species = name,
                location,
                is_invasive = verdict.is_invasive,
                severity = %verdict.severity,
                "Invasive verification complete"
            ),
            VerificationOutcome::ParseFailure(reason) => {
                tracing::warn!(species = name, location, reason = %reason, "Verification response unusable")
            }
            _ => {}
        }
        outcome
    }

    /// Release the transport and its connection pool
    pub fn close(self) {
        drop(self.transport);
        tracing::info!("Verification client closed");
    }
}

/// Prompt asking for exactly three unformatted fields
pub fn build_prompt(name: &str, location: &str) -> String {
    format!(
        "Is the plant '{name}' considered an invasive species in '{location}'? \
         Answer with a JSON object containing exactly these keys: \
         'is_invasive' (boolean), \
         'severity' (string, one of: High, Medium, Low, None), \
         'reason' (string, a concise explanation, in the language of the location if possible, otherwise English). \
         Do not wrap the answer in markdown or code fences."
    )
}

/// Pull the generated text out of the envelope and parse it
pub fn interpret_envelope(envelope: &Value) -> VerificationOutcome {
    let Some(text) = envelope
        .pointer(GENERATED_TEXT_POINTER)
        .and_then(Value::as_str)
    else {
        return VerificationOutcome::ParseFailure(UNEXPECTED_RESPONSE_REASON.to_string());
    };

    parse_verdict(text)
}

/// Parse generated text into a verdict after stripping code fences
///
/// All three fields are required; a missing field or an unrecognised
/// severity is a parse failure.
pub fn parse_verdict(text: &str) -> VerificationOutcome {
    let cleaned = strip_code_fence(text);

    let payload: VerdictPayload = match serde_json::from_str(cleaned) {
        Ok(payload) => payload,
        Err(e) => {
            return VerificationOutcome::ParseFailure(format!(
                "failed to parse verification payload: {}",
                e
            ))
        }
    };

    let Some(severity) = Severity::from_reported(&payload.severity) else {
        return VerificationOutcome::ParseFailure(format!(
            "failed to parse verification payload: unrecognised severity '{}'",
            payload.severity
        ));
    };

    VerificationOutcome::Verified(VerificationVerdict {
        is_invasive: payload.is_invasive,
        severity,
        reason: payload.reason,
    })
}

/// Remove a leading "```json" or "```" marker and a trailing "```" marker
///
/// Each marker is removed independently when present. Surrounding
/// whitespace is trimmed. Nothing else is touched.
pub fn strip_code_fence(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    const PAYLOAD: &str =
        r#"{"is_invasive": true, "severity": "High", "reason": "Clogs waterways"}"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json {}"), "{}");
        assert_eq!(strip_code_fence("{} ```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn test_strip_code_fence_leaves_inner_text_alone() {
        assert_eq!(strip_code_fence("{\"a\": \"```\"}"), "{\"a\": \"```\"}");
    }

    #[test]
    fn test_fenced_and_plain_payloads_agree() {
        let fenced = format!("```json\n{}\n```", PAYLOAD);
        assert_eq!(parse_verdict(&fenced), parse_verdict(PAYLOAD));
        assert!(matches!(parse_verdict(PAYLOAD), VerificationOutcome::Verified(_)));
    }

    #[test]
    fn test_interpret_envelope_success() {
        match interpret_envelope(&envelope(PAYLOAD)) {
            VerificationOutcome::Verified(verdict) => {
                assert!(verdict.is_invasive);
                assert_eq!(verdict.severity, Severity::High);
                assert_eq!(verdict.reason, "Clogs waterways");
            }
            other => panic!("expected verified outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_nested_text_is_parse_failure() {
        let outcome = interpret_envelope(&json!({ "candidates": [] }));
        assert_eq!(
            outcome,
            VerificationOutcome::ParseFailure(UNEXPECTED_RESPONSE_REASON.to_string())
        );
        assert_eq!(outcome.verdict().severity, Severity::Error);
    }

    #[test]
    fn test_missing_field_is_parse_failure() {
        let outcome = parse_verdict(r#"{"is_invasive": false, "reason": "native"}"#);
        assert!(matches!(outcome, VerificationOutcome::ParseFailure(_)));
        assert!(outcome.verdict().reason.contains("severity"));
    }

    #[test]
    fn test_unknown_severity_is_parse_failure() {
        let outcome =
            parse_verdict(r#"{"is_invasive": true, "severity": "Extreme", "reason": "x"}"#);
        assert!(matches!(outcome, VerificationOutcome::ParseFailure(_)));
    }

    #[test]
    fn test_prose_is_parse_failure() {
        let outcome = parse_verdict("Yes, it is quite invasive there.");
        assert!(matches!(outcome, VerificationOutcome::ParseFailure(_)));
    }

    #[test]
    fn test_prompt_names_species_location_and_fields() {
        let prompt = build_prompt("Eichhornia crassipes", "Spain");
        assert!(prompt.contains("'Eichhornia crassipes'"));
        assert!(prompt.contains("'Spain'"));
        for key in ["is_invasive", "severity", "reason"] {
            assert!(prompt.contains(key));
        }
    }

    #[test]
    fn test_transport_url_shape() {
        let transport = GeminiTransport::new(&VerifierSettings {
            api_key: "secret".to_string(),
            model: "gemini-2.0-flash".to_string(),
            endpoint: "https://example.test/v1beta/".to_string(),
            timeout: Duration::from_secs(30),
        })
        .unwrap();
        assert_eq!(
            transport.url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert!(!transport.url().contains("secret"));
    }
}
