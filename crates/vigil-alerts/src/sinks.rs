//! Alert sinks for event delivery.
//!
//! This module provides the [`AlertSink`] trait and implementations for
//! delivering error events to external channels. Sinks are registered once
//! at startup into a fixed list and never added or removed at runtime.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{AlertError, Result};
use crate::event::ErrorEvent;

/// Result of one delivery attempt.
#[derive(Debug, Clone)]
pub struct SinkOutcome {
    /// Whether the event was delivered successfully.
    pub success: bool,
    /// The sink that processed this delivery.
    pub sink: String,
    /// Optional message or error description.
    pub message: Option<String>,
    /// Response status code (if applicable).
    pub status_code: Option<u16>,
}

impl SinkOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn success(sink: impl Into<String>) -> Self {
        Self {
            success: true,
            sink: sink.into(),
            message: None,
            status_code: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failure(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            sink: sink.into(),
            message: Some(message.into()),
            status_code: None,
        }
    }

    /// Sets the status code.
    #[must_use]
    pub const fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }
}

/// Trait for alert sinks.
///
/// A sink accepts one error event, attempts delivery, and reports the
/// outcome. Delivery failure must never propagate as a process-level fault;
/// the dispatcher logs it and moves on.
#[async_trait]
pub trait AlertSink: Send + Sync + fmt::Debug {
    /// Returns the name of this sink.
    fn name(&self) -> &str;

    /// Delivers one event through this sink.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Delivery` if the transport fails outright; a
    /// rejected delivery may also surface as an unsuccessful [`SinkOutcome`].
    async fn send(&self, event: &ErrorEvent) -> Result<SinkOutcome>;

    /// Returns true if this sink is enabled.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Configuration for a webhook sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSinkConfig {
    /// The name of this sink.
    pub name: String,
    /// The URL to POST events to.
    pub url: String,
    /// Maximum number of sampled documents per payload.
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
    /// Timeout in seconds for HTTP requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether this sink is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// HTTP headers to include with requests.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

const fn default_max_documents() -> usize {
    10
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_enabled() -> bool {
    true
}

impl WebhookSinkConfig {
    /// Creates a new webhook sink configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::InvalidSink` if the URL is empty.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(AlertError::InvalidSink {
                reason: "webhook URL cannot be empty".to_string(),
            });
        }

        Ok(Self {
            name: name.into(),
            url,
            headers: HashMap::new(),
            max_documents: default_max_documents(),
            timeout_secs: default_timeout_secs(),
            enabled: true,
        })
    }

    /// Adds a header to the configuration.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the maximum sampled documents per payload.
    #[must_use]
    pub const fn with_max_documents(mut self, max: usize) -> Self {
        self.max_documents = max;
        self
    }

    /// Sets whether the sink is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A webhook alert sink.
///
/// Renders a human-readable summary plus the structured event and delivers
/// it as a JSON POST to a fixed external channel (chat webhook, pager
/// receiver, and the like).
#[derive(Debug, Clone)]
pub struct WebhookSink {
    config: WebhookSinkConfig,
    http: reqwest::Client,
}

impl WebhookSink {
    /// Creates a webhook sink from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::Delivery` if the HTTP client cannot be built.
    pub fn new(config: WebhookSinkConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, http })
    }

    /// Returns the webhook URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Builds the payload for one event.
    #[must_use]
    pub fn format_payload(&self, event: &ErrorEvent) -> WebhookEventPayload {
        WebhookEventPayload::new(event, self.config.max_documents)
    }
}

#[async_trait]
impl AlertSink for WebhookSink {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn send(&self, event: &ErrorEvent) -> Result<SinkOutcome> {
        if !self.is_enabled() {
            debug!(sink = %self.name(), "sink is disabled, skipping");
            return Ok(SinkOutcome::success(self.name())
                .with_message("sink disabled, delivery skipped"));
        }

        let payload = self.format_payload(event);

        let mut request = self.http.post(&self.config.url).json(&payload);
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            info!(
                sink = %self.name(),
                signature = %event.signature,
                total = event.total_matches,
                "delivered alert"
            );
            Ok(SinkOutcome::success(self.name()).with_status_code(status.as_u16()))
        } else {
            Ok(SinkOutcome::failure(self.name(), format!("status {status}"))
                .with_status_code(status.as_u16()))
        }
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// The JSON payload posted by [`WebhookSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventPayload {
    /// Human-readable one-line summary.
    pub text: String,
    /// The signature that matched.
    pub signature: String,
    /// The store's total match count.
    pub total_matches: u64,
    /// Identifiers of the matched documents.
    pub matched_ids: Vec<String>,
    /// A sampled subset of the matched documents.
    pub sample: Vec<serde_json::Value>,
}

impl WebhookEventPayload {
    /// Builds a payload, sampling at most `max_documents` documents.
    #[must_use]
    pub fn new(event: &ErrorEvent, max_documents: usize) -> Self {
        let sample = event
            .documents
            .iter()
            .take(max_documents)
            .map(|doc| serde_json::json!({ "id": doc.id, "fields": doc.fields }))
            .collect();

        Self {
            text: format!(
                "error signature {:?} matched {} time(s); ids: {}",
                event.signature,
                event.total_matches,
                event.matched_ids.join(", "),
            ),
            signature: event.signature.clone(),
            total_matches: event.total_matches,
            matched_ids: event.matched_ids.clone(),
            sample,
        }
    }
}

/// A sink that writes events to the process log.
#[derive(Debug, Clone)]
pub struct LogSink {
    name: String,
    enabled: bool,
}

impl LogSink {
    /// Creates a new log sink.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }

    /// Sets whether the sink is enabled.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new("log")
    }
}

#[async_trait]
impl AlertSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, event: &ErrorEvent) -> Result<SinkOutcome> {
        if !self.is_enabled() {
            return Ok(SinkOutcome::success(self.name()).with_message("sink disabled"));
        }

        error!(
            signature = %event.signature,
            total = event.total_matches,
            ids = ?event.matched_ids,
            "ERROR DETECTED"
        );

        Ok(SinkOutcome::success(self.name()).with_message("logged to tracing"))
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
