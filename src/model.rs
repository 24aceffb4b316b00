//! Core data models for OneView
//!
//! This module contains the types exchanged with the dashboard layer: the
//! per-card viewer configuration, the acquisition result handed back to the
//! card, and the global settings record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::proxy::ProxySettings;

/// Maximum length of an error message shown on a card before truncation
pub const ERROR_DISPLAY_LIMIT: usize = 50;

/// Configuration for a single viewer card
///
/// Field names serialize as camelCase to stay compatible with the persisted
/// dashboard record format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Unique identifier for the card
    pub id: String,
    /// Human-readable card title
    pub name: String,
    /// Remote JSON endpoint to pull from
    pub data_url: String,
    /// One or more comma-separated path queries, each rooted at `$`
    pub json_path: String,
    /// Display template containing `{value}` or `{valueN}` placeholders
    pub display_format: String,
}

/// Result of one acquisition cycle for a card
///
/// Exactly one of `value` and `error` is set: `value` is `None` iff the
/// fetch or extraction failed, and `error` carries the reason in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerData {
    /// Identifier of the card this data belongs to
    pub id: String,
    /// Extracted values in path order, already stringified for display
    pub value: Option<Vec<String>>,
    /// When this data was produced, as a Unix millisecond timestamp
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
    /// Human-readable failure reason, set exactly when `value` is `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The full fetched document, kept for raw-data inspection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
}

impl ViewerData {
    /// Builds a successful result for a card
    pub fn success(id: impl Into<String>, values: Vec<String>, raw: Value) -> Self {
        Self {
            id: id.into(),
            value: Some(values),
            last_updated: Utc::now(),
            error: None,
            raw_data: Some(raw),
        }
    }

    /// Builds a failed result carrying an error message
    pub fn failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: None,
            last_updated: Utc::now(),
            error: Some(error.into()),
            raw_data: None,
        }
    }

    /// Returns the error message truncated for card display
    ///
    /// Messages longer than [`ERROR_DISPLAY_LIMIT`] characters are cut and
    /// suffixed with an ellipsis.
    pub fn truncated_error(&self) -> Option<String> {
        self.error.as_ref().map(|msg| {
            if msg.chars().count() > ERROR_DISPLAY_LIMIT {
                let cut: String = msg.chars().take(ERROR_DISPLAY_LIMIT).collect();
                format!("{}...", cut)
            } else {
                msg.clone()
            }
        })
    }
}

/// Global settings record persisted for the whole dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// CORS relay configuration shared by every card
    pub cors_proxy: ProxySettings,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            cors_proxy: ProxySettings::default(),
        }
    }
}
