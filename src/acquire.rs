//! Acquisition facade: the single operation the dashboard calls per card
//!
//! Composes the resilient fetcher, the path extractor, and the display
//! formatter. `Acquirer::acquire` never panics and never returns an error
//! type: failures are folded into the returned `ViewerData` as a
//! human-readable message, the way the card layer expects them.

use futures::future::join_all;
use thiserror::Error;
use tracing::debug;

use crate::fetch::{FetchError, Fetcher};
use crate::format::format_display;
use crate::model::{ViewerConfig, ViewerData};
use crate::path::{extract_all, value_to_display, PathError};
use crate::proxy::ProxySettings;

/// Hint appended to errors that look like a cross-origin rejection
const CORS_HINT: &str = "(cross-origin request blocked; route the URL through a CORS relay in the proxy settings)";

/// Required viewer fields missing from a card configuration
///
/// Detected before any network attempt is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Viewer name is missing")]
    MissingName,

    #[error("Viewer data URL is missing")]
    MissingDataUrl,

    #[error("Viewer JSON path is missing")]
    MissingJsonPath,
}

/// Errors folded into `ViewerData.error` by the facade
#[derive(Debug, Error)]
enum AcquireError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Checks that the required viewer fields are present
pub fn validate_config(config: &ViewerConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::MissingName);
    }
    if config.data_url.is_empty() {
        return Err(ConfigError::MissingDataUrl);
    }
    if config.json_path.is_empty() {
        return Err(ConfigError::MissingJsonPath);
    }
    Ok(())
}

/// Appends the cross-origin hint to CORS-flavored error messages
fn annotate_cors(message: String) -> String {
    if message.contains("CORS") {
        format!("{} {}", message, CORS_HINT)
    } else {
        message
    }
}

/// Runs acquisition cycles for viewer cards against shared fetch state
pub struct Acquirer {
    fetcher: Fetcher,
    settings: ProxySettings,
}

impl Acquirer {
    /// Creates an acquirer with a default fetcher
    pub fn new(settings: ProxySettings) -> Self {
        Self::with_fetcher(settings, Fetcher::new())
    }

    /// Creates an acquirer around a custom fetcher
    pub fn with_fetcher(settings: ProxySettings, fetcher: Fetcher) -> Self {
        Self { fetcher, settings }
    }

    /// Runs one acquisition cycle for a card
    ///
    /// Validates the configuration, fetches the document, extracts the
    /// configured path values, and stringifies them for display. Any failure
    /// lands in `ViewerData.error` with `value` unset.
    pub async fn acquire(&self, config: &ViewerConfig) -> ViewerData {
        if let Err(err) = validate_config(config) {
            return ViewerData::failure(&config.id, err.to_string());
        }

        match self.try_acquire(config).await {
            Ok(data) => data,
            Err(err) => {
                debug!(viewer = %config.id, error = %err, "acquisition failed");
                ViewerData::failure(&config.id, annotate_cors(err.to_string()))
            }
        }
    }

    async fn try_acquire(&self, config: &ViewerConfig) -> Result<ViewerData, AcquireError> {
        let outcome = self.fetcher.acquire(&config.data_url, &self.settings).await?;
        let values = extract_all(&outcome.data, &config.json_path)?;
        let strings = values.iter().map(value_to_display).collect();
        Ok(ViewerData::success(&config.id, strings, outcome.data))
    }

    /// Runs acquisition cycles for several cards, interleaved at the I/O
    /// suspension points, and returns the results in input order
    pub async fn acquire_all(&self, configs: &[ViewerConfig]) -> Vec<ViewerData> {
        join_all(configs.iter().map(|c| self.acquire(c))).await
    }
}

/// Renders the display string for a card's current data
///
/// Failed acquisitions (no value set) render the "no data" sentinel.
pub fn display_value(data: &ViewerData, template: &str) -> String {
    format_display(data.value.as_deref(), template)
}
