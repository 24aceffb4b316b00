//! Command-line interface parsing for OneView
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a viewer configuration plus overrides on the persisted proxy
//! settings.

use clap::Parser;

use crate::model::{GlobalSettings, ViewerConfig};

/// OneView - pull a value out of a remote JSON endpoint and format it
#[derive(Parser, Debug)]
#[command(name = "oneview")]
#[command(about = "Fetch a remote JSON document, extract values by path, and format them")]
#[command(version)]
pub struct Cli {
    /// Remote JSON endpoint to pull from
    #[arg(long)]
    pub url: String,

    /// One or more comma-separated path queries rooted at '$'
    ///
    /// Examples:
    ///   oneview --url URL --path '$.price'
    ///   oneview --url URL --path '$.bid,$.ask' --format '{value1}/{value2}'
    #[arg(long, default_value = "$")]
    pub path: String,

    /// Display template with {value} or {valueN} placeholders
    #[arg(long, default_value = "{value}")]
    pub format: String,

    /// Viewer name used in error output
    #[arg(long, default_value = "cli viewer")]
    pub name: String,

    /// Fetch directly instead of routing through a CORS relay
    #[arg(long)]
    pub no_proxy: bool,

    /// Relay index override (-1 selects the custom template)
    #[arg(long, value_name = "INDEX", allow_negative_numbers = true)]
    pub proxy: Option<i32>,

    /// Refresh every SECS seconds and stream updates until Ctrl-C
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,
}

impl Cli {
    /// Builds the one-shot viewer configuration from the arguments
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            id: "cli".to_string(),
            name: self.name.clone(),
            data_url: self.url.clone(),
            json_path: self.path.clone(),
            display_format: self.format.clone(),
        }
    }

    /// Applies CLI proxy overrides on top of the persisted settings
    pub fn apply_overrides(&self, settings: &mut GlobalSettings) {
        if self.no_proxy {
            settings.cors_proxy.enabled = false;
        }
        if let Some(index) = self.proxy {
            settings.cors_proxy.selected_proxy_index = index;
            settings.cors_proxy.enabled = true;
        }
    }
}
