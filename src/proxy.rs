//! CORS relay catalog and attempt-order resolution
//!
//! Third-party endpoints frequently refuse cross-origin requests, so fetches
//! can be routed through a public CORS relay. This module enumerates the
//! built-in relay services and turns the user's proxy settings into the
//! ordered list of relays the fetcher should attempt.

use serde::{Deserialize, Serialize};

/// A relay service description with a `{url}` placeholder template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTemplate {
    /// Display name of the relay service
    pub name: String,
    /// Short description of the service
    pub description: String,
    /// URL template containing exactly one `{url}` placeholder
    pub template: String,
}

/// CORS relay configuration stored in the global settings record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    /// Index into the built-in relay list; -1 selects the custom template
    pub selected_proxy_index: i32,
    /// Custom relay URL template, `{url}` is replaced with the target URL
    pub custom_proxy_template: String,
    /// Whether relaying is enabled at all
    pub enabled: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            selected_proxy_index: 0,
            custom_proxy_template: "https://your-proxy.com/{url}".to_string(),
            enabled: true,
        }
    }
}

/// One entry in the resolved attempt order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAttempt {
    /// Relay label used for rate limiting and cache bookkeeping
    pub label: String,
    /// URL template for this relay
    template: String,
}

impl ProxyAttempt {
    /// Substitutes the `{url}` placeholder with the literal original URL
    ///
    /// The original URL is not percent-encoded; relay templates are written
    /// to accept raw concatenation.
    pub fn build_url(&self, original_url: &str) -> String {
        self.template.replace("{url}", original_url)
    }
}

/// Returns the built-in CORS relay services, in declaration order
pub fn builtin_templates() -> Vec<ProxyTemplate> {
    vec![
        ProxyTemplate {
            name: "All Origins".to_string(),
            description: "CORS relay supporting multiple response formats".to_string(),
            template: "https://api.allorigins.win/raw?url={url}".to_string(),
        },
        ProxyTemplate {
            name: "CodeTabs Proxy".to_string(),
            description: "API relay with CORS support".to_string(),
            template: "https://api.codetabs.com/v1/proxy?quest={url}".to_string(),
        },
        ProxyTemplate {
            name: "CF Workers".to_string(),
            description: "Personal Cloudflare Workers CORS relay".to_string(),
            template: "https://cors.bpbpbp.workers.dev/{url}".to_string(),
        },
        ProxyTemplate {
            name: "CORS Proxy IO".to_string(),
            description: "corsproxy.io public relay".to_string(),
            template: "https://corsproxy.io/?{url}".to_string(),
        },
    ]
}

/// Label used for the user-supplied custom relay template
pub const CUSTOM_PROXY_LABEL: &str = "custom";

/// Computes the ordered relay attempt list for the given settings
///
/// Position 1 is the configured choice: the built-in template at
/// `selected_proxy_index` when that index is in range, otherwise the custom
/// template. The remaining built-ins follow in declaration order, skipping
/// the one already placed first. Disabled settings yield an empty list and
/// the caller fetches directly.
pub fn resolve_order(templates: &[ProxyTemplate], settings: &ProxySettings) -> Vec<ProxyAttempt> {
    if !settings.enabled {
        return Vec::new();
    }

    let mut order = Vec::with_capacity(templates.len() + 1);
    let selected = settings.selected_proxy_index;
    let selected_builtin = usize::try_from(selected)
        .ok()
        .filter(|i| *i < templates.len());

    match selected_builtin {
        Some(i) => order.push(ProxyAttempt {
            label: templates[i].name.clone(),
            template: templates[i].template.clone(),
        }),
        None => order.push(ProxyAttempt {
            label: CUSTOM_PROXY_LABEL.to_string(),
            template: settings.custom_proxy_template.clone(),
        }),
    }

    for (i, t) in templates.iter().enumerate() {
        if Some(i) == selected_builtin {
            continue;
        }
        order.push(ProxyAttempt {
            label: t.name.clone(),
            template: t.template.clone(),
        });
    }

    order
}
