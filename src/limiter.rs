//! Per-relay request rate limiting
//!
//! Public CORS relays are free services; this limiter keeps one process from
//! hammering any single relay while cycling through fallback attempts. It is
//! advisory local throttling only and does nothing about other clients
//! hitting the same relay.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default cooldown window per relay
const DEFAULT_WINDOW: Duration = Duration::from_millis(2000);

/// Default number of requests allowed per window
const DEFAULT_CEILING: u32 = 3;

/// Tracks request velocity for one relay label
#[derive(Debug)]
struct RelayWindow {
    /// When the last admitted request went through
    last_request: Instant,
    /// Requests admitted since the window started
    count: u32,
}

/// Advisory per-relay request throttle
///
/// State is created lazily on first use of a relay label and lives for the
/// process lifetime. Construct one instance and share it by reference with
/// every fetcher; tests build fresh instances with a short window instead of
/// resetting shared state.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    ceiling: u32,
    state: Mutex<HashMap<String, RelayWindow>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates a limiter with the default window (2 s) and ceiling (3)
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW, DEFAULT_CEILING)
    }

    /// Creates a limiter with a custom window and ceiling
    ///
    /// Useful for tests that need the window to elapse quickly.
    pub fn with_window(window: Duration, ceiling: u32) -> Self {
        Self {
            window,
            ceiling,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Asks permission to send one request to the named relay
    ///
    /// The first call for an unseen label always succeeds and opens a window.
    /// Inside an active window the call succeeds while the running count is
    /// below the ceiling. Once the window has elapsed since the last admitted
    /// request the window restarts at count 1 unconditionally, so a call
    /// after expiry never fails even if the previous window was saturated.
    /// Refusals do not advance the recorded timestamp.
    pub fn try_acquire(&self, label: &str) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match state.get_mut(label) {
            None => {
                state.insert(
                    label.to_string(),
                    RelayWindow {
                        last_request: now,
                        count: 1,
                    },
                );
                true
            }
            Some(entry) => {
                if now.duration_since(entry.last_request) > self.window {
                    entry.last_request = now;
                    entry.count = 1;
                    true
                } else if entry.count < self.ceiling {
                    entry.count += 1;
                    entry.last_request = now;
                    true
                } else {
                    false
                }
            }
        }
    }
}
