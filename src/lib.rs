//! OneView data engine
//!
//! The data-acquisition pipeline behind a dashboard of JSON viewer cards:
//! resilient fetching through CORS relays with response caching and per-relay
//! rate limiting, path-based value extraction from arbitrary JSON documents,
//! and placeholder-template display formatting.

pub mod acquire;
pub mod cache;
pub mod cli;
pub mod fetch;
pub mod format;
pub mod limiter;
pub mod model;
pub mod path;
pub mod proxy;
pub mod refresh;
pub mod settings;
