//! OneView - fetch a value out of a remote JSON endpoint and display it
//!
//! One-shot mode prints the formatted display string for a single viewer
//! configuration; watch mode keeps refreshing on an interval and streams
//! updates until Ctrl-C. Each result is also persisted as the card's data
//! record so the last known value survives restarts.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use oneview::acquire::{display_value, Acquirer};
use oneview::cli::Cli;
use oneview::model::{ViewerConfig, ViewerData};
use oneview::refresh::{RefreshConfig, RefreshHandle, RefreshMessage};
use oneview::settings::SettingsStore;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = SettingsStore::new();
    let mut settings = store
        .as_ref()
        .map(|s| s.load_settings())
        .unwrap_or_default();
    cli.apply_overrides(&mut settings);

    let config = cli.viewer_config();
    let acquirer = Acquirer::new(settings.cors_proxy);

    match cli.watch {
        None => run_once(&acquirer, &config, store.as_ref()).await,
        Some(secs) => {
            watch(acquirer, config, Duration::from_secs(secs.max(1)), store).await;
            ExitCode::SUCCESS
        }
    }
}

/// Acquires once and prints the formatted value or the error
async fn run_once(
    acquirer: &Acquirer,
    config: &ViewerConfig,
    store: Option<&SettingsStore>,
) -> ExitCode {
    let data = acquirer.acquire(config).await;
    report(&data, config, store);
    if data.value.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Streams periodic refresh updates until Ctrl-C
async fn watch(
    acquirer: Acquirer,
    config: ViewerConfig,
    interval: Duration,
    store: Option<SettingsStore>,
) {
    let mut handle = RefreshHandle::spawn(
        Arc::new(acquirer),
        vec![config.clone()],
        RefreshConfig {
            interval,
            enabled: true,
        },
    );

    loop {
        tokio::select! {
            msg = handle.receiver.recv() => match msg {
                Some(RefreshMessage::ViewerUpdated(data)) => {
                    report(&data, &config, store.as_ref());
                }
                Some(RefreshMessage::ViewerSkipped { id, reason }) => {
                    eprintln!("{}: {}", id, reason);
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
}

/// Prints one acquisition result and persists it as the card's data record
fn report(data: &ViewerData, config: &ViewerConfig, store: Option<&SettingsStore>) {
    if let Some(store) = store {
        if let Err(err) = store.save_viewer_data(data) {
            warn!(viewer = %data.id, error = %err, "failed to persist viewer data");
        }
    }

    if data.value.is_some() {
        println!("{}", display_value(data, &config.display_format));
    } else {
        eprintln!(
            "{}: {}",
            config.name,
            data.truncated_error()
                .unwrap_or_else(|| "unknown error".to_string())
        );
    }
}
