//! Background refresh system for viewer cards
//!
//! Drives periodic acquisition cycles for a set of cards and a "refresh
//! all" broadcast, communicating results back to the caller over a tokio
//! channel. Each cycle acquires every healthy card; a card that fails
//! configuration validation is reported once and suppressed from later
//! cycles for the lifetime of the handle.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::acquire::{validate_config, Acquirer};
use crate::model::{ViewerConfig, ViewerData};

/// Messages sent from the background refresh task to the caller
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A refresh cycle is starting
    RefreshStarted,
    /// A card finished its acquisition cycle
    ViewerUpdated(ViewerData),
    /// A card failed configuration validation and is suppressed from now on
    ViewerSkipped { id: String, reason: String },
    /// The refresh cycle finished
    RefreshCompleted,
}

/// Configuration for the refresh schedule
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between automatic refresh cycles
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Triggers an immediate refresh-all cycle
    refresh_tx: mpsc::Sender<()>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the background refresh task for the given cards
    ///
    /// The first cycle runs immediately and serves as the initial load;
    /// later cycles fire unconditionally every `config.interval`, regardless
    /// of prior success or failure. With `enabled = false` no task is
    /// spawned and the channel stays silent.
    pub fn spawn(
        acquirer: Arc<Acquirer>,
        viewers: Vec<ViewerConfig>,
        config: RefreshConfig,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                let mut broken: HashSet<String> = HashSet::new();

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            run_cycle(&acquirer, &viewers, &mut broken, &msg_tx).await;
                        }
                        Some(_) = refresh_rx.recv() => {
                            run_cycle(&acquirer, &viewers, &mut broken, &msg_tx).await;
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            refresh_tx,
            shutdown_tx,
        }
    }

    /// Requests an immediate refresh of every card
    pub async fn request_refresh(&self) {
        let _ = self.refresh_tx.send(()).await;
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Runs one full refresh cycle and reports the results
async fn run_cycle(
    acquirer: &Acquirer,
    viewers: &[ViewerConfig],
    broken: &mut HashSet<String>,
    tx: &mpsc::Sender<RefreshMessage>,
) {
    let _ = tx.send(RefreshMessage::RefreshStarted).await;

    let mut healthy = Vec::with_capacity(viewers.len());
    for viewer in viewers {
        if broken.contains(&viewer.id) {
            continue;
        }
        match validate_config(viewer) {
            Ok(()) => healthy.push(viewer.clone()),
            Err(err) => {
                broken.insert(viewer.id.clone());
                let _ = tx
                    .send(RefreshMessage::ViewerSkipped {
                        id: viewer.id.clone(),
                        reason: err.to_string(),
                    })
                    .await;
            }
        }
    }

    for data in acquirer.acquire_all(&healthy).await {
        let _ = tx.send(RefreshMessage::ViewerUpdated(data)).await;
    }

    let _ = tx.send(RefreshMessage::RefreshCompleted).await;
}

/// Checks for pending refresh messages without blocking
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
