//! Background language-list refresh
//!
//! Periodically reloads the supported-language catalog so page renders never
//! trigger that request themselves. The catalog logs each outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::DigiFacts;
use crate::config::RefreshSettings;
use crate::data::FactSource;

/// Configuration for the refresh interval
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between reloads
    pub interval: Duration,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::from(&RefreshSettings::default())
    }
}

impl From<&RefreshSettings> for RefreshConfig {
    fn from(settings: &RefreshSettings) -> Self {
        Self {
            interval: Duration::from_secs(settings.interval_secs),
            enabled: settings.enabled,
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Signals the task to stop
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Spawns the refresh task if `config.enabled` is set
    ///
    /// The first reload happens one interval after spawning; callers that
    /// need the list immediately should call `DigiFacts::prefetch`.
    pub fn spawn<S>(app: Arc<DigiFacts<S>>, config: RefreshConfig) -> Self
    where
        S: FactSource + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = if config.enabled && !config.interval.is_zero() {
            Some(tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            // Failures keep the previous list and are retried next tick.
                            let _ = app.catalog().refresh().await;
                        }
                        _ = shutdown_rx.recv() => {
                            debug!("Language refresh task stopping");
                            break;
                        }
                    }
                }
            }))
        } else {
            None
        };

        Self { shutdown_tx, task }
    }

    /// Stops the background task and waits for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Some(task) = self.task {
            let _ = task.await;
        }
    }
}
