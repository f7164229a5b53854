//! Periodic backend health probe.
//!
//! [`HealthMonitor`] owns the popup's single repeating timer.  It probes
//! `/health` immediately, then once per interval, and posts each result to
//! the UI loop as [`Action::HealthChecked`].  Dropping the monitor stops
//! the timer.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use webagent_sdk::BackendClient;

use crate::tui::Action;

pub struct HealthMonitor {
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    /// Start probing.  The loop also ends on its own once the receiving
    /// side of `tx` is gone.
    pub fn spawn(client: BackendClient, period: Duration, tx: UnboundedSender<Action>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let status = client.check_connection().await;
                debug!(%status, "health probe");
                if tx.send(Action::HealthChecked(status)).is_err() {
                    break;
                }
            }
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
