//! Tokio tasks owned by the controller.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

use super::controller::RoundEvent;

/// A spawned task that feeds events to the controller. Aborted on drop.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: AbortHandle,
}

impl ScheduledTask {
    /// Send `event` once after `delay`.
    pub fn once(
        delay: Duration,
        events: mpsc::UnboundedSender<RoundEvent>,
        event: RoundEvent,
    ) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
        Self {
            handle: task.abort_handle(),
        }
    }

    /// Send an event built by `make` every `period`, starting immediately.
    /// Stops by itself once the receiver is gone.
    pub fn repeating<F>(period: Duration, events: mpsc::UnboundedSender<RoundEvent>, mut make: F) -> Self
    where
        F: FnMut() -> RoundEvent + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if events.send(make()).is_err() {
                    break;
                }
            }
        });
        Self {
            handle: task.abort_handle(),
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
