//! The master ticker that drives every mounted button.

use crate::config::ClockResolution;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// A single tick of the `SystemClock`.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Monotonic tick number, starting at 1.
    pub tick_count: u64,
    /// When the tick fired.
    pub timestamp: Instant,
}

/// A ticker that broadcasts a `TickEvent` at a fixed resolution until told
/// to shut down.
pub struct SystemClock {
    resolution: ClockResolution,
    tick_sender: broadcast::Sender<Arc<TickEvent>>,
}

impl SystemClock {
    pub fn new(
        resolution: ClockResolution,
        tick_sender: broadcast::Sender<Arc<TickEvent>>,
    ) -> Self {
        Self {
            resolution,
            tick_sender,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.resolution.tick_interval()
    }

    /// Ticks until `shutdown_rx` receives a message or its sender is dropped.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut interval = time::interval(self.tick_interval());
        // A stalled runtime should not replay a burst of stale ticks.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick_count = 0u64;
        info!("SystemClock ticking every {:?}.", self.tick_interval());
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                timestamp = interval.tick() => {
                    tick_count += 1;
                    self.tick_sender
                        .send(Arc::new(TickEvent { tick_count, timestamp }))
                        .ok();
                }
            }
        }
        debug!("SystemClock stopped after {} ticks.", tick_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_clock_ticks_until_shutdown() {
        let (tick_tx, mut tick_rx) = broadcast::channel(16);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let clock = SystemClock::new(ClockResolution::Low, tick_tx);
        assert_eq!(clock.tick_interval(), Duration::from_millis(100));
        let handle = tokio::spawn(clock.run(shutdown_rx));

        let first = tick_rx.recv().await.unwrap();
        let second = tick_rx.recv().await.unwrap();
        assert_eq!(first.tick_count, 1);
        assert_eq!(second.tick_count, 2);
        assert_eq!(second.timestamp - first.timestamp, Duration::from_millis(100));

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
