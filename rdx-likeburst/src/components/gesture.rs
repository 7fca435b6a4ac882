//! Multi-tap gesture recognition in front of the sequencer.

use std::time::Duration;

/// Counts raw taps and reports when they add up to one gesture.
///
/// A gesture needs `taps_required` taps, each arriving no later than
/// `window` after the previous one. A slower tap starts a new count.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    taps_required: u32,
    window: Duration,
    count: u32,
    last_tap: Option<Duration>,
}

impl TapRecognizer {
    pub fn new(taps_required: u32, window: Duration) -> Self {
        Self {
            taps_required: taps_required.max(1),
            window,
            count: 0,
            last_tap: None,
        }
    }

    pub fn taps_required(&self) -> u32 {
        self.taps_required
    }

    /// Registers a raw tap at `now`. Returns `true` if it completes a gesture.
    pub fn register(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_tap {
            if now.saturating_sub(last) > self.window {
                self.count = 0;
            }
        }
        self.count += 1;
        self.last_tap = Some(now);
        if self.count >= self.taps_required {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Forgets any partially counted gesture.
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_tap = None;
    }
}
