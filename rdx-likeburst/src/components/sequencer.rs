//! The tap-triggered forward sequence of a like button.
//!
//! A tap on an idle button starts the sequence and records the tap time.
//! Every later step is due at a fixed offset from that tap and is applied by
//! `advance`, in schedule order, once the injected clock reaches it. Time is
//! always passed in as a `Duration` since an arbitrary epoch, so the same
//! sequencer runs under the engine's tokio clock or a virtual test clock.

use super::motion::MotionProfile;
use super::phase::{AnimationPhaseState, Phase};
use std::time::Duration;

/// One step of the forward sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceStep {
    /// Like and collapse the icon. Runs synchronously on the tap.
    Start,
    /// Begin expanding the background disc.
    ExpandBackground,
    /// Open the ring cutout and fire the particle burst.
    RevealRing,
    /// Fade the ring and particle layer.
    EndSequence,
    /// Make the next tap reset the button.
    ArmReset,
}

impl SequenceStep {
    /// The phase this step moves the button into.
    pub fn phase(self) -> Phase {
        match self {
            SequenceStep::Start => Phase::Started,
            SequenceStep::ExpandBackground => Phase::BackgroundExpanded,
            SequenceStep::RevealRing => Phase::RingRevealed,
            SequenceStep::EndSequence => Phase::SequenceEnded,
            SequenceStep::ArmReset => Phase::ReadyToReset,
        }
    }

    /// Motion profiles for the properties this step animates.
    ///
    /// `RevealRing` drives two layers at once: the ring cutout and the burst.
    pub fn motions(self) -> &'static [MotionProfile] {
        match self {
            SequenceStep::Start => &[MotionProfile::ICON],
            SequenceStep::ExpandBackground => &[MotionProfile::BACKGROUND],
            SequenceStep::RevealRing => &[MotionProfile::ICON, MotionProfile::FIREWORK],
            SequenceStep::EndSequence => &[MotionProfile::FADE],
            SequenceStep::ArmReset => &[],
        }
    }
}

/// A step together with its offset from the starting tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub step: SequenceStep,
    pub offset: Duration,
}

/// The forward schedule: 0.25 s, then 0.30 s, 0.40 s and 0.30 s apart.
pub const FORWARD_SCHEDULE: [ScheduledStep; 5] = [
    ScheduledStep {
        step: SequenceStep::Start,
        offset: Duration::ZERO,
    },
    ScheduledStep {
        step: SequenceStep::ExpandBackground,
        offset: Duration::from_millis(250),
    },
    ScheduledStep {
        step: SequenceStep::RevealRing,
        offset: Duration::from_millis(550),
    },
    ScheduledStep {
        step: SequenceStep::EndSequence,
        offset: Duration::from_millis(950),
    },
    ScheduledStep {
        step: SequenceStep::ArmReset,
        offset: Duration::from_millis(1250),
    },
];

/// What a recognised tap gesture did to the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A raw tap was counted but the gesture is not complete yet.
    Pending,
    /// An idle button began its forward sequence.
    Started,
    /// A sequence is in flight; the tap was discarded.
    Ignored,
    /// A completed sequence was reset and the button un-liked.
    Reset,
}

/// A step applied by `AnimationSequencer::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredStep {
    pub step: SequenceStep,
    /// When the step was due.
    pub due: Duration,
    /// The clock value passed to `advance` that applied it.
    pub fired_at: Duration,
}

/// Drives one `AnimationPhaseState` through `FORWARD_SCHEDULE`.
#[derive(Debug, Clone)]
pub struct AnimationSequencer {
    state: AnimationPhaseState,
    tapped_at: Option<Duration>,
    cursor: usize,
}

impl AnimationSequencer {
    /// Creates an idle sequencer for a freshly mounted button.
    pub fn new(liked: bool) -> Self {
        Self {
            state: AnimationPhaseState::new(liked),
            tapped_at: None,
            cursor: FORWARD_SCHEDULE.len(),
        }
    }

    pub fn state(&self) -> &AnimationPhaseState {
        &self.state
    }

    /// Handles a recognised tap gesture at time `now`.
    pub fn on_tap(&mut self, now: Duration) -> TapOutcome {
        if self.state.ready_to_reset() {
            self.state.reset();
            self.tapped_at = None;
            self.cursor = FORWARD_SCHEDULE.len();
            return TapOutcome::Reset;
        }
        if self.state.started() {
            return TapOutcome::Ignored;
        }
        self.state.advance_to(SequenceStep::Start.phase());
        self.tapped_at = Some(now);
        self.cursor = 1;
        TapOutcome::Started
    }

    /// Applies every pending step that is due at `now`, in schedule order.
    pub fn advance(&mut self, now: Duration) -> Vec<FiredStep> {
        let mut fired = Vec::new();
        let Some(tapped_at) = self.tapped_at else {
            return fired;
        };
        while let Some(scheduled) = FORWARD_SCHEDULE.get(self.cursor) {
            let due = tapped_at + scheduled.offset;
            if due > now {
                break;
            }
            if self.state.advance_to(scheduled.step.phase()) {
                fired.push(FiredStep {
                    step: scheduled.step,
                    due,
                    fired_at: now,
                });
            }
            self.cursor += 1;
        }
        fired
    }

    /// When the next pending step is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        let tapped_at = self.tapped_at?;
        FORWARD_SCHEDULE
            .get(self.cursor)
            .map(|scheduled| tapped_at + scheduled.offset)
    }

    /// Number of steps still waiting to fire.
    pub fn pending(&self) -> usize {
        if self.tapped_at.is_some() {
            FORWARD_SCHEDULE.len() - self.cursor
        } else {
            0
        }
    }

    /// Drops every pending step. Returns how many were dropped.
    ///
    /// Used on unmount so no step lands on a discarded button.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending();
        self.cursor = FORWARD_SCHEDULE.len();
        dropped
    }

    /// Writes the externally bound `liked` value.
    pub fn set_liked(&mut self, liked: bool) {
        self.state.set_liked(liked);
    }
}
