//! Defines all public event types broadcast by the Likeburst engine.
//!
//! The presentation layer subscribes to these streams instead of polling:
//! `PhaseEvent` tells it which flag flipped and with which motion,
//! `LikeEvent` tells the feed to mirror `liked` into its posts.

use crate::common::ButtonId;
use crate::components::motion::MotionProfile;
use crate::components::phase::Phase;
use crate::components::sequencer::{SequenceStep, TapOutcome};
use std::time::Duration;
use tokio::time::Instant;

/// Events related to the lifecycle of the engine and its buttons.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the engine's `run` loop begins.
    EngineStarted { timestamp: Instant },
    /// Fired once when the engine's `run` loop is about to exit.
    EngineShutdown,
    /// Fired when a button is mounted.
    ButtonMounted { id: ButtonId },
    /// Fired when a button is unmounted, with the number of steps that were
    /// still pending and have been cancelled.
    ButtonUnmounted { id: ButtonId, cancelled_steps: usize },
}

/// Fired for every raw tap delivered to a mounted button.
#[derive(Debug, Clone, Copy)]
pub struct TapEvent {
    pub button: ButtonId,
    pub outcome: TapOutcome,
    /// Engine time of the tap.
    pub at: Duration,
}

/// Fired each time a sequence step moves a button into a new phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseEvent {
    pub button: ButtonId,
    pub step: SequenceStep,
    pub phase: Phase,
    /// Motion profiles for the properties this step animates.
    pub motions: &'static [MotionProfile],
    /// Engine time the step was due.
    pub due: Duration,
    /// Engine time the step was applied.
    pub fired_at: Duration,
}

/// Fired whenever a button's `liked` value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeEvent {
    pub button: ButtonId,
    pub liked: bool,
}
