//! # Likeburst
//!
//! A tap-driven, phased animation sequencer for an animated like button.
//!
//! Likeburst owns the *timeline* of the effect, not its pixels. A tap on an
//! idle button starts a fixed forward sequence of phase flags; a renderer
//! reads the flags (or the `VisualState` derived from them) and animates
//! icon, background disc, ring cutout and particle burst accordingly.
//!
//! ## Core Concepts
//!
//! - **Phase flags**: `AnimationPhaseState` holds seven booleans that can only
//!   be set in sequence order and only be cleared all at once.
//! - **Forward schedule**: `FORWARD_SCHEDULE` lists each step with its offset
//!   from the starting tap (0, 0.25, 0.55, 0.95 and 1.25 seconds).
//! - **Debounce and reset**: taps while a sequence is in flight are dropped;
//!   once it completes, the next tap resets the button and un-likes it.
//! - **Ring geometry**: `geometry::ring_shape` builds the rectangle-with-hole
//!   path used by the background disc.
//! - **Engine**: `LikeBurstEngine` hosts many independent buttons, advances
//!   them on every clock tick and broadcasts strongly-typed events.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use likeburst::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = LikeBurstEngine::new(LikeBurstConfig::default());
//!
//!     let mut phases = engine.subscribe_phase_events();
//!     tokio::spawn(async move {
//!         while let Ok(event) = phases.recv().await {
//!             println!("{:?} -> {}", event.button, event.phase);
//!         }
//!     });
//!
//!     let button = engine.mount_button(false).await;
//!     engine.tap(button).await;
//!     engine.tap(button).await;
//!
//!     engine.run().await?;
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Likeburst Engine";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod feed;
pub mod geometry;
pub mod time;

/// A prelude module for easy importing of the most common Likeburst types.
pub mod prelude {
    pub use crate::common::{ButtonId, PostId};
    pub use crate::components::phase::{AnimationPhaseState, Phase};
    pub use crate::components::sequencer::{AnimationSequencer, SequenceStep, TapOutcome};
    pub use crate::components::visual::{ColorSource, PaletteColors, VisualState};
    pub use crate::config::{ClockResolution, LikeBurstConfig};
    pub use crate::engine::LikeBurstEngine;
    pub use crate::events::{LikeEvent, PhaseEvent, SystemEvent, TapEvent};
    pub use crate::feed::{Feed, Post};
    pub use crate::geometry::{ring_shape, FillRule, Path, Rect};
}

impl Default for config::LikeBurstConfig {
    fn default() -> Self {
        Self {
            resolution: config::ClockResolution::High,
            gesture: config::GestureConfig::default(),
            particles: config::ParticleConfig::default(),
        }
    }
}
