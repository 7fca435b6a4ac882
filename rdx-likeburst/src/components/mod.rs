//! Contains the building blocks of a single like button.
//!
//! This module provides the phase state record, the forward sequencer that
//! drives it, the tap recognizer that feeds it, the motion profiles attached
//! to each step, and the visual state derived from it. The `LikeBurstEngine`
//! owns one of each per mounted button.

pub mod gesture;
pub mod motion;
pub mod phase;
pub mod sequencer;
pub mod visual;
