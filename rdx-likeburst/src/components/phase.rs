//! Defines the per-button phase flags and the ordering rules between them.

use std::fmt;

/// The discrete stage a button's animation has reached.
///
/// Stages are totally ordered; a button can only move to `phase.next()` or
/// back to `Idle` through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// No sequence has started since mount or the last reset.
    Idle,
    /// The forward sequence has begun; the icon collapses.
    Started,
    /// The background disc has begun expanding.
    BackgroundExpanded,
    /// The ring cutout is at full radius and the firework has fired.
    RingRevealed,
    /// The ring and firework layer has faded out.
    SequenceEnded,
    /// The next tap resets instead of starting a new sequence.
    ReadyToReset,
}

impl Phase {
    /// The successor of this phase in the forward sequence.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Started),
            Phase::Started => Some(Phase::BackgroundExpanded),
            Phase::BackgroundExpanded => Some(Phase::RingRevealed),
            Phase::RingRevealed => Some(Phase::SequenceEnded),
            Phase::SequenceEnded => Some(Phase::ReadyToReset),
            Phase::ReadyToReset => None,
        }
    }

    /// Short kebab-case name used in logs and the shell.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Started => "started",
            Phase::BackgroundExpanded => "background-expanded",
            Phase::RingRevealed => "ring-revealed",
            Phase::SequenceEnded => "sequence-ended",
            Phase::ReadyToReset => "ready-to-reset",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The animation state record owned by exactly one button.
///
/// Flags are only reachable through `advance_to` and `reset`, which keep them
/// in sequence order: a flag is never true while an earlier one is false.
/// `ring_revealed` and `firework_fired` always flip together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationPhaseState {
    liked: bool,
    started: bool,
    background_expanded: bool,
    ring_revealed: bool,
    firework_fired: bool,
    sequence_ended: bool,
    ready_to_reset: bool,
}

impl AnimationPhaseState {
    /// Creates an idle state with the caller's initial `liked` value.
    pub fn new(liked: bool) -> Self {
        Self {
            liked,
            ..Default::default()
        }
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn background_expanded(&self) -> bool {
        self.background_expanded
    }

    pub fn ring_revealed(&self) -> bool {
        self.ring_revealed
    }

    pub fn firework_fired(&self) -> bool {
        self.firework_fired
    }

    pub fn sequence_ended(&self) -> bool {
        self.sequence_ended
    }

    pub fn ready_to_reset(&self) -> bool {
        self.ready_to_reset
    }

    /// The furthest phase whose flag is set.
    pub fn phase(&self) -> Phase {
        if self.ready_to_reset {
            Phase::ReadyToReset
        } else if self.sequence_ended {
            Phase::SequenceEnded
        } else if self.ring_revealed {
            Phase::RingRevealed
        } else if self.background_expanded {
            Phase::BackgroundExpanded
        } else if self.started {
            Phase::Started
        } else {
            Phase::Idle
        }
    }

    /// True while a forward sequence is running and not yet eligible for reset.
    pub fn in_flight(&self) -> bool {
        self.started && !self.ready_to_reset
    }

    /// Checks the ordering invariant between the phase flags.
    pub fn is_consistent(&self) -> bool {
        (!self.background_expanded || self.started)
            && (!self.ring_revealed || self.background_expanded)
            && self.ring_revealed == self.firework_fired
            && (!self.sequence_ended || (self.ring_revealed && self.firework_fired))
            && (!self.ready_to_reset || self.sequence_ended)
    }

    /// Moves to `phase` if and only if it is the immediate successor of the
    /// current phase. Returns `false` and leaves the state untouched otherwise.
    pub(crate) fn advance_to(&mut self, phase: Phase) -> bool {
        if self.phase().next() != Some(phase) {
            return false;
        }
        match phase {
            Phase::Idle => return false,
            Phase::Started => {
                self.liked = true;
                self.started = true;
            }
            Phase::BackgroundExpanded => self.background_expanded = true,
            Phase::RingRevealed => {
                self.ring_revealed = true;
                self.firework_fired = true;
            }
            Phase::SequenceEnded => self.sequence_ended = true,
            Phase::ReadyToReset => self.ready_to_reset = true,
        }
        debug_assert!(self.is_consistent());
        true
    }

    /// Clears every phase flag and un-likes.
    pub(crate) fn reset(&mut self) {
        *self = Self::new(false);
    }

    /// Writes the externally bound `liked` value without touching phase flags.
    pub(crate) fn set_liked(&mut self, liked: bool) {
        self.liked = liked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_display() {
        assert_eq!(Phase::RingRevealed.label(), "ring-revealed");
        assert_eq!(Phase::ReadyToReset.to_string(), "ready-to-reset");
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = AnimationPhaseState::new(true);
        assert!(state.liked());
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.in_flight());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_advance_in_order() {
        let mut state = AnimationPhaseState::new(false);
        let mut phase = Phase::Idle;
        while let Some(next) = phase.next() {
            assert!(state.advance_to(next));
            assert_eq!(state.phase(), next);
            assert!(state.is_consistent());
            phase = next;
        }
        assert!(state.liked());
        assert!(state.firework_fired());
        assert!(state.ready_to_reset());
    }

    #[test]
    fn test_cannot_skip_a_phase() {
        let mut state = AnimationPhaseState::new(false);
        assert!(!state.advance_to(Phase::BackgroundExpanded));
        assert!(!state.advance_to(Phase::ReadyToReset));
        assert_eq!(state, AnimationPhaseState::new(false));

        assert!(state.advance_to(Phase::Started));
        assert!(!state.advance_to(Phase::Started));
        assert!(!state.advance_to(Phase::RingRevealed));
        assert_eq!(state.phase(), Phase::Started);
    }

    #[test]
    fn test_ring_and_firework_flip_together() {
        let mut state = AnimationPhaseState::new(false);
        state.advance_to(Phase::Started);
        state.advance_to(Phase::BackgroundExpanded);
        assert!(!state.firework_fired());
        state.advance_to(Phase::RingRevealed);
        assert!(state.ring_revealed() && state.firework_fired());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = AnimationPhaseState::new(true);
        state.advance_to(Phase::Started);
        state.advance_to(Phase::BackgroundExpanded);
        state.reset();
        assert_eq!(state, AnimationPhaseState::default());
    }

    #[test]
    fn test_set_liked_leaves_flags() {
        let mut state = AnimationPhaseState::new(false);
        state.advance_to(Phase::Started);
        state.set_liked(false);
        assert!(!state.liked());
        assert!(state.started());
    }
}
