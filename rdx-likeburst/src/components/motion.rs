//! Motion profiles attached to each sequence step.
//!
//! The sequencer only decides *when* a flag flips. The profile travels with
//! the resulting `PhaseEvent` so a renderer can decide *how* the matching
//! visual property moves to its new value.

use std::f32::consts::TAU;
use std::time::Duration;

/// Envelope amplitude below which a spring counts as settled.
const SETTLE_THRESHOLD: f32 = 0.001;

/// The easing curve a renderer should use for a single transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionProfile {
    /// A responsive spring suited to direct manipulation.
    InteractiveSpring {
        response: f32,
        damping_fraction: f32,
        blend_duration: f32,
    },
    /// A general-purpose spring.
    Spring { response: f32, damping_fraction: f32 },
    /// Decelerating curve over a fixed duration, in seconds.
    EaseOut { duration: f32 },
}

impl MotionProfile {
    /// Collapse and reveal motion for the icon and the ring cutout.
    pub const ICON: MotionProfile = MotionProfile::InteractiveSpring {
        response: 0.5,
        damping_fraction: 0.6,
        blend_duration: 0.6,
    };

    /// Slightly bouncier motion for the expanding background disc.
    pub const BACKGROUND: MotionProfile = MotionProfile::InteractiveSpring {
        response: 0.4,
        damping_fraction: 0.5,
        blend_duration: 0.5,
    };

    /// Snappy default spring for the particle burst.
    pub const FIREWORK: MotionProfile = MotionProfile::Spring {
        response: 0.5,
        damping_fraction: 0.825,
    };

    /// Fade of the ring and particle layer.
    pub const FADE: MotionProfile = MotionProfile::EaseOut { duration: 0.4 };

    /// Progress of the transition `elapsed` seconds after it began.
    ///
    /// Starts at `0.0` and settles at `1.0`. Springs may overshoot.
    pub fn sample(&self, elapsed: f32) -> f32 {
        if elapsed <= 0.0 {
            return 0.0;
        }
        match *self {
            MotionProfile::InteractiveSpring {
                response,
                damping_fraction,
                ..
            }
            | MotionProfile::Spring {
                response,
                damping_fraction,
            } => spring_progress(response, damping_fraction, elapsed),
            MotionProfile::EaseOut { duration } => {
                if duration <= 0.0 {
                    return 1.0;
                }
                let p = (elapsed / duration).min(1.0);
                1.0 - (1.0 - p) * (1.0 - p)
            }
        }
    }

    /// How long the transition takes to visually come to rest.
    pub fn settle_duration(&self) -> Duration {
        let seconds = match *self {
            MotionProfile::InteractiveSpring {
                response,
                damping_fraction,
                ..
            }
            | MotionProfile::Spring {
                response,
                damping_fraction,
            } => {
                let omega = TAU / response.max(f32::EPSILON);
                let decay = damping_fraction.clamp(0.01, 1.0) * omega;
                (1.0 / SETTLE_THRESHOLD).ln() / decay
            }
            MotionProfile::EaseOut { duration } => duration.max(0.0),
        };
        Duration::from_secs_f32(seconds)
    }
}

fn spring_progress(response: f32, damping_fraction: f32, t: f32) -> f32 {
    let omega = TAU / response.max(f32::EPSILON);
    let zeta = damping_fraction.max(0.0);
    if zeta >= 1.0 {
        // Critically damped.
        return 1.0 - (-omega * t).exp() * (1.0 + omega * t);
    }
    let damped = omega * (1.0 - zeta * zeta).sqrt();
    let envelope = (-zeta * omega * t).exp();
    1.0 - envelope * ((damped * t).cos() + (zeta * omega / damped) * (damped * t).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_profiles_start_at_zero() {
        for profile in [
            MotionProfile::ICON,
            MotionProfile::BACKGROUND,
            MotionProfile::FIREWORK,
            MotionProfile::FADE,
        ] {
            assert_eq!(profile.sample(0.0), 0.0);
        }
    }

    #[test]
    fn test_springs_settle_at_one() {
        for profile in [MotionProfile::ICON, MotionProfile::BACKGROUND, MotionProfile::FIREWORK] {
            let settle = profile.settle_duration().as_secs_f32();
            assert!((profile.sample(settle * 2.0) - 1.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_underdamped_spring_overshoots() {
        let peak = (1..200)
            .map(|i| MotionProfile::BACKGROUND.sample(i as f32 * 0.005))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_ease_out_is_monotonic_and_ends_at_duration() {
        let fade = MotionProfile::FADE;
        let mut last = 0.0;
        for i in 1..=40 {
            let value = fade.sample(i as f32 * 0.01);
            assert!(value >= last);
            last = value;
        }
        assert_eq!(fade.sample(0.4), 1.0);
        assert_eq!(fade.settle_duration(), Duration::from_secs_f32(0.4));
    }
}
