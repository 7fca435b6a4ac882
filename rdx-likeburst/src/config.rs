//! Defines all configuration structures for the Likeburst engine.
//!
//! These structs are deserialized with `serde` from an optional TOML file
//! layered under `LIKEBURST_*` environment variables. Only runtime concerns
//! are configurable: tick speed, gesture recognition and the particle colour
//! seed. The step schedule and the visual constants are fixed.

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables read by `LikeBurstConfig::load`.
pub const ENV_PREFIX: &str = "LIKEBURST";

/// The top-level configuration for the `LikeBurstEngine`.
#[derive(Debug, Clone, Deserialize)]
pub struct LikeBurstConfig {
    /// The tick speed of the `SystemClock`. Steps fire at their own
    /// deadlines regardless of this value.
    #[serde(default = "default_resolution")]
    pub resolution: ClockResolution,

    /// How many taps make up one like gesture.
    #[serde(default)]
    pub gesture: GestureConfig,

    /// Seeding of the particle colour source.
    #[serde(default)]
    pub particles: ParticleConfig,
}

/// Defines the operational speed of the `SystemClock`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// ~120 ticks per second.
    Ultra,
    /// ~60 ticks per second. One tick per rendered frame.
    High,
    /// ~30 ticks per second.
    Medium,
    /// ~10 ticks per second.
    Low,
    /// A user-defined speed in ticks per second.
    Custom { ticks_per_second: u64 },
}

impl ClockResolution {
    pub fn ticks_per_second(&self) -> u64 {
        match self {
            ClockResolution::Ultra => 120,
            ClockResolution::High => 60,
            ClockResolution::Medium => 30,
            ClockResolution::Low => 10,
            ClockResolution::Custom { ticks_per_second } => (*ticks_per_second).max(1),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second() as u32
    }
}

/// Configuration of the `TapRecognizer` in front of each button.
#[derive(Debug, Clone, Deserialize)]
pub struct GestureConfig {
    /// Taps per gesture. The feed overlay uses a double tap.
    #[serde(default = "default_taps_required")]
    pub taps_required: u32,

    /// Longest gap between two taps of the same gesture, in milliseconds.
    #[serde(default = "default_multi_tap_window_ms")]
    pub multi_tap_window_ms: u64,
}

impl GestureConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.multi_tap_window_ms)
    }
}

/// Configuration of particle colouring.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticleConfig {
    /// Fixed seed for reproducible colours. Entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LikeBurstConfig {
    /// Loads the configuration from `path` (if given) and the environment.
    ///
    /// Environment keys follow the prefix with a single `_` and use `__` as
    /// the nesting separator, e.g. `LIKEBURST_RESOLUTION=low` or
    /// `LIKEBURST_GESTURE__TAPS_REQUIRED=1`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read likeburst configuration")?
            .try_deserialize()
            .context("invalid likeburst configuration")
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
            .context("invalid likeburst configuration")
    }
}

// --- Default value functions for serde ---

fn default_resolution() -> ClockResolution {
    ClockResolution::High
}

fn default_taps_required() -> u32 {
    2
}

fn default_multi_tap_window_ms() -> u64 {
    300
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            taps_required: default_taps_required(),
            multi_tap_window_ms: default_multi_tap_window_ms(),
        }
    }
}
