//! Engine configuration.
//!
//! The original demo engine kept the speed of light, the animation speed
//! multiplier and a frequency-adjust constant as process-wide mutable
//! globals. Here they live in an immutable `EngineConfig` owned by each
//! `LightLayer`, so two tutorial instances can run side by side at
//! different speeds and unit tests can pin the frame math deterministically.

use std::fmt;

/// Immutable per-layer engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Propagation speed in scene units per second. Traversal time of a
    /// segment is `distance · ior / speed_of_light`.
    pub speed_of_light: f64,
    /// Wall-clock speed multiplier: 2.0 plays every animation twice as fast.
    pub animation_speed: f64,
    /// Virtual frames per second of animation time.
    pub frame_rate: f64,
    /// Global scale applied to every layer frequency before phase math.
    pub frequency_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed_of_light: 150.0, // scene units / s — one screen-width per ~2 s
            animation_speed: 1.0,
            frame_rate: 25.0,
            frequency_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration, returning it unchanged on success.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(self.speed_of_light.is_finite() && self.speed_of_light > 0.0) {
            return Err(ConfigError::NonPositiveSpeedOfLight(self.speed_of_light));
        }
        if !(self.animation_speed.is_finite() && self.animation_speed > 0.0) {
            return Err(ConfigError::NonPositiveAnimationSpeed(self.animation_speed));
        }
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::NonPositiveFrameRate(self.frame_rate));
        }
        if !(self.frequency_scale.is_finite() && self.frequency_scale > 0.0) {
            return Err(ConfigError::NonPositiveFrequencyScale(self.frequency_scale));
        }
        Ok(self)
    }
}

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveSpeedOfLight(f64),
    NonPositiveAnimationSpeed(f64),
    NonPositiveFrameRate(f64),
    NonPositiveFrequencyScale(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveSpeedOfLight(v) => {
                write!(f, "speed_of_light must be finite and positive, got {}", v)
            }
            ConfigError::NonPositiveAnimationSpeed(v) => {
                write!(f, "animation_speed must be finite and positive, got {}", v)
            }
            ConfigError::NonPositiveFrameRate(v) => {
                write!(f, "frame_rate must be finite and positive, got {}", v)
            }
            ConfigError::NonPositiveFrequencyScale(v) => {
                write!(f, "frequency_scale must be finite and positive, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
