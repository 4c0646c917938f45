//! Engine tuning.
//!
//! Loaded once at startup from TOML; every field has the observed
//! default so a missing file is not an error.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Logical grid size the engine renders to (cells per side).
pub const DEFAULT_GRID_WIDTH: u32 = 128;

/// Ticks per second of the fixed-tick driver.
pub const DEFAULT_TICK_RATE: u32 = 16;

/// Spring parameters for the motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Stiffness (`k3`). Pull toward the target.
    pub stiffness: f32,
    /// Damping (`k1`). `None` derives the critically-damped value
    /// `2 * sqrt(stiffness)`.
    #[serde(default)]
    pub damping: Option<f32>,
}

impl SpringConfig {
    /// Effective damping coefficient.
    #[must_use]
    pub fn damping_or_critical(&self) -> f32 {
        self.damping.unwrap_or_else(|| 2.0 * self.stiffness.sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 4.0,
            damping: None,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks per second.
    pub tick_rate: u32,
    /// Logical grid size (the screen buffer is `grid_width ** 2`).
    pub grid_width: u32,
    /// Cells moved per wheel notch on scrollable containers.
    pub scroll_speed: i32,
    /// Seed for the session RNG (state-group selection). Fixed seeds
    /// make replays reproducible.
    pub rng_seed: u64,
    /// Motion spring tuning.
    pub spring: SpringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            grid_width: DEFAULT_GRID_WIDTH,
            scroll_speed: 2,
            rng_seed: 0,
            spring: SpringConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfig`] on parse failure or zero
    /// tick-rate/grid values.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Seconds per tick.
    #[must_use]
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    fn validate(&self) -> EngineResult<()> {
        if self.tick_rate == 0 {
            return Err(EngineError::InvalidConfig("tick_rate must be > 0".into()));
        }
        if self.grid_width == 0 {
            return Err(EngineError::InvalidConfig("grid_width must be > 0".into()));
        }
        if self.spring.stiffness <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "spring.stiffness must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_engine() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_rate, 16);
        assert_eq!(config.grid_width, 128);
        assert!((config.tick_dt() - 0.0625).abs() < f32::EPSILON);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::from_toml_str(
            r#"
            tick_rate = 20
            scroll_speed = 3

            [spring]
            stiffness = 9.0
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_rate, 20);
        assert_eq!(config.grid_width, 128);
        assert!((config.spring.damping_or_critical() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            EngineConfig::from_toml_str("tick_rate = 0"),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
