use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::TargetKind;

/// Game tuning parameters for the shooting gallery
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Play area (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    pub const TARGET_WIDTH: f32 = 60.0;
    pub const TARGET_HEIGHT: f32 = 40.0;

    // Ammo
    pub const MAX_AMMO: u32 = 5;

    // Spawning
    pub const MAX_TARGETS: usize = 10;
    pub const SPAWN_INTERVAL_MS: u64 = 1500;
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 400;

    // Difficulty ramp
    pub const RAMP_INTERVAL_MS: u64 = 3000;
    pub const SPAWN_INTERVAL_STEP_MS: u64 = 500;
    pub const SPEED_STEP: f32 = 0.5;
    pub const MAX_SPEED_BONUS: f32 = 20.0;

    // Timing
    pub const TIME_LIMIT_MS: u64 = 60_000;
    pub const REFERENCE_HZ: f32 = 60.0;
    pub const GAME_OVER_PAUSE_MS: u64 = 3000;
}

/// Relative likelihood of each target kind.  Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindWeights {
    pub normal: f64,
    pub fast: f64,
    pub fake: f64,
    pub bonus: f64,
}

impl KindWeights {
    pub fn weight(&self, kind: TargetKind) -> f64 {
        match kind {
            TargetKind::Normal => self.normal,
            TargetKind::Fast => self.fast,
            TargetKind::Fake => self.fake,
            TargetKind::Bonus => self.bonus,
        }
    }

    /// Weights in `TargetKind::ALL` order.
    pub fn as_array(&self) -> [f64; 4] {
        TargetKind::ALL.map(|k| self.weight(k))
    }
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            normal: 0.5,
            fast: 0.3,
            fake: 0.1,
            bonus: 0.1,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("kind weight for {0:?} is negative or not finite")]
    BadWeight(TargetKind),
    #[error("kind weights sum to {0}, expected 1.0")]
    WeightSum(f64),
    #[error("screen must be wider than 0 and taller than 100 pixels, got {0}x{1}")]
    ScreenSize(f32, f32),
    #[error("target box must have a positive size, got {0}x{1}")]
    TargetSize(f32, f32),
    #[error("max ammo must be at least 1")]
    NoAmmo,
    #[error("starting ammo {starting} exceeds max ammo {max}")]
    StartingAmmo { starting: u32, max: u32 },
    #[error("minimum spawn interval must be positive")]
    MinSpawnInterval,
    #[error("initial spawn interval {initial}ms is below the minimum {min}ms")]
    SpawnInterval { initial: u64, min: u64 },
}

/// Round configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub target_width: f32,
    pub target_height: f32,
    pub max_ammo: u32,
    pub starting_ammo: u32,
    pub max_targets: usize,
    pub initial_spawn_interval_ms: u64,
    pub min_spawn_interval_ms: u64,
    pub spawn_interval_step_ms: u64,
    pub ramp_interval_ms: u64,
    pub speed_step: f32,
    pub max_speed_bonus: f32,
    /// `None` means the round only ends when ammo runs out.
    pub time_limit_ms: Option<u64>,
    pub reference_hz: f32,
    pub game_over_pause_ms: u64,
    pub weights: KindWeights,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            screen_width: Params::SCREEN_WIDTH,
            screen_height: Params::SCREEN_HEIGHT,
            target_width: Params::TARGET_WIDTH,
            target_height: Params::TARGET_HEIGHT,
            max_ammo: Params::MAX_AMMO,
            starting_ammo: Params::MAX_AMMO,
            max_targets: Params::MAX_TARGETS,
            initial_spawn_interval_ms: Params::SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: Params::MIN_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: Params::SPAWN_INTERVAL_STEP_MS,
            ramp_interval_ms: Params::RAMP_INTERVAL_MS,
            speed_step: Params::SPEED_STEP,
            max_speed_bonus: Params::MAX_SPEED_BONUS,
            time_limit_ms: Some(Params::TIME_LIMIT_MS),
            reference_hz: Params::REFERENCE_HZ,
            game_over_pause_ms: Params::GAME_OVER_PAUSE_MS,
            weights: KindWeights::default(),
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in TargetKind::ALL {
            let w = self.weights.weight(kind);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::BadWeight(kind));
            }
        }
        let sum: f64 = self.weights.as_array().iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(sum));
        }
        if self.screen_width <= 0.0 || self.screen_height <= 100.0 {
            return Err(ConfigError::ScreenSize(self.screen_width, self.screen_height));
        }
        if self.target_width <= 0.0 || self.target_height <= 0.0 {
            return Err(ConfigError::TargetSize(self.target_width, self.target_height));
        }
        if self.max_ammo == 0 {
            return Err(ConfigError::NoAmmo);
        }
        if self.starting_ammo > self.max_ammo {
            return Err(ConfigError::StartingAmmo {
                starting: self.starting_ammo,
                max: self.max_ammo,
            });
        }
        if self.min_spawn_interval_ms == 0 {
            return Err(ConfigError::MinSpawnInterval);
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            return Err(ConfigError::SpawnInterval {
                initial: self.initial_spawn_interval_ms,
                min: self.min_spawn_interval_ms,
            });
        }
        Ok(())
    }

    /// Converts an active-time delta into reference frames.
    pub fn frames_for(&self, dt_ms: u64) -> f32 {
        dt_ms as f32 * self.reference_hz / 1000.0
    }
}
