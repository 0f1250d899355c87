//! Runner configuration
//!
//! A `RunnerConfig` is an immutable snapshot. Changing a value goes through
//! [`RunnerConfig::with_setting`], which returns a new snapshot; the live
//! simulation picks it up via `Runner::reconfigure`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Display surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Dimensions {
    /// Surface of the given width, capped at the default width
    pub fn with_width(width: f32) -> Self {
        Self {
            width: width.clamp(1.0, DEFAULT_WIDTH),
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Tunable game constants.
///
/// Per-frame values (speeds, gravity, acceleration) are expressed in canonical
/// 60 Hz frames; durations are milliseconds; distances are surface units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RunnerConfig {
    pub acceleration: f32,
    pub bg_cloud_speed: f32,
    pub bottom_pad: f32,
    /// Obstacle-free warm-up at the start of a run (ms)
    pub clear_time: f32,
    pub cloud_frequency: f32,
    /// Minimum time after a crash before a jump restarts (ms)
    pub gameover_clear_time: f32,
    pub gap_coefficient: f32,
    pub max_gap_coefficient: f32,
    pub gravity: f32,
    pub initial_jump_velocity: f32,
    pub invert_fade_duration: f32,
    pub invert_distance: u32,
    pub max_clouds: usize,
    /// Widest cluster in units, and the repetition cap for one kind
    pub max_obstacle_duplication: usize,
    pub max_speed: f32,
    pub min_jump_height: f32,
    pub mobile_speed_coefficient: f32,
    /// Initial scroll speed
    pub speed: f32,
    pub speed_drop_coefficient: f32,
    pub auto_jump: bool,
    pub auto_jump_distance: f32,
    /// Inward margin applied to every box before intersection
    pub collision_tolerance: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            acceleration: 0.001,
            bg_cloud_speed: 0.2,
            bottom_pad: 10.0,
            clear_time: 3000.0,
            cloud_frequency: 0.5,
            gameover_clear_time: 750.0,
            gap_coefficient: 0.6,
            max_gap_coefficient: 1.5,
            gravity: 0.6,
            initial_jump_velocity: 12.0,
            invert_fade_duration: 12000.0,
            invert_distance: 700,
            max_clouds: 6,
            max_obstacle_duplication: 2,
            max_speed: 13.0,
            min_jump_height: 35.0,
            mobile_speed_coefficient: 1.2,
            speed: 6.0,
            speed_drop_coefficient: 3.0,
            auto_jump: true,
            auto_jump_distance: 120.0,
            collision_tolerance: 1.0,
        }
    }
}

/// Settings that can be changed on a live runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigSetting {
    Acceleration,
    ClearTime,
    GapCoefficient,
    Gravity,
    InitialJumpVelocity,
    InvertDistance,
    MaxSpeed,
    MinJumpHeight,
    Speed,
    SpeedDropCoefficient,
    AutoJumpDistance,
    CollisionTolerance,
}

impl ConfigSetting {
    pub const ALL: [ConfigSetting; 12] = [
        ConfigSetting::Acceleration,
        ConfigSetting::ClearTime,
        ConfigSetting::GapCoefficient,
        ConfigSetting::Gravity,
        ConfigSetting::InitialJumpVelocity,
        ConfigSetting::InvertDistance,
        ConfigSetting::MaxSpeed,
        ConfigSetting::MinJumpHeight,
        ConfigSetting::Speed,
        ConfigSetting::SpeedDropCoefficient,
        ConfigSetting::AutoJumpDistance,
        ConfigSetting::CollisionTolerance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSetting::Acceleration => "ACCELERATION",
            ConfigSetting::ClearTime => "CLEAR_TIME",
            ConfigSetting::GapCoefficient => "GAP_COEFFICIENT",
            ConfigSetting::Gravity => "GRAVITY",
            ConfigSetting::InitialJumpVelocity => "INITIAL_JUMP_VELOCITY",
            ConfigSetting::InvertDistance => "INVERT_DISTANCE",
            ConfigSetting::MaxSpeed => "MAX_SPEED",
            ConfigSetting::MinJumpHeight => "MIN_JUMP_HEIGHT",
            ConfigSetting::Speed => "SPEED",
            ConfigSetting::SpeedDropCoefficient => "SPEED_DROP_COEFFICIENT",
            ConfigSetting::AutoJumpDistance => "AUTO_JUMP_DISTANCE",
            ConfigSetting::CollisionTolerance => "COLLISION_TOLERANCE",
        }
    }
}

impl fmt::Display for ConfigSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ConfigSetting::ALL
            .into_iter()
            .find(|setting| setting.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownSetting(s.to_string()))
    }
}

/// Rejected configuration input
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownSetting(String),
    NonFinite { setting: &'static str },
    OutOfRange { setting: &'static str, value: f64 },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSetting(name) => write!(f, "unknown config setting: {name}"),
            Self::NonFinite { setting } => write!(f, "{setting} must be a finite number"),
            Self::OutOfRange { setting, value } => {
                write!(f, "{setting} out of range: {value}")
            }
            Self::Parse(msg) => write!(f, "invalid config json: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Weaker gravity never brings a jump back down in any reasonable time
const MIN_GRAVITY: f64 = 1e-3;

fn check(setting: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { setting });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { setting, value });
    }
    Ok(())
}

impl RunnerConfig {
    /// Parse a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("ACCELERATION", self.acceleration as f64, 0.0, 1.0)?;
        check("BG_CLOUD_SPEED", self.bg_cloud_speed as f64, 0.0, 10.0)?;
        check("CLEAR_TIME", self.clear_time as f64, 0.0, f64::MAX)?;
        check("CLOUD_FREQUENCY", self.cloud_frequency as f64, 0.0, 1.0)?;
        check("GAMEOVER_CLEAR_TIME", self.gameover_clear_time as f64, 0.0, f64::MAX)?;
        check("GAP_COEFFICIENT", self.gap_coefficient as f64, 0.0, 10.0)?;
        check("MAX_GAP_COEFFICIENT", self.max_gap_coefficient as f64, 1.0, 10.0)?;
        check("GRAVITY", self.gravity as f64, MIN_GRAVITY, 10.0)?;
        check("INITIAL_JUMP_VELOCITY", self.initial_jump_velocity as f64, 0.0, 100.0)?;
        check("INVERT_FADE_DURATION", self.invert_fade_duration as f64, 0.0, f64::MAX)?;
        check("INVERT_DISTANCE", self.invert_distance as f64, 1.0, f64::MAX)?;
        check("MAX_OBSTACLE_DUPLICATION", self.max_obstacle_duplication as f64, 1.0, 16.0)?;
        check("MAX_SPEED", self.max_speed as f64, 0.0, 100.0)?;
        check("MIN_JUMP_HEIGHT", self.min_jump_height as f64, 0.0, 150.0)?;
        check("MOBILE_SPEED_COEFFICIENT", self.mobile_speed_coefficient as f64, 0.0, 10.0)?;
        check("SPEED", self.speed as f64, 0.0, self.max_speed as f64)?;
        check("SPEED_DROP_COEFFICIENT", self.speed_drop_coefficient as f64, 1.0, 20.0)?;
        check("AUTO_JUMP_DISTANCE", self.auto_jump_distance as f64, 0.0, 1000.0)?;
        check("COLLISION_TOLERANCE", self.collision_tolerance as f64, 0.0, 10.0)?;
        Ok(())
    }

    /// Return a new snapshot with one setting changed
    pub fn with_setting(&self, setting: ConfigSetting, value: f64) -> Result<Self, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite {
                setting: setting.as_str(),
            });
        }

        let mut next = self.clone();
        let v = value as f32;
        match setting {
            ConfigSetting::Acceleration => next.acceleration = v,
            ConfigSetting::ClearTime => next.clear_time = v,
            ConfigSetting::GapCoefficient => next.gap_coefficient = v,
            ConfigSetting::Gravity => next.gravity = v,
            ConfigSetting::InitialJumpVelocity => next.initial_jump_velocity = v,
            ConfigSetting::InvertDistance => {
                check(setting.as_str(), value, 1.0, u32::MAX as f64)?;
                next.invert_distance = value.round() as u32;
            }
            ConfigSetting::MaxSpeed => next.max_speed = v,
            ConfigSetting::MinJumpHeight => next.min_jump_height = v,
            ConfigSetting::Speed => next.speed = v,
            ConfigSetting::SpeedDropCoefficient => next.speed_drop_coefficient = v,
            ConfigSetting::AutoJumpDistance => next.auto_jump_distance = v,
            ConfigSetting::CollisionTolerance => next.collision_tolerance = v,
        }
        next.validate()?;
        Ok(next)
    }
}
