//! Rex Runner - A side-scrolling endless runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (figure physics, obstacles, collisions, difficulty)
//! - `config`: Immutable configuration snapshots and the reconfigure path
//! - `platform`: Clock, frame scheduler and input intents
//! - `renderer`: Renderer seam and the sprite adapter that feeds it

pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, ConfigSetting, Dimensions, RunnerConfig};
pub use sim::{GameEvent, RunPhase, Runner};

/// Game configuration constants
pub mod consts {
    /// Canonical frame rate the per-frame tuning values are expressed in
    pub const FPS: f32 = 60.0;
    /// Milliseconds per canonical frame
    pub const MS_PER_FRAME: f32 = 1000.0 / FPS;

    /// Default surface dimensions
    pub const DEFAULT_WIDTH: f32 = 600.0;
    pub const DEFAULT_HEIGHT: f32 = 150.0;
}

/// Convert an elapsed time in milliseconds into canonical frames.
///
/// Every per-frame constant (gravity, scroll speed, acceleration) is scaled by this
/// so that the simulation is independent of the real frame interval.
#[inline]
pub fn frames_elapsed(elapsed_ms: f32) -> f32 {
    elapsed_ms / consts::MS_PER_FRAME
}
