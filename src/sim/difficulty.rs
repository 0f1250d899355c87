//! Difficulty curve: scroll speed over the course of a run

use crate::config::RunnerConfig;
use crate::consts::DEFAULT_WIDTH;
use crate::frames_elapsed;

/// Speed after `elapsed_ms` of running.
///
/// Acceleration is applied per canonical frame, like gravity, so the curve does not
/// depend on the real frame rate. Never decreases and never passes `max_speed`.
pub fn next_speed(current: f32, elapsed_ms: f32, config: &RunnerConfig) -> f32 {
    if current >= config.max_speed {
        return current;
    }
    let step = config.acceleration * frames_elapsed(elapsed_ms.max(0.0));
    (current + step).min(config.max_speed)
}

/// Starting speed for a surface of `viewport_width`.
///
/// Narrow surfaces scroll proportionally slower; the result never exceeds `speed`.
pub fn viewport_adjusted_speed(speed: f32, viewport_width: f32, config: &RunnerConfig) -> f32 {
    if viewport_width < DEFAULT_WIDTH {
        let mobile_speed = speed * viewport_width / DEFAULT_WIDTH * config.mobile_speed_coefficient;
        mobile_speed.min(speed)
    } else {
        speed
    }
}
