//! Run state and simulation events
//!
//! `RunState` holds everything that belongs to a single run. Restart replaces it
//! wholesale; session counters (play count, high score) live on the `Runner`.

use serde::{Deserialize, Serialize};

use super::distance::DistanceMeter;
use super::night::NightMode;
use crate::config::ConfigSetting;

/// Current phase of the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Idle before the first input
    Waiting,
    /// First jump in progress; the world starts scrolling once it lands
    Intro,
    /// Active gameplay
    Running,
    /// Surface hidden or unfocused; no time passes
    Paused,
    /// Run ended on a collision
    Crashed,
}

impl RunPhase {
    /// Phases in which frames advance the simulation
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, RunPhase::Intro | RunPhase::Running)
    }
}

/// Events emitted during simulation, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    JumpStarted,
    Landed,
    ObstacleSpawned { id: u32 },
    /// Score crossed an achievement mark
    Achievement { score: u32 },
    /// Day/night inversion toggled (true = inverted)
    Inverted(bool),
    Crashed {
        score: u32,
        obstacle_id: u32,
        new_high_score: bool,
    },
    Restarted { play_count: u32 },
    Paused,
    Resumed,
    Reconfigured(ConfigSetting),
}

/// State of one run, from activation to crash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    /// Milliseconds spent in active phases
    pub running_time: f32,
    /// Current scroll speed in units per canonical frame
    pub speed: f32,
    pub night: NightMode,
    pub distance: DistanceMeter,
    /// Clock timestamp of the crash, if the run has ended
    pub crashed_at: Option<f64>,
}

impl RunState {
    pub fn new(phase: RunPhase, speed: f32) -> Self {
        Self {
            phase,
            running_time: 0.0,
            speed,
            night: NightMode::new(),
            distance: DistanceMeter::new(),
            crashed_at: None,
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.distance.score()
    }
}
