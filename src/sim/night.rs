//! Day/night inversion
//!
//! Purely visual: the renderer reads the flag, physics and collision ignore it.

use serde::{Deserialize, Serialize};

use crate::config::RunnerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NightPhase {
    Day,
    /// Inverted; fades back after `invert_fade_duration`
    Night { elapsed_ms: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightMode {
    pub phase: NightPhase,
    /// Last distance milestone that triggered an inversion
    milestone: u32,
}

impl Default for NightMode {
    fn default() -> Self {
        Self {
            phase: NightPhase::Day,
            milestone: 0,
        }
    }
}

impl NightMode {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        matches!(self.phase, NightPhase::Night { .. })
    }

    /// Advance the inverter. Returns the new inversion flag when it toggles.
    ///
    /// Night falls each time the score crosses a multiple of `invert_distance`.
    pub fn update(&mut self, elapsed_ms: f32, score: u32, config: &RunnerConfig) -> Option<bool> {
        match self.phase {
            NightPhase::Night { elapsed_ms: so_far } => {
                let so_far = so_far + elapsed_ms;
                if so_far > config.invert_fade_duration {
                    self.phase = NightPhase::Day;
                    Some(false)
                } else {
                    self.phase = NightPhase::Night { elapsed_ms: so_far };
                    None
                }
            }
            NightPhase::Day => {
                let milestone = score / config.invert_distance.max(1);
                if milestone > self.milestone {
                    self.milestone = milestone;
                    self.phase = NightPhase::Night { elapsed_ms: 0.0 };
                    Some(true)
                } else {
                    None
                }
            }
        }
    }
}
