//! Distance meter: distance ran and score

use serde::{Deserialize, Serialize};

use crate::frames_elapsed;

/// Score units per unit of distance ran
pub const DISTANCE_COEFFICIENT: f32 = 0.025;
/// Score interval between achievements
pub const ACHIEVEMENT_DISTANCE: u32 = 100;

/// Score for a raw distance
pub fn score_for(distance: f32) -> u32 {
    if distance <= 0.0 {
        return 0;
    }
    (distance.ceil() * DISTANCE_COEFFICIENT).round() as u32
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceMeter {
    pub distance_ran: f32,
    last_achievement: u32,
}

impl DistanceMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        score_for(self.distance_ran)
    }

    /// Accumulate distance. Returns the score when it crosses an achievement mark.
    pub fn add(&mut self, speed: f32, elapsed_ms: f32) -> Option<u32> {
        self.distance_ran += speed * frames_elapsed(elapsed_ms);

        let score = self.score();
        let milestone = score / ACHIEVEMENT_DISTANCE;
        if milestone > self.last_achievement {
            self.last_achievement = milestone;
            Some(milestone * ACHIEVEMENT_DISTANCE)
        } else {
            None
        }
    }
}
