//! Sprite selection for simulation entities

use serde::{Deserialize, Serialize};

use crate::sim::{ObstacleKind, TrexStatus};

/// Everything the renderer knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    TrexWaiting,
    TrexRunning,
    TrexJumping,
    TrexDucking,
    TrexCrashed,
    /// `units` side-by-side cacti
    CactusSmall { units: u32 },
    CactusLarge { units: u32 },
    Pterodactyl,
    Cloud,
    Ground { bumpy: bool },
    Restart,
}

impl Sprite {
    pub fn for_trex(status: TrexStatus) -> Self {
        match status {
            TrexStatus::Waiting => Sprite::TrexWaiting,
            TrexStatus::Running => Sprite::TrexRunning,
            TrexStatus::Jumping => Sprite::TrexJumping,
            TrexStatus::Ducking => Sprite::TrexDucking,
            TrexStatus::Crashed => Sprite::TrexCrashed,
        }
    }

    pub fn for_obstacle(kind: ObstacleKind, units: u32) -> Self {
        match kind {
            ObstacleKind::CactusSmall => Sprite::CactusSmall { units },
            ObstacleKind::CactusLarge => Sprite::CactusLarge { units },
            ObstacleKind::Pterodactyl => Sprite::Pterodactyl,
        }
    }
}
