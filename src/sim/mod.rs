//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time only arrives as elapsed milliseconds, scaled to canonical frames
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering dependencies

pub mod autojump;
pub mod collision;
pub mod difficulty;
pub mod distance;
pub mod geometry;
pub mod horizon;
pub mod night;
pub mod obstacle;
pub mod state;
pub mod tick;
pub mod trex;

pub use autojump::should_jump;
pub use collision::{Collision, boxes_collide, check_collision};
pub use difficulty::{next_speed, viewport_adjusted_speed};
pub use distance::DistanceMeter;
pub use geometry::CollisionBox;
pub use horizon::{Cloud, Horizon, HorizonLine};
pub use night::{NightMode, NightPhase};
pub use obstacle::{Obstacle, ObstacleGenerator, ObstacleKind};
pub use state::{GameEvent, RunPhase, RunState};
pub use tick::Runner;
pub use trex::{Trex, TrexConfig, TrexStatus};
