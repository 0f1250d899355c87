//! Platform abstraction layer
//!
//! The services the simulation consumes from its host:
//! - Time (monotonic millisecond clock)
//! - Frame scheduling (request / cancel the next tick)
//! - Input intents (already decoded from raw device events)

pub mod input;
pub mod scheduler;
pub mod time;

pub use input::Intent;
pub use scheduler::{FrameRequest, FrameScheduler};
pub use time::{Clock, ManualClock, SystemClock};
