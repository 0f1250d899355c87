//! Input intents delivered to the runner

use serde::{Deserialize, Serialize};

/// A discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Start a jump; also starts the first run and restarts after a crash
    JumpPressed,
    /// Cut the current jump short
    JumpReleased,
    /// Duck when grounded, fast-fall when airborne
    DuckPressed,
    DuckReleased,
}
