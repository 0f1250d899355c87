//! Frame scheduler
//!
//! At most one frame is pending at a time. Cancelling bumps the generation, so a
//! request handed out before the cancel is refused when it is delivered.

/// Handle for one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Option<FrameRequest>,
    generation: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next frame. Idempotent while a frame is already pending.
    pub fn request(&mut self) -> FrameRequest {
        *self.pending.get_or_insert(FrameRequest {
            generation: self.generation,
        })
    }

    /// Drop the pending frame and invalidate any request already handed out
    pub fn cancel(&mut self) {
        self.pending = None;
        self.generation += 1;
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Consume a delivered frame. False for stale or unknown requests.
    pub fn accept(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
