//! Redraw coalescing.
//!
//! Pointer moves can arrive several times per display frame. The snapshot
//! is updated on every event, but the renderer only needs to run once per
//! frame: the first change after a frame asks the host to schedule one,
//! later changes fold into that pending redraw.
//!
//! This holds no timers and knows nothing about positions; the host drives
//! it from its own frame callback.

#[derive(Debug, Clone, Default)]
pub struct RedrawCoalescer {
    pending: bool,
    /// Requests folded into an already-pending redraw.
    coalesced: u64,
}

impl RedrawCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the view dirty. Returns `true` if the caller must schedule a
    /// frame, `false` if one is already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Called from the frame callback. Returns whether a redraw was due.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
