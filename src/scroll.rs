//! Header hide/show on scroll.
//!
//! Scroll events only request a frame; the offset is evaluated once per
//! animation frame:
//!
//! ```text
//! offset < top       -> visible
//! offset - last > δ  -> hidden   (scrolling down)
//! offset - last < -δ -> visible  (scrolling up)
//! otherwise          -> unchanged
//! ```

use std::cell::Cell;

use crate::config::ScrollConfig;

/// Header visibility decided for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVisibility {
    Visible,
    Hidden,
}

#[derive(Debug)]
pub struct ScrollDirector {
    top: f64,
    delta: f64,
    last: Cell<f64>,
    pending: Cell<bool>,
}

impl ScrollDirector {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            top: config.top,
            delta: config.delta,
            last: Cell::new(0.0),
            pending: Cell::new(false),
        }
    }

    /// Seed the last offset (page restored mid-scroll).
    pub fn with_offset(self, offset: f64) -> Self {
        self.last.set(offset);
        self
    }

    /// A scroll event arrived. Returns `true` when the host should request an
    /// animation frame; repeated events before that frame return `false`.
    pub fn on_scroll(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Evaluate the frame at `offset`. `None` means leave the header alone.
    pub fn on_frame(&self, offset: f64) -> Option<HeaderVisibility> {
        self.pending.set(false);
        let moved = offset - self.last.replace(offset);

        if offset < self.top {
            Some(HeaderVisibility::Visible)
        } else if moved > self.delta {
            Some(HeaderVisibility::Hidden)
        } else if moved < -self.delta {
            Some(HeaderVisibility::Visible)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}
