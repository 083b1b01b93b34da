//! Pending-indicator handles for cells awaiting an outcome.
//!
//! Each pending cell owns one indicator for exactly one render generation.
//! The handle is shared as `Rc` so a surface can drive `tick` and read the
//! current glyph, while the grid alone decides when the pending lifetime
//! ends.

use std::cell::Cell;
use std::rc::Rc;

/// Glyph cycle, advanced one step per tick.
const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// One cell's pending animation: running from creation until the grid
/// resolves or discards the cell. Ticks after stop are no-ops.
#[derive(Debug)]
pub struct PendingIndicator {
    running: Cell<bool>,
    frame: Cell<usize>,
}

impl PendingIndicator {
    /// A new indicator is already running.
    pub(crate) fn start() -> Rc<Self> {
        Rc::new(Self {
            running: Cell::new(true),
            frame: Cell::new(0),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Advance the animation one frame.
    pub fn tick(&self) {
        if self.running.get() {
            self.frame.set((self.frame.get() + 1) % FRAMES.len());
        }
    }

    /// Current animation glyph.
    pub fn glyph(&self) -> char {
        FRAMES[self.frame.get()]
    }

    // Only the owning grid ends a pending lifetime.
    pub(crate) fn stop(&self) {
        self.running.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn runs_from_creation_until_stopped() {
        let indicator = PendingIndicator::start();
        assert!(indicator.is_running());
        indicator.stop();
        assert!(!indicator.is_running());
    }

    #[test]
    fn ticks_advance_only_while_running() {
        let indicator = PendingIndicator::start();
        let first = indicator.glyph();
        indicator.tick();
        assert_ne!(indicator.glyph(), first);

        indicator.stop();
        let frozen = indicator.glyph();
        indicator.tick();
        assert_eq!(indicator.glyph(), frozen);
    }

    #[test]
    fn glyph_cycle_wraps() {
        let indicator = PendingIndicator::start();
        for _ in 0..FRAMES.len() {
            indicator.tick();
        }
        assert_eq!(indicator.glyph(), FRAMES[0]);
    }
}
