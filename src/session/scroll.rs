//! Near-bottom detection for infinite scroll.

/// Default distance from the bottom, in pixels, that counts as near
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 150;

/// Fires once when the viewport comes within `threshold` of the bottom,
/// and re-arms after it moves away again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    threshold: u32,
    armed: bool,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollTrigger {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            armed: true,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Feeds a scroll position. Returns true when a load-more should fire.
    pub fn observe(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> bool {
        let remaining = scroll_height - scroll_top - client_height;
        let near = remaining <= f64::from(self.threshold);

        if near && self.armed {
            self.armed = false;
            return true;
        }
        if !near {
            self.armed = true;
        }
        false
    }

    /// Re-arms the trigger, e.g. after the list was replaced
    pub fn reset(&mut self) {
        self.armed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_near_bottom() {
        let mut t = ScrollTrigger::new(150);

        assert!(!t.observe(0.0, 2000.0, 800.0));
        assert!(t.observe(1100.0, 2000.0, 800.0));
        assert!(!t.observe(1150.0, 2000.0, 800.0));
    }

    #[test]
    fn test_rearms_after_moving_away() {
        let mut t = ScrollTrigger::default();

        assert!(t.observe(1100.0, 2000.0, 800.0));
        // List grew; the viewport is no longer near the bottom
        assert!(!t.observe(1100.0, 4000.0, 800.0));
        assert!(t.observe(3100.0, 4000.0, 800.0));
    }

    #[test]
    fn test_reset() {
        let mut t = ScrollTrigger::new(150);
        assert!(t.observe(1200.0, 2000.0, 800.0));
        t.reset();
        assert!(t.observe(1200.0, 2000.0, 800.0));
    }
}
