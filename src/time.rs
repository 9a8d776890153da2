//! Frame clock for the `draw_web()` loop.
//!
//! `draw_web()` fires roughly once per animation frame with no delta of its
//! own. FrameClock turns successive wall-clock timestamps into elapsed
//! milliseconds, so animations can be advanced (and tested) without a browser.

/// Largest delta handed out for a single frame. A backgrounded tab resumes
/// with one long frame; clamping keeps animations from skipping straight to
/// their end state on return.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct FrameClock {
    /// Timestamp of the last update (ms), None before the first frame
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
        }
    }

    /// Feed the wall-clock timestamp of the current frame (`Date.now()` or
    /// `performance.now()`). Returns the milliseconds to advance this frame.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        delta
    }

    /// Timestamp of the most recent frame, if any.
    pub fn now_ms(&self) -> Option<f64> {
        self.last_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.update(1_000.0), 0.0);
        assert_eq!(clock.now_ms(), Some(1_000.0));
    }

    #[test]
    fn steady_frames_report_their_spacing() {
        let mut clock = FrameClock::new();
        clock.update(0.0);
        assert!((clock.update(16.0) - 16.0).abs() < 1e-9);
        assert!((clock.update(33.0) - 17.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_large_delta() {
        let mut clock = FrameClock::new();
        clock.update(0.0);
        // Tab backgrounded for 10 seconds
        assert_eq!(clock.update(10_000.0), MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn clock_going_backwards_yields_zero() {
        let mut clock = FrameClock::new();
        clock.update(500.0);
        assert_eq!(clock.update(400.0), 0.0);
        assert_eq!(clock.now_ms(), Some(400.0));
    }

    #[test]
    fn sixty_frames_cover_one_second() {
        let mut clock = FrameClock::new();
        clock.update(0.0);
        let mut total = 0.0;
        for i in 1..=60 {
            total += clock.update(i as f64 * 16.667);
        }
        assert!((total - 1000.0).abs() < 0.1, "got {}", total);
    }
}
