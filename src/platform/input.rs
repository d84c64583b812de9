//! Keyboard and swipe translation

use crate::sim::LaneShift;

/// Minimum horizontal travel (CSS px) for a touch to count as a swipe
pub const SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Lane intent for a `KeyboardEvent.key` value
pub fn lane_shift_for_key(key: &str) -> Option<LaneShift> {
    match key {
        "ArrowLeft" => Some(LaneShift::Left),
        "ArrowRight" => Some(LaneShift::Right),
        _ if key.eq_ignore_ascii_case("a") => Some(LaneShift::Left),
        _ if key.eq_ignore_ascii_case("d") => Some(LaneShift::Right),
        _ => None,
    }
}

/// Tracks one touch from start to end
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start_x: Option<f32>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD_PX)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the touch; direction is the sign of the horizontal delta
    pub fn end(&mut self, x: f32) -> Option<LaneShift> {
        let start = self.start_x.take()?;
        let delta = x - start;
        if delta < -self.threshold {
            Some(LaneShift::Left)
        } else if delta > self.threshold {
            Some(LaneShift::Right)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(lane_shift_for_key("ArrowLeft"), Some(LaneShift::Left));
        assert_eq!(lane_shift_for_key("A"), Some(LaneShift::Left));
        assert_eq!(lane_shift_for_key("d"), Some(LaneShift::Right));
        assert_eq!(lane_shift_for_key("Escape"), None);
    }

    #[test]
    fn test_swipe_threshold() {
        let mut swipe = SwipeTracker::default();
        swipe.begin(200.0);
        assert_eq!(swipe.end(140.0), Some(LaneShift::Left));

        swipe.begin(200.0);
        assert_eq!(swipe.end(240.0), None);

        swipe.begin(200.0);
        assert_eq!(swipe.end(251.0), Some(LaneShift::Right));
    }

    #[test]
    fn test_end_without_begin() {
        let mut swipe = SwipeTracker::default();
        assert_eq!(swipe.end(500.0), None);
        swipe.begin(0.0);
        swipe.end(100.0);
        // Start is consumed
        assert_eq!(swipe.end(300.0), None);
    }
}
