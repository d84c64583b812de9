//! Discrete lanes and lateral smoothing

use serde::{Deserialize, Serialize};

use crate::lerp;

/// One-step lane change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneShift {
    Left,
    Right,
}

impl LaneShift {
    /// Map a signed intent (`-1` / `+1`) to a shift; zero means none
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign.signum() {
            -1 => Some(LaneShift::Left),
            1 => Some(LaneShift::Right),
            _ => None,
        }
    }

    fn delta(self) -> isize {
        match self {
            LaneShift::Left => -1,
            LaneShift::Right => 1,
        }
    }
}

/// Lane layout plus the runner's target lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneModel {
    offsets: Vec<f32>,
    start: usize,
    target: usize,
    smoothing: f32,
}

impl LaneModel {
    pub fn new(offsets: Vec<f32>, start: usize, smoothing: f32) -> Self {
        let start = start.min(offsets.len().saturating_sub(1));
        Self {
            offsets,
            start,
            target: start,
            smoothing,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.offsets.len()
    }

    /// Lane the runner is heading to
    pub fn target(&self) -> usize {
        self.target
    }

    /// World x of a lane (0.0 for an empty layout)
    pub fn offset(&self, lane: usize) -> f32 {
        self.offsets.get(lane).copied().unwrap_or(0.0)
    }

    pub fn target_offset(&self) -> f32 {
        self.offset(self.target)
    }

    pub fn reset(&mut self) {
        self.target = self.start;
    }

    /// Step the target lane, clamped to the layout; returns whether it moved
    pub fn shift(&mut self, shift: LaneShift) -> bool {
        let next = self.target as isize + shift.delta();
        if next < 0 || next as usize >= self.offsets.len() {
            return false;
        }
        self.target = next as usize;
        true
    }

    /// One smoothing step from `x` toward the target lane
    ///
    /// The factor is applied per call, independent of frame time.
    pub fn step(&self, x: f32) -> f32 {
        lerp(x, self.target_offset(), self.smoothing)
    }
}
