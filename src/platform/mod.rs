//! Platform abstraction layer
//!
//! Translates raw browser input (keys, touch swipes) into lane intents, and
//! provides a demo autopilot that emits the same intents. Nothing here
//! depends on `web_sys`, so it is testable natively.

pub mod autopilot;
pub mod input;

pub use input::{SWIPE_THRESHOLD_PX, SwipeTracker, lane_shift_for_key};
