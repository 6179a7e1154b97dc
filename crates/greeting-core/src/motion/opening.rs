//! The short "envelope opens" animation played after a ready click.
//!
//! Driven by wall-clock time since the click, so its length does not
//! depend on frame rate. It cannot be interrupted; tearing down the
//! owner simply drops it.

use serde::{Deserialize, Serialize};

use super::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningTimings {
    /// Length of the rise phase.
    pub rise_ms: f64,
    /// Total length; the fall/settle phase fills the rest.
    pub total_ms: f64,
    /// When the next screen's content swaps in under the envelope.
    pub swap_at_ms: f64,
    /// Peak rise in pixels (screen space, so applied upward).
    pub rise_px: f32,
    /// Rotation swings from `-tilt_deg` to `+tilt_deg` over the first half.
    pub tilt_deg: f32,
}

impl Default for OpeningTimings {
    fn default() -> Self {
        Self {
            rise_ms: 180.0,
            total_ms: 680.0,
            swap_at_ms: 140.0,
            rise_px: 120.0,
            tilt_deg: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningFrame {
    /// Vertical offset, negative is up.
    pub offset_y: f32,
    pub rotate_deg: f32,
    pub content_swapped: bool,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct OpeningSequence {
    started_at_ms: f64,
    timings: OpeningTimings,
}

impl OpeningSequence {
    pub fn new(started_at_ms: f64, timings: OpeningTimings) -> Self {
        Self {
            started_at_ms,
            timings,
        }
    }

    pub fn sample(&self, now_ms: f64) -> OpeningFrame {
        let tm = &self.timings;
        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        let total = tm.total_ms.max(1.0);
        let t = (elapsed / total).min(1.0) as f32;

        if t >= 1.0 {
            return OpeningFrame {
                offset_y: 0.0,
                rotate_deg: 0.0,
                content_swapped: true,
                finished: true,
            };
        }

        let rise_ms = tm.rise_ms.clamp(1.0, total);
        let offset_y = if elapsed < rise_ms {
            -tm.rise_px * Easing::CubicOut.apply((elapsed / rise_ms) as f32)
        } else {
            let fall_len = (total - rise_ms).max(1.0);
            let fall_t = ((elapsed - rise_ms) / fall_len) as f32;
            -tm.rise_px + tm.rise_px * Easing::SineInOut.apply(fall_t)
        };

        let rotate_deg = if t < 0.5 {
            -tm.tilt_deg + 2.0 * tm.tilt_deg * (t * 2.0)
        } else {
            0.0
        };

        OpeningFrame {
            offset_y,
            rotate_deg,
            content_swapped: elapsed >= tm.swap_at_ms,
            finished: false,
        }
    }
}
