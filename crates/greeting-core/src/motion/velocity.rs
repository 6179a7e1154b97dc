//! Scroll velocity estimation.
//!
//! Turns an irregular `(position, timestamp)` stream into a smoothed
//! velocity and a bounded intensity in `[0, 1]`. Call [`ScrollVelocity::step`]
//! when a new position arrived this frame and [`ScrollVelocity::decay`]
//! when it did not.

use serde::{Deserialize, Serialize};

use crate::core::time::{frame_dt_between, smoothing_factor};

/// Tuning for the estimator. Velocities are in position units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityParams {
    /// Smoothing rate while samples keep arriving.
    pub lambda: f32,
    /// Relaxation rate toward zero when nothing moved.
    pub lambda_decay: f32,
    /// Speed that maps to intensity 1.
    pub max_velocity: f32,
    /// Dead zone: speeds at or below this map to intensity 0.
    pub min_threshold: f32,
}

impl Default for VelocityParams {
    fn default() -> Self {
        Self {
            lambda: 18.0,
            lambda_decay: 9.0,
            max_velocity: 2800.0,
            min_threshold: 40.0,
        }
    }
}

/// Rolling estimator snapshot. Timestamps are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollVelocity {
    pub last_pos: f32,
    pub last_ts: f64,
    /// Instantaneous derivative of the latest step. Zero while decaying.
    pub v_raw: f32,
    pub v_smooth: f32,
    /// `|v_smooth|` mapped through the dead zone and ceiling to `[0, 1]`.
    pub v_norm: f32,
}

impl ScrollVelocity {
    pub fn new(pos: f32, ts: f64) -> Self {
        Self {
            last_pos: pos,
            last_ts: ts,
            v_raw: 0.0,
            v_smooth: 0.0,
            v_norm: 0.0,
        }
    }

    /// Feed a genuine new sample.
    pub fn step(&self, next_pos: f32, next_ts: f64, params: &VelocityParams) -> Self {
        let dt = frame_dt_between(self.last_ts, next_ts);
        if dt <= 0.0 {
            return Self {
                last_pos: next_pos,
                last_ts: next_ts,
                ..*self
            };
        }

        let v_raw = (next_pos - self.last_pos) / dt;
        let a = smoothing_factor(params.lambda, dt);
        let v_smooth = self.v_smooth + (v_raw - self.v_smooth) * a;

        Self {
            last_pos: next_pos,
            last_ts: next_ts,
            v_raw,
            v_smooth,
            v_norm: normalize(v_smooth, params),
        }
    }

    /// Nothing moved this frame: coast toward zero.
    pub fn decay(&self, next_ts: f64, params: &VelocityParams) -> Self {
        let dt = frame_dt_between(self.last_ts, next_ts);
        if dt <= 0.0 {
            return Self {
                last_ts: next_ts,
                ..*self
            };
        }

        let a = smoothing_factor(params.lambda_decay, dt);
        let v_smooth = self.v_smooth - self.v_smooth * a;

        Self {
            last_pos: self.last_pos,
            last_ts: next_ts,
            v_raw: 0.0,
            v_smooth,
            v_norm: normalize(v_smooth, params),
        }
    }
}

fn normalize(v_smooth: f32, params: &VelocityParams) -> f32 {
    if params.max_velocity <= 0.0 || v_smooth.is_nan() {
        return 0.0;
    }
    let speed = v_smooth.abs();
    if speed <= params.min_threshold {
        return 0.0;
    }
    let range = (params.max_velocity - params.min_threshold).max(1.0);
    ((speed - params.min_threshold) / range).clamp(0.0, 1.0)
}

/// Minimum position change that counts as a new sample.
pub const MOVE_EPSILON: f32 = 0.1;

/// Per-frame driver: holds the latest position reported by the scroll
/// listener and decides each tick between `step` and `decay`.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    state: ScrollVelocity,
    target_pos: f32,
    params: VelocityParams,
}

impl ScrollTracker {
    pub fn new(pos: f32, ts: f64, params: VelocityParams) -> Self {
        Self {
            state: ScrollVelocity::new(pos, ts),
            target_pos: pos,
            params,
        }
    }

    /// Record the listener's latest position. Cheap; no math happens here.
    pub fn observe(&mut self, pos: f32) {
        self.target_pos = pos;
    }

    pub fn tick(&mut self, now_ms: f64) -> &ScrollVelocity {
        self.state = if (self.target_pos - self.state.last_pos).abs() > MOVE_EPSILON {
            self.state.step(self.target_pos, now_ms, &self.params)
        } else {
            self.state.decay(now_ms, &self.params)
        };
        &self.state
    }

    pub fn state(&self) -> &ScrollVelocity {
        &self.state
    }

    pub fn position(&self) -> f32 {
        self.target_pos
    }
}
