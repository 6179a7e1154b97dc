//! Envelope pose along the heart path.
//!
//! [`compute_pose`] is a pure map from progress to pose; [`ProgressPursuit`]
//! is the per-frame first-order follower that keeps the rendered progress
//! from snapping when the scroll target jumps.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::easing::{lerp, lerp_vec2, Easing};
use super::heart::{heart_xy, HEART_HALF_HEIGHT, HEART_HALF_WIDTH};
use crate::core::time::{frame_dt_between, smoothing_factor};

/// Size assumed for the envelope before it has been measured.
pub const DEFAULT_ENVELOPE_SIZE: Vec2 = Vec2::new(340.0, 216.0);

/// On-screen transform of the envelope, relative to the viewport center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePose {
    pub pos: Vec2,
    pub scale: f32,
    pub rotate_deg: f32,
}

impl EnvelopePose {
    pub const IDENTITY: EnvelopePose = EnvelopePose {
        pos: Vec2::ZERO,
        scale: 1.0,
        rotate_deg: 0.0,
    };
}

impl Default for EnvelopePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Shape of the flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathParams {
    /// Progress at which the flight ends and the landing blend begins.
    pub landing_start: f32,
    /// Gap kept between the envelope and the viewport edge.
    pub margin: f32,
    /// Scale while far along the path (before depth modulation).
    pub far_scale: f32,
    /// Depth modulation range added on top of `far_scale`.
    pub depth_range: f32,
    pub land_scale_from: f32,
    pub land_scale_to: f32,
    pub land_rotate_deg: f32,
    /// Peak of the decorative scale wobble. Zero disables it.
    pub wobble: f32,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            landing_start: 0.78,
            margin: 18.0,
            far_scale: 0.88,
            depth_range: 0.22,
            land_scale_from: 0.58,
            land_scale_to: 1.85,
            land_rotate_deg: -8.0,
            wobble: 0.03,
        }
    }
}

const TANGENT_DELTA: f32 = 0.002 * TAU;
const WOBBLE_WINDOW: (f32, f32) = (0.2, 0.7);
const WOBBLE_CYCLES: f32 = 3.0;

/// Curve-units to pixels so the whole heart fits inside the viewport.
fn fit_scale(viewport: Vec2, envelope: Vec2, margin: f32) -> f32 {
    let half = viewport / 2.0 - envelope / 2.0 - Vec2::splat(margin);
    let scale = (half.x / HEART_HALF_WIDTH).min(half.y / HEART_HALF_HEIGHT).max(2.0);
    if scale.is_finite() {
        scale
    } else {
        8.0
    }
}

fn wobble_term(progress: f32, amplitude: f32) -> f32 {
    let (lo, hi) = WOBBLE_WINDOW;
    if amplitude == 0.0 || progress <= lo || progress >= hi {
        return 0.0;
    }
    let local = (progress - lo) / (hi - lo);
    amplitude * (local * PI).sin() * (local * WOBBLE_CYCLES * TAU).sin()
}

/// Pose for `progress` in `[0, 1]` (clamped). `wobble` enables the
/// decorative scale term.
pub fn compute_pose(
    progress: f32,
    viewport: Vec2,
    envelope: Vec2,
    params: &PathParams,
    wobble: bool,
) -> EnvelopePose {
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let landing_start = params.landing_start.clamp(0.01, 1.0);

    let flight = Easing::SineInOut.apply(p / landing_start);
    let angle = flight * TAU;
    let here = heart_xy(angle);
    let ahead = heart_xy(angle + TANGENT_DELTA);

    let k = fit_scale(viewport, envelope, params.margin);
    // Screen space is y-down.
    let pos = Vec2::new(here.x, -here.y) * k;
    let next = Vec2::new(ahead.x, -ahead.y) * k;
    let heading = (next.y - pos.y).atan2(next.x - pos.x).to_degrees();
    let depth = params.far_scale
        + params.depth_range * (1.0 - (here.y / HEART_HALF_HEIGHT).clamp(-1.0, 1.0));
    let depth = if wobble {
        depth + wobble_term(p, params.wobble)
    } else {
        depth
    };

    if p <= landing_start {
        return EnvelopePose {
            pos,
            scale: depth,
            rotate_deg: heading,
        };
    }

    let land_span = (1.0 - landing_start).max(f32::EPSILON);
    let land = Easing::CubicOut.apply((p - landing_start) / land_span);
    let target_scale = lerp(params.land_scale_from, params.land_scale_to, land);
    EnvelopePose {
        pos: lerp_vec2(pos, Vec2::ZERO, land),
        scale: lerp(depth, target_scale, land),
        rotate_deg: lerp(heading, params.land_rotate_deg, land),
    }
}

/// Follows a moving target with `current += (target - current) * (1 - e^(-rate*dt))`.
#[derive(Debug, Clone)]
pub struct ProgressPursuit {
    current: f32,
    rate: f32,
    last_ts: Option<f64>,
}

/// Distance under which the pursuit snaps onto its target.
pub const PURSUIT_SNAP: f32 = 0.001;

impl ProgressPursuit {
    pub fn new(rate: f32) -> Self {
        Self {
            current: 0.0,
            rate,
            last_ts: None,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Jump straight to `value` (skip / motion off).
    pub fn snap_to(&mut self, value: f32) {
        self.current = value;
    }

    /// Forget the frame clock, e.g. after the loop was paused.
    pub fn reset_clock(&mut self) {
        self.last_ts = None;
    }

    /// Advance one frame toward `target`.
    pub fn tick(&mut self, target: f32, now_ms: f64) -> f32 {
        let last = self.last_ts.unwrap_or(now_ms);
        self.last_ts = Some(now_ms);
        // The first frame still moves by the minimum step.
        let dt = frame_dt_between(last, now_ms).max(crate::core::time::MIN_FRAME_DT);
        let a = smoothing_factor(self.rate, dt);
        let next = self.current + (target - self.current) * a;
        self.current = if (target - next).abs() < PURSUIT_SNAP {
            target
        } else {
            next
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

    fn pose(p: f32) -> EnvelopePose {
        compute_pose(p, VIEWPORT, DEFAULT_ENVELOPE_SIZE, &PathParams::default(), false)
    }

    #[test]
    fn landed_pose_is_centered() {
        let landed = pose(1.0);
        assert!(landed.pos.length() < 1e-3);
        assert!((landed.scale - 1.85).abs() < 1e-4);
        assert!((landed.rotate_deg + 8.0).abs() < 1e-4);
    }

    #[test]
    fn start_pose_sits_on_the_curve() {
        let k = fit_scale(VIEWPORT, DEFAULT_ENVELOPE_SIZE, 18.0);
        let start = pose(0.0);
        // heart_xy(0) = (0, 5); y flips for screen space.
        assert!(start.pos.x.abs() < 1e-3);
        assert!((start.pos.y + 5.0 * k).abs() < 1e-2);
    }

    #[test]
    fn pose_stays_inside_viewport() {
        let half = VIEWPORT / 2.0;
        for i in 0..=100 {
            let p = pose(i as f32 / 100.0);
            assert!(p.pos.x.abs() <= half.x && p.pos.y.abs() <= half.y, "p={} pos={:?}", i, p.pos);
            assert!(p.scale.is_finite() && p.rotate_deg.is_finite());
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(pose(-2.0), pose(0.0));
        assert_eq!(pose(5.0), pose(1.0));
    }

    #[test]
    fn tiny_viewport_uses_minimum_fit() {
        let p = compute_pose(0.0, Vec2::ZERO, DEFAULT_ENVELOPE_SIZE, &PathParams::default(), false);
        assert!((p.pos.y + 10.0).abs() < 1e-3, "min scale 2 * y 5, got {:?}", p.pos);
    }

    #[test]
    fn wobble_only_inside_window() {
        let params = PathParams::default();
        let at = |p: f32, w: bool| {
            compute_pose(p, VIEWPORT, DEFAULT_ENVELOPE_SIZE, &params, w).scale
        };
        assert_eq!(at(0.1, true), at(0.1, false));
        assert_eq!(at(0.9, true), at(0.9, false));
        assert!((at(0.33, true) - at(0.33, false)).abs() > 0.0);
    }

    #[test]
    fn pursuit_approaches_without_overshoot() {
        let mut pursuit = ProgressPursuit::new(16.0);
        let mut last = 0.0;
        let mut ts = 0.0;
        for _ in 0..30 {
            ts += 16.0;
            let v = pursuit.tick(1.0, ts);
            assert!(v >= last && v <= 1.0);
            last = v;
        }
        assert!(last > 0.9);
    }

    #[test]
    fn pursuit_snaps_when_close() {
        let mut pursuit = ProgressPursuit::new(16.0);
        pursuit.snap_to(0.9995);
        assert_eq!(pursuit.tick(1.0, 0.0), 1.0);
    }

    #[test]
    fn pursuit_is_frame_rate_independent() {
        let mut fast = ProgressPursuit::new(16.0);
        let mut slow = ProgressPursuit::new(16.0);
        fast.tick(0.0, 0.0);
        slow.tick(0.0, 0.0);
        for i in 1..=4 {
            fast.tick(1.0, i as f64 * 10.0);
        }
        for i in 1..=2 {
            slow.tick(1.0, i as f64 * 20.0);
        }
        assert!((fast.current() - slow.current()).abs() < 1e-4);
    }
}
