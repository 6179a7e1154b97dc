// motion/easing.rs
//
// Pure easing curves used by the envelope flight and opening animation.

use std::f32::consts::PI;

/// Easing curve applied to a normalized time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow end.
    QuadOut,
    /// Stronger slow end.
    CubicOut,
    /// Sine wave easing, slow start and end.
    SineInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::CubicOut, Easing::SineInOut] {
            assert!(e.apply(0.0).abs() < 1e-6, "{:?} at 0", e);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", e);
        }
    }

    #[test]
    fn cubic_out_front_loads() {
        let mid = Easing::CubicOut.apply(0.5);
        assert!(mid > 0.8, "CubicOut at 0.5 should be 0.875, got {}", mid);
    }

    #[test]
    fn sine_in_out_is_symmetric() {
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::SineInOut.apply(0.25);
        let b = Easing::SineInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn input_outside_unit_is_clamped() {
        assert_eq!(Easing::Linear.apply(-3.0), 0.0);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
    }

    #[test]
    fn lerp_midpoint() {
        assert!((lerp(100.0, 200.0, 0.5) - 150.0).abs() < 0.001);
    }
}
