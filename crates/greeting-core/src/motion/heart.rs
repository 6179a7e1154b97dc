//! Parametric heart curve the envelope flies along.

use glam::Vec2;

/// Half-width of the curve in curve units (x spans `[-16, 16]`).
pub const HEART_HALF_WIDTH: f32 = 16.0;
/// Vertical extent used when fitting the curve into a viewport.
pub const HEART_HALF_HEIGHT: f32 = 17.0;

/// Point on the heart at `angle` radians. Closed over `[0, 2π]`, y up.
pub fn heart_xy(angle: f32) -> Vec2 {
    let s = angle.sin();
    Vec2::new(
        16.0 * s * s * s,
        13.0 * angle.cos()
            - 5.0 * (2.0 * angle).cos()
            - 2.0 * (3.0 * angle).cos()
            - (4.0 * angle).cos(),
    )
}
