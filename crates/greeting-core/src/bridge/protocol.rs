/// Per-frame snapshot the JS side reads straight out of WASM memory.
/// Must stay in sync with the TypeScript reader.
///
/// Layout (all values f32):
/// ```text
/// [0] frame counter      [8]  scroll intensity (0..1)
/// [1] screen code        [9]  rendered intro progress
/// [2] intro phase code   [10] ask content swapped (0/1)
/// [3] envelope ready     [11] runaway escaped (0/1)
/// [4] pose x             [12] runaway left
/// [5] pose y             [13] runaway top
/// [6] pose scale         [14] PS modal open (0/1)
/// [7] pose rotation deg  [15] motion mode code
/// ```
use bytemuck::{Pod, Zeroable};

/// Protocol version, bumped whenever the layout changes.
pub const PROTOCOL_VERSION: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameSnapshot {
    pub frame: f32,
    pub screen: f32,
    pub intro_phase: f32,
    pub envelope_ready: f32,
    pub pose_x: f32,
    pub pose_y: f32,
    pub pose_scale: f32,
    pub pose_rotate_deg: f32,
    pub v_norm: f32,
    pub progress: f32,
    pub content_swapped: f32,
    pub button_escaped: f32,
    pub button_left: f32,
    pub button_top: f32,
    pub ps_open: f32,
    pub motion_mode: f32,
}

impl FrameSnapshot {
    pub const FLOATS: usize = 16;

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

#[inline]
pub fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
