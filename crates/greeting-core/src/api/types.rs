use glam::Vec2;

use crate::assets::config::{ChoiceOption, MediaSlot};
use crate::core::state::Screen;
use crate::prefs::motion_mode::MotionMode;

/// Named preset for the decorative particle overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectPreset {
    /// Dense burst of rising hearts.
    Celebrate,
    /// Sparse background hearts.
    Ambient,
}

impl EffectPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectPreset::Celebrate => "celebrate",
            EffectPreset::Ambient => "ambient",
        }
    }
}

/// Something the host should present. Queued during a frame, delivered
/// in order through a [`Presenter`](crate::api::present::Presenter).
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    ScreenChanged(Screen),
    ShowMedia(MediaSlot),
    /// Fire-and-forget; nothing comes back.
    RunEffect {
        preset: EffectPreset,
        duration_ms: u32,
        lite: bool,
    },
    /// New top-left of the detached runaway button.
    ButtonMoved(Vec2),
    /// Give keyboard focus back to this element after the modal closed.
    RestoreFocus(String),
    MotionModeChanged(MotionMode),
    /// The expanded choice card changed; `None` collapses all cards.
    ChoiceExpanded(Option<ChoiceOption>),
}
