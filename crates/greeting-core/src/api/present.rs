//! Contract for the presentational collaborators.
//!
//! The core never renders. Media with fallback, particle overlays and
//! focus handling live on the host side behind this trait; every method
//! defaults to doing nothing so a host implements only what it shows.

use glam::Vec2;

use super::types::{EffectPreset, Signal};
use crate::assets::config::{ChoiceOption, MediaSlot};
use crate::core::state::Screen;
use crate::prefs::motion_mode::MotionMode;

pub trait Presenter {
    fn screen_changed(&mut self, _screen: Screen) {}

    /// Show `slot.src`, swapping to `slot.fallback` if it fails to load.
    fn show_media(&mut self, _slot: &MediaSlot) {}

    fn run_effect(&mut self, _preset: EffectPreset, _duration_ms: u32, _lite: bool) {}

    fn button_moved(&mut self, _top_left: Vec2) {}

    fn restore_focus(&mut self, _element_id: &str) {}

    fn motion_mode_changed(&mut self, _mode: MotionMode) {}

    /// Other cards render minimized while one is expanded.
    fn choice_expanded(&mut self, _choice: Option<&ChoiceOption>) {}
}

/// Hand every signal to `presenter`, in order.
pub fn deliver<P: Presenter + ?Sized>(
    signals: impl IntoIterator<Item = Signal>,
    presenter: &mut P,
) {
    for signal in signals {
        match signal {
            Signal::ScreenChanged(screen) => presenter.screen_changed(screen),
            Signal::ShowMedia(slot) => presenter.show_media(&slot),
            Signal::RunEffect {
                preset,
                duration_ms,
                lite,
            } => presenter.run_effect(preset, duration_ms, lite),
            Signal::ButtonMoved(pos) => presenter.button_moved(pos),
            Signal::RestoreFocus(id) => presenter.restore_focus(&id),
            Signal::MotionModeChanged(mode) => presenter.motion_mode_changed(mode),
            Signal::ChoiceExpanded(choice) => presenter.choice_expanded(choice.as_ref()),
        }
    }
}
