use greeting_core::assets::{ChoiceOption, MediaSlot};
use greeting_core::{EffectPreset, MotionMode, Presenter, Screen, Vec2};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsValue;

/// Forwards signals to a single JS callback: `callback(kind, payload)`.
pub struct JsPresenter {
    callback: Function,
}

impl JsPresenter {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }

    fn emit(&self, kind: &str, fields: &[(&str, JsValue)]) {
        let payload = Object::new();
        for (name, value) in fields {
            if let Err(err) = Reflect::set(&payload, &JsValue::from_str(name), value) {
                log::warn!("signal {}: cannot set {}: {:?}", kind, name, err);
            }
        }
        if let Err(err) = self.callback.call2(&JsValue::NULL, &JsValue::from_str(kind), &payload) {
            log::error!("signal {} handler threw: {:?}", kind, err);
        }
    }
}

impl Presenter for JsPresenter {
    fn screen_changed(&mut self, screen: Screen) {
        self.emit("screen", &[("screen", JsValue::from_str(screen.as_str()))]);
    }

    fn show_media(&mut self, slot: &MediaSlot) {
        self.emit(
            "media",
            &[
                ("src", JsValue::from_str(&slot.src)),
                ("fallback", JsValue::from_str(&slot.fallback)),
            ],
        );
    }

    fn run_effect(&mut self, preset: EffectPreset, duration_ms: u32, lite: bool) {
        self.emit(
            "effect",
            &[
                ("preset", JsValue::from_str(preset.as_str())),
                ("durationMs", JsValue::from(duration_ms)),
                ("lite", JsValue::from_bool(lite)),
            ],
        );
    }

    fn button_moved(&mut self, top_left: Vec2) {
        self.emit(
            "buttonMoved",
            &[
                ("left", JsValue::from_f64(top_left.x as f64)),
                ("top", JsValue::from_f64(top_left.y as f64)),
            ],
        );
    }

    fn restore_focus(&mut self, element_id: &str) {
        self.emit("restoreFocus", &[("id", JsValue::from_str(element_id))]);
    }

    fn motion_mode_changed(&mut self, mode: MotionMode) {
        self.emit("motionMode", &[("mode", JsValue::from_str(mode.as_str()))]);
    }

    fn choice_expanded(&mut self, choice: Option<&ChoiceOption>) {
        let fields = match choice {
            Some(c) => vec![
                ("id", JsValue::from_str(&c.id)),
                ("label", JsValue::from_str(&c.label)),
                ("detail", JsValue::from_str(c.description_or_label())),
            ],
            None => vec![("id", JsValue::NULL)],
        };
        self.emit("choiceExpanded", &fields);
    }
}
