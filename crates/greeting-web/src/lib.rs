//! Browser entry points for the greeting.
//!
//! The page calls `greeting_init` once, then `greeting_tick` from its
//! `requestAnimationFrame` loop, forwarding DOM events through the other
//! exports. After each tick it reads the frame snapshot straight out of
//! WASM memory via `get_snapshot_ptr`.

pub mod presenter;
pub mod runner;
pub mod storage;

use std::cell::{Cell, RefCell};

use greeting_core::assets::sanitize_name;
use greeting_core::{
    deliver, ButtonGeometry, DismissReason, GreetingConfig, InputEvent, MotionMode,
    MotionPreference, Presenter, Proximity, Rect, Signal, Vec2,
};
use wasm_bindgen::prelude::*;

pub use presenter::JsPresenter;
pub use runner::SessionRunner;
pub use storage::LocalStorageStore;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = RefCell::new(None);
    static PRESENTER: RefCell<Option<Box<dyn Presenter>>> = RefCell::new(None);
    /// Signals waiting for the presenter, oldest first.
    static PENDING: RefCell<Vec<Signal>> = RefCell::new(Vec::new());
    static DELIVERING: Cell<bool> = Cell::new(false);
}

/// Run `f` against the runner. Calls before `greeting_init` are dropped.
/// Never hold this across a call into JS: handlers may call back in.
fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("greeting not initialized; call greeting_init() first");
                None
            }
        }
    })
}

fn push(event: InputEvent) {
    with_runner(|r| r.push_input(event));
}

/// Hand signals to the presenter with no runner borrow held. A handler
/// that triggers more signals only queues them; the outermost call
/// delivers them in order.
fn present(signals: Vec<Signal>) {
    PENDING.with(|p| p.borrow_mut().extend(signals));
    if DELIVERING.with(|d| d.replace(true)) {
        return;
    }
    loop {
        let batch = PENDING.with(|p| std::mem::take(&mut *p.borrow_mut()));
        if batch.is_empty() {
            break;
        }
        PRESENTER.with(|cell| match cell.borrow_mut().as_mut() {
            Some(presenter) => deliver(batch, presenter.as_mut()),
            None => log::debug!("no presenter; dropping {} signals", batch.len()),
        });
    }
    DELIVERING.with(|d| d.set(false));
}

fn install(mut runner: SessionRunner, presenter: Box<dyn Presenter>) {
    let initial = runner.drain_signals();
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    PRESENTER.with(|cell| *cell.borrow_mut() = Some(presenter));
    present(initial);
}

/// Same clock as `requestAnimationFrame` timestamps.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn recipient_from_url() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    let name = sanitize_name(params.get("to").as_deref());
    (!name.is_empty()).then_some(name)
}

fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

fn rect_or_none(left: f32, top: f32, width: f32, height: f32) -> Option<Rect> {
    let rect = Rect::new(left, top, width, height);
    rect.is_measurable().then_some(rect)
}

/// Start the session. `config_json` may be empty for the built-in greeting;
/// `on_signal(kind, payload)` receives everything the page should present.
/// `initial_scroll` is the intro's scroll offset at load.
#[wasm_bindgen]
pub fn greeting_init(
    config_json: &str,
    initial_scroll: f32,
    on_signal: js_sys::Function,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        GreetingConfig::builtin()
    } else {
        GreetingConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let now = now_ms();
    let seed = js_sys::Date::now().to_bits();
    let store = Box::new(LocalStorageStore::new());
    let motion = MotionPreference::load(store, prefers_reduced_motion());
    let recipient = recipient_from_url();
    let runner =
        SessionRunner::new(config, recipient.as_deref(), motion, initial_scroll, seed, now);
    install(runner, Box::new(JsPresenter::new(on_signal)));
    log::info!("greeting: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn greeting_tick(now_ms: f64) {
    if let Some(signals) = with_runner(|r| r.tick(now_ms)) {
        present(signals);
    }
}

// ---- Intro ----

#[wasm_bindgen]
pub fn greeting_scroll(pos: f32, max: f32) {
    push(InputEvent::Scroll { pos, max });
}

#[wasm_bindgen]
pub fn greeting_viewport(width: f32, height: f32) {
    push(InputEvent::Viewport { width, height });
}

#[wasm_bindgen]
pub fn greeting_envelope_size(width: f32, height: f32) {
    push(InputEvent::EnvelopeSize { width, height });
}

#[wasm_bindgen]
pub fn greeting_envelope_click() {
    push(InputEvent::EnvelopeClick);
}

#[wasm_bindgen]
pub fn greeting_skip_intro() {
    push(InputEvent::SkipIntro);
}

// ---- Ask ----

#[wasm_bindgen]
pub fn greeting_yes() {
    push(InputEvent::Yes);
}

#[wasm_bindgen]
pub fn greeting_ask_headline() -> String {
    with_runner(|r| r.session().ask_headline().to_string()).unwrap_or_default()
}

/// Proximity signal on the "no" button. Rects with a non-positive size
/// count as not laid out.
#[wasm_bindgen]
pub fn greeting_runaway(
    event_type: &str,
    placeholder: &[f32],
    detached: &[f32],
    protected: &[f32],
    viewport_width: f32,
    viewport_height: f32,
) {
    let Some(signal) = Proximity::from_event_type(event_type) else {
        log::debug!("runaway: ignoring event type {:?}", event_type);
        return;
    };
    let rect = |v: &[f32]| match v {
        [left, top, width, height] => rect_or_none(*left, *top, *width, *height),
        _ => None,
    };
    let geometry = ButtonGeometry {
        placeholder: rect(placeholder),
        detached: rect(detached),
        protected: rect(protected),
        viewport: Vec2::new(viewport_width, viewport_height),
    };
    push(InputEvent::Runaway { signal, geometry });
}

// ---- Choice ----

#[wasm_bindgen]
pub fn greeting_toggle_choice(choice_id: &str) {
    push(InputEvent::ToggleChoice {
        choice_id: choice_id.to_string(),
    });
}

/// Whether `choice_id` renders minimized because another card is expanded.
#[wasm_bindgen]
pub fn greeting_choice_minimized(choice_id: &str) -> bool {
    with_runner(|r| r.session().choices().is_minimized(choice_id)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn greeting_select_choice(choice_id: &str) {
    push(InputEvent::SelectChoice {
        choice_id: choice_id.to_string(),
    });
}

// ---- PS modal ----

/// `focused_id` is the id of the element holding focus, if any.
#[wasm_bindgen]
pub fn greeting_open_ps(focused_id: Option<String>) {
    let now = now_ms();
    let event = InputEvent::OpenPs {
        focused: focused_id,
    };
    if let Some(signals) = with_runner(|r| r.apply_now(event, now)) {
        present(signals);
    }
}

/// `reason` is "close", "backdrop" or a keyboard `key` value.
#[wasm_bindgen]
pub fn greeting_dismiss_ps(reason: &str) {
    let reason = match reason {
        "close" => DismissReason::CloseButton,
        "backdrop" => DismissReason::Backdrop,
        key => match DismissReason::from_key(key) {
            Some(r) => r,
            None => return,
        },
    };
    let now = now_ms();
    if let Some(signals) = with_runner(|r| r.apply_now(InputEvent::DismissPs(reason), now)) {
        present(signals);
    }
}

// ---- Motion preference ----

#[wasm_bindgen]
pub fn greeting_set_motion_mode(mode: &str) -> Result<(), JsValue> {
    let mode: MotionMode = mode
        .parse()
        .map_err(|_| JsValue::from_str(&format!("unknown motion mode {:?}", mode)))?;
    push(InputEvent::SetMotionMode(mode));
    Ok(())
}

#[wasm_bindgen]
pub fn greeting_reduced_motion_changed(reduced: bool) {
    push(InputEvent::ReducedMotionChanged(reduced));
}

#[wasm_bindgen]
pub fn greeting_motion_mode() -> String {
    with_runner(|r| r.session().motion_mode().as_str().to_string()).unwrap_or_default()
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_snapshot_ptr() -> *const f32 {
    with_runner(|r| r.snapshot_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_snapshot_len() -> u32 {
    with_runner(|r| r.snapshot_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_protocol_version() -> u32 {
    greeting_core::PROTOCOL_VERSION
}
