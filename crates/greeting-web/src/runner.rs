use greeting_core::{GreetingConfig, InputEvent, InputQueue, MotionPreference, Session, Signal};

/// Wires a [`Session`] to the browser frame loop.
///
/// The page keeps a `thread_local!` SessionRunner and talks to it through
/// the free `#[wasm_bindgen]` functions in `lib.rs`, because wasm-bindgen
/// cannot export the session type directly. The runner never calls into
/// JS: every step hands back the signals it produced and the caller
/// delivers them once the runner is released.
pub struct SessionRunner {
    session: Session,
    input: InputQueue,
}

impl SessionRunner {
    pub fn new(
        config: GreetingConfig,
        recipient: Option<&str>,
        motion: MotionPreference,
        initial_scroll: f32,
        seed: u64,
        now_ms: f64,
    ) -> Self {
        Self {
            session: Session::new(config, recipient, motion, initial_scroll, seed, now_ms),
            input: InputQueue::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply an input event now. Used for events whose host-side
    /// handling must not wait a frame, like focus bookkeeping.
    pub fn apply_now(&mut self, event: InputEvent, now_ms: f64) -> Vec<Signal> {
        self.session.handle(event, now_ms);
        self.session.drain_signals()
    }

    /// Run one frame: drain input, advance timers and animators.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Signal> {
        self.session.tick(now_ms, &mut self.input);
        self.session.drain_signals()
    }

    /// Signals queued outside a frame, such as the initial screen.
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        self.session.drain_signals()
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn snapshot_ptr(&self) -> *const f32 {
        self.session.snapshot().as_floats().as_ptr()
    }

    pub fn snapshot_len(&self) -> u32 {
        self.session.snapshot().as_floats().len() as u32
    }
}
