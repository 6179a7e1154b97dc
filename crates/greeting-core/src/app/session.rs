//! The application shell: owns the screen state and everything whose
//! lifetime is tied to a screen visit.
//!
//! Per frame, `tick` applies queued input in receipt order, fires due
//! timers, then advances the intro (velocity before pose). Leaving a
//! screen bumps the visit generation, so timers armed during that visit
//! can never fire afterwards.

use std::borrow::Cow;

use glam::Vec2;

use super::choice::ChoicePicker;
use super::modal::ModalFocus;
use crate::api::types::{EffectPreset, Signal};
use crate::assets::config::GreetingConfig;
use crate::assets::recipient::ask_headline;
use crate::bridge::protocol::{flag, FrameSnapshot};
use crate::core::state::{transition, AppEvent, AppState, Screen};
use crate::core::time::{Generation, Timeout};
use crate::input::queue::{InputEvent, InputQueue};
use crate::motion::intro::{ClickOutcome, IntroController, IntroPhase};
use crate::motion::pose::EnvelopePose;
use crate::prefs::motion_mode::{MotionMode, MotionPreference, SubscriptionId};
use crate::runaway::button::RunawayButton;

pub struct Session {
    config: GreetingConfig,
    ask_headline: String,
    state: AppState,
    motion: MotionPreference,
    visits: Generation,
    /// Alive only while the intro screen is showing.
    intro: Option<IntroController>,
    runaway: RunawayButton,
    modal: ModalFocus,
    choices: ChoicePicker,
    celebrate_timer: Option<Timeout>,
    viewport: Option<Vec2>,
    envelope_size: Option<Vec2>,
    content_swapped: bool,
    v_norm: f32,
    progress: f32,
    pose: EnvelopePose,
    signals: Vec<Signal>,
    snapshot: FrameSnapshot,
    frame: u64,
}

impl Session {
    /// `recipient` is the raw `to` query parameter, if any.
    /// `initial_scroll` is the intro's scroll offset at mount.
    pub fn new(
        config: GreetingConfig,
        recipient: Option<&str>,
        motion: MotionPreference,
        initial_scroll: f32,
        seed: u64,
        now_ms: f64,
    ) -> Self {
        let headline = ask_headline(&config.texts, recipient);
        let mut intro =
            IntroController::new(config.intro.clone(), motion.mode(), initial_scroll, now_ms);
        intro.set_reduced_motion(motion.os_prefers_reduced());
        let runaway = RunawayButton::new(config.runaway, seed);

        let mut session = Self {
            config,
            ask_headline: headline,
            state: AppState::new(),
            motion,
            visits: Generation::new(),
            intro: Some(intro),
            runaway,
            modal: ModalFocus::new(),
            choices: ChoicePicker::default(),
            celebrate_timer: None,
            viewport: None,
            envelope_size: None,
            content_swapped: false,
            v_norm: 0.0,
            progress: 0.0,
            pose: EnvelopePose::IDENTITY,
            signals: Vec::new(),
            snapshot: FrameSnapshot::default(),
            frame: 0,
        };
        session.signals.push(Signal::ScreenChanged(Screen::Intro));
        session.refresh_snapshot();
        session
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    pub fn ask_headline(&self) -> &str {
        &self.ask_headline
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.motion.mode()
    }

    pub fn subscribe_motion(
        &mut self,
        listener: impl FnMut(MotionMode) + 'static,
    ) -> SubscriptionId {
        self.motion.subscribe(listener)
    }

    pub fn unsubscribe_motion(&mut self, id: SubscriptionId) -> bool {
        self.motion.unsubscribe(id)
    }

    pub fn intro(&self) -> Option<&IntroController> {
        self.intro.as_ref()
    }

    pub fn runaway(&self) -> &RunawayButton {
        &self.runaway
    }

    pub fn choices(&self) -> &ChoicePicker {
        &self.choices
    }

    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    pub fn celebrate_remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.celebrate_timer.as_ref().map(|t| t.remaining_ms(now_ms))
    }

    /// Signals queued since the last drain, oldest first.
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    /// Apply one transition event. Returns whether the state changed.
    pub fn dispatch(&mut self, event: AppEvent, now_ms: f64) -> bool {
        let next = match transition(&self.state, &event) {
            Cow::Borrowed(_) => return false,
            Cow::Owned(next) => next,
        };
        let previous = std::mem::replace(&mut self.state, next);
        if previous.screen != self.state.screen {
            self.enter_screen(previous.screen, now_ms);
        }
        true
    }

    /// One animation frame.
    pub fn tick(&mut self, now_ms: f64, input: &mut InputQueue) {
        self.frame += 1;

        for event in input.drain() {
            self.handle(event, now_ms);
        }

        let celebrate_due = match self.celebrate_timer.as_mut() {
            Some(timer) => timer.poll(now_ms, &self.visits),
            None => false,
        };
        if celebrate_due {
            self.celebrate_timer = None;
            self.dispatch(AppEvent::CelebrateDone, now_ms);
        }

        let mut opened = false;
        if let Some(intro) = self.intro.as_mut() {
            let frame = intro.tick(now_ms);
            self.v_norm = frame.v_norm;
            self.progress = frame.progress;
            self.pose = frame.pose;
            if let Some(opening) = frame.opening {
                self.content_swapped |= opening.content_swapped;
            }
            opened = frame.opened;
        }
        if opened {
            self.dispatch(AppEvent::OpenEnvelope, now_ms);
        }

        self.refresh_snapshot();
    }

    /// Apply one input event right away.
    pub fn handle(&mut self, event: InputEvent, now_ms: f64) {
        match event {
            InputEvent::Scroll { pos, max } => {
                if let Some(intro) = self.intro.as_mut() {
                    intro.on_scroll(pos, max);
                }
            }
            InputEvent::Viewport { width, height } => {
                let size = Vec2::new(width, height);
                self.viewport = Some(size);
                if let Some(intro) = self.intro.as_mut() {
                    intro.set_viewport(size);
                }
            }
            InputEvent::EnvelopeSize { width, height } => {
                let measured = width > 0.0 && height > 0.0;
                self.envelope_size = measured.then_some(Vec2::new(width, height));
                if let Some(intro) = self.intro.as_mut() {
                    intro.set_envelope_size(self.envelope_size);
                }
            }
            InputEvent::EnvelopeClick => {
                let outcome = match self.intro.as_mut() {
                    Some(intro) => intro.click(now_ms),
                    None => ClickOutcome::Ignored,
                };
                log::debug!("envelope click: {:?}", outcome);
                if outcome == ClickOutcome::Opened {
                    self.content_swapped = true;
                    self.dispatch(AppEvent::OpenEnvelope, now_ms);
                }
            }
            InputEvent::SkipIntro => {
                if let Some(intro) = self.intro.as_mut() {
                    intro.skip();
                }
            }
            InputEvent::Yes => {
                self.dispatch(AppEvent::Yes, now_ms);
            }
            InputEvent::Runaway { signal, geometry } => {
                if self.state.screen != Screen::Ask {
                    return;
                }
                let reaction = self.runaway.on_signal(signal, &geometry, now_ms);
                log::debug!("runaway {:?}: {:?}", signal, reaction);
                if let Some(pos) = reaction.position() {
                    self.signals.push(Signal::ButtonMoved(pos));
                }
            }
            InputEvent::ToggleChoice { choice_id } => {
                if self.state.screen != Screen::Choice || self.config.choice(&choice_id).is_none() {
                    return;
                }
                self.choices.toggle(&choice_id);
                let expanded = self.choices.expanded().and_then(|id| self.config.choice(id));
                self.signals.push(Signal::ChoiceExpanded(expanded.cloned()));
            }
            InputEvent::SelectChoice { choice_id } => {
                if self.config.choice(&choice_id).is_none() {
                    log::warn!("unknown choice id {:?}", choice_id);
                    return;
                }
                self.dispatch(AppEvent::SelectChoice { choice_id }, now_ms);
            }
            InputEvent::OpenPs { focused } => {
                if self.dispatch(AppEvent::OpenPs, now_ms) {
                    self.modal.open(focused);
                }
            }
            InputEvent::DismissPs(reason) => {
                if self.dispatch(AppEvent::ClosePs, now_ms) {
                    log::debug!("PS dismissed via {:?}", reason);
                    if let Some(id) = self.modal.close() {
                        self.signals.push(Signal::RestoreFocus(id));
                    }
                }
            }
            InputEvent::SetMotionMode(mode) => {
                let before = self.motion.mode();
                self.motion.set(mode);
                self.motion_changed(before);
            }
            InputEvent::ReducedMotionChanged(reduced) => {
                let before = self.motion.mode();
                self.motion.on_reduced_motion_change(reduced);
                if let Some(intro) = self.intro.as_mut() {
                    intro.set_reduced_motion(reduced);
                }
                self.motion_changed(before);
            }
        }
    }

    fn motion_changed(&mut self, before: MotionMode) {
        let mode = self.motion.mode();
        if mode == before {
            return;
        }
        if let Some(intro) = self.intro.as_mut() {
            intro.set_motion_mode(mode);
        }
        self.signals.push(Signal::MotionModeChanged(mode));
    }

    fn enter_screen(&mut self, from: Screen, now_ms: f64) {
        let screen = self.state.screen;
        let ticket = self.visits.advance();
        log::info!("screen {} -> {}", from, screen);

        // Tear down whatever belonged to the previous visit.
        if from == Screen::Intro {
            self.intro = None;
            self.content_swapped = true;
            self.v_norm = 0.0;
            self.progress = 1.0;
            self.pose = EnvelopePose::IDENTITY;
        }
        self.celebrate_timer = None;
        self.choices.clear();

        match screen {
            Screen::Ask => self.runaway.reset(),
            Screen::Celebrate => {
                let duration = self.config.timings.celebrate_ms;
                self.celebrate_timer = Some(Timeout::new(now_ms, duration, ticket));
            }
            Screen::Intro | Screen::Choice | Screen::Final => {}
        }

        self.signals.push(Signal::ScreenChanged(screen));
        if let Some(slot) = self.config.media.for_screen(screen) {
            self.signals.push(Signal::ShowMedia(slot.clone()));
        }
        if let Some((preset, duration_ms)) = self.effect_for(screen) {
            let mode = self.motion.mode();
            if mode.animates() {
                self.signals.push(Signal::RunEffect {
                    preset,
                    duration_ms,
                    lite: mode == MotionMode::Lite,
                });
            }
        }
    }

    fn effect_for(&self, screen: Screen) -> Option<(EffectPreset, u32)> {
        let timings = &self.config.timings;
        match screen {
            Screen::Celebrate => Some((EffectPreset::Celebrate, timings.celebrate_effect_ms)),
            Screen::Choice | Screen::Final => {
                Some((EffectPreset::Ambient, timings.ambient_effect_ms))
            }
            Screen::Intro | Screen::Ask => None,
        }
    }

    fn refresh_snapshot(&mut self) {
        let (phase, ready) = match &self.intro {
            Some(intro) => (intro.phase(), !intro.envelope_disabled()),
            None => (IntroPhase::Opened, false),
        };
        let button = self.runaway.position().unwrap_or(Vec2::ZERO);
        self.snapshot = FrameSnapshot {
            frame: self.frame as f32,
            screen: self.state.screen.code() as f32,
            intro_phase: phase.code() as f32,
            envelope_ready: flag(ready),
            pose_x: self.pose.pos.x,
            pose_y: self.pose.pos.y,
            pose_scale: self.pose.scale,
            pose_rotate_deg: self.pose.rotate_deg,
            v_norm: self.v_norm,
            progress: self.progress,
            content_swapped: flag(self.content_swapped),
            button_escaped: flag(self.runaway.is_escaped()),
            button_left: button.x,
            button_top: button.y,
            ps_open: flag(self.state.is_ps_open),
            motion_mode: self.motion.mode().code() as f32,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modal::DismissReason;
    use crate::prefs::store::MemoryStore;
    use crate::runaway::button::{ButtonGeometry, Proximity};
    use crate::runaway::geom::Rect;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session_with(mode: Option<MotionMode>) -> Session {
        let store = match mode {
            Some(m) => MemoryStore::new().with_value(crate::prefs::MOTION_MODE_KEY, m.as_str()),
            None => MemoryStore::new(),
        };
        let motion = MotionPreference::load(Box::new(store), false);
        let config = GreetingConfig::builtin();
        let mut s = Session::new(config, Some("  Anna   Maria "), motion, 0.0, 42, 0.0);
        s.handle(InputEvent::Viewport { width: 1280.0, height: 800.0 }, 0.0);
        s
    }

    fn tick_with(s: &mut Session, now: f64, events: Vec<InputEvent>) {
        let mut q = InputQueue::new();
        for e in events {
            q.push(e);
        }
        s.tick(now, &mut q);
    }

    /// Drive the session from intro to ask with animations on.
    fn open_envelope(s: &mut Session) -> f64 {
        tick_with(s, 16.0, vec![InputEvent::Scroll { pos: 1000.0, max: 1000.0 }]);
        tick_with(s, 32.0, vec![InputEvent::EnvelopeClick]);
        tick_with(s, 32.0 + 700.0, vec![]);
        32.0 + 700.0
    }

    fn ask_geometry() -> ButtonGeometry {
        ButtonGeometry {
            placeholder: Some(Rect::new(660.0, 500.0, 80.0, 40.0)),
            detached: None,
            protected: Some(Rect::new(540.0, 500.0, 100.0, 40.0)),
            viewport: Vec2::new(1280.0, 800.0),
        }
    }

    #[test]
    fn starts_on_intro_with_personal_headline() {
        let mut s = session_with(None);
        assert_eq!(s.screen(), Screen::Intro);
        assert_eq!(s.ask_headline(), "Anna Maria, will you be my valentine?");
        assert_eq!(s.drain_signals(), vec![Signal::ScreenChanged(Screen::Intro)]);
    }

    #[test]
    fn click_before_landing_is_ignored() {
        let mut s = session_with(None);
        let scroll = InputEvent::Scroll {
            pos: 200.0,
            max: 1000.0,
        };
        tick_with(&mut s, 16.0, vec![scroll, InputEvent::EnvelopeClick]);
        tick_with(&mut s, 2000.0, vec![]);
        assert_eq!(s.screen(), Screen::Intro);
        assert_eq!(s.snapshot().envelope_ready, 0.0);
    }

    #[test]
    fn opening_animation_gates_open_envelope() {
        let mut s = session_with(None);
        tick_with(&mut s, 16.0, vec![InputEvent::Scroll { pos: 1000.0, max: 1000.0 }]);
        assert_eq!(s.snapshot().envelope_ready, 1.0);
        tick_with(&mut s, 32.0, vec![InputEvent::EnvelopeClick]);
        tick_with(&mut s, 300.0, vec![]);
        assert_eq!(s.screen(), Screen::Intro);
        assert_eq!(s.snapshot().content_swapped, 1.0);
        tick_with(&mut s, 800.0, vec![]);
        assert_eq!(s.screen(), Screen::Ask);
        assert!(s.intro().is_none());
    }

    #[test]
    fn motion_off_opens_on_click_and_same_tick_events_chain() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 16.0, vec![InputEvent::EnvelopeClick, InputEvent::Yes, InputEvent::Yes]);
        assert_eq!(s.screen(), Screen::Celebrate);
    }

    #[test]
    fn events_out_of_order_are_dropped() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 16.0, vec![InputEvent::Yes, InputEvent::EnvelopeClick]);
        assert_eq!(s.screen(), Screen::Ask);
    }

    #[test]
    fn celebrate_auto_advances_once_after_fixed_delay() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 100.0, vec![InputEvent::EnvelopeClick, InputEvent::Yes]);
        assert_eq!(s.screen(), Screen::Celebrate);
        assert_eq!(s.celebrate_remaining_ms(100.0), Some(7600.0));

        tick_with(&mut s, 7699.0, vec![]);
        assert_eq!(s.screen(), Screen::Celebrate);
        tick_with(&mut s, 7700.0, vec![]);
        assert_eq!(s.screen(), Screen::Choice);
        assert_eq!(s.celebrate_remaining_ms(7700.0), None);
    }

    #[test]
    fn full_flow_with_signals() {
        let mut s = session_with(Some(MotionMode::Lite));
        s.drain_signals();
        let t = open_envelope(&mut s);
        let media = s.config().media.clone();
        assert_eq!(
            s.drain_signals(),
            vec![Signal::ScreenChanged(Screen::Ask), Signal::ShowMedia(media.ask.clone())]
        );

        tick_with(&mut s, t + 16.0, vec![InputEvent::Yes]);
        assert_eq!(
            s.drain_signals(),
            vec![
                Signal::ScreenChanged(Screen::Celebrate),
                Signal::ShowMedia(media.celebrate.clone()),
                Signal::RunEffect {
                    preset: EffectPreset::Celebrate,
                    duration_ms: 9000,
                    lite: true
                },
            ]
        );

        tick_with(&mut s, t + 16.0 + 7600.0, vec![]);
        assert_eq!(s.screen(), Screen::Choice);

        tick_with(
            &mut s,
            t + 8000.0,
            vec![
                InputEvent::ToggleChoice { choice_id: "dinner".into() },
                InputEvent::SelectChoice { choice_id: "dinner".into() },
            ],
        );
        assert_eq!(s.state().screen, Screen::Final);
        assert_eq!(s.state().selected_choice_id.as_deref(), Some("dinner"));
        assert_eq!(s.choices().expanded(), None);
    }

    #[test]
    fn choice_expansion_reaches_the_host() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 16.0, vec![InputEvent::EnvelopeClick, InputEvent::Yes]);
        tick_with(&mut s, 8000.0, vec![]);
        assert_eq!(s.screen(), Screen::Choice);
        s.drain_signals();

        let dinner = s.config().choice("dinner").cloned();
        let toggle = |id: &str| InputEvent::ToggleChoice { choice_id: id.into() };
        tick_with(&mut s, 8016.0, vec![toggle("dinner")]);
        assert_eq!(s.drain_signals(), vec![Signal::ChoiceExpanded(dinner)]);
        assert!(s.choices().is_minimized("walk"));

        tick_with(&mut s, 8032.0, vec![toggle("dinner"), toggle("nope")]);
        assert_eq!(s.drain_signals(), vec![Signal::ChoiceExpanded(None)]);
    }

    #[test]
    fn os_reduced_motion_skips_opening_despite_stored_full() {
        let store = MemoryStore::new().with_value(crate::prefs::MOTION_MODE_KEY, "full");
        let motion = MotionPreference::load(Box::new(store), true);
        let mut s = Session::new(GreetingConfig::builtin(), None, motion, 0.0, 1, 0.0);
        assert_eq!(s.motion_mode(), MotionMode::Full);
        tick_with(&mut s, 16.0, vec![InputEvent::Scroll { pos: 1000.0, max: 1000.0 }]);
        tick_with(&mut s, 32.0, vec![InputEvent::EnvelopeClick]);
        assert_eq!(s.screen(), Screen::Ask);
    }

    #[test]
    fn skip_then_scroll_still_opens() {
        let mut s = session_with(None);
        tick_with(
            &mut s,
            16.0,
            vec![InputEvent::SkipIntro, InputEvent::Scroll { pos: 0.0, max: 1000.0 }],
        );
        assert_eq!(s.snapshot().envelope_ready, 1.0);
        tick_with(&mut s, 32.0, vec![InputEvent::EnvelopeClick]);
        tick_with(&mut s, 800.0, vec![]);
        assert_eq!(s.screen(), Screen::Ask);
    }

    #[test]
    fn unknown_choice_is_dropped() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 16.0, vec![InputEvent::EnvelopeClick, InputEvent::Yes]);
        tick_with(&mut s, 8000.0, vec![InputEvent::SelectChoice { choice_id: "skydiving".into() }]);
        assert_eq!(s.screen(), Screen::Choice);
        assert_eq!(s.state().selected_choice_id, None);
    }

    #[test]
    fn motion_off_suppresses_effects() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 16.0, vec![InputEvent::EnvelopeClick, InputEvent::Yes]);
        let effects = s
            .drain_signals()
            .into_iter()
            .filter(|sig| matches!(sig, Signal::RunEffect { .. }))
            .count();
        assert_eq!(effects, 0);
    }

    #[test]
    fn runaway_only_reacts_on_ask() {
        let mut s = session_with(None);
        tick_with(
            &mut s,
            16.0,
            vec![InputEvent::Runaway {
                signal: Proximity::PointerEnter,
                geometry: ask_geometry(),
            }],
        );
        assert!(!s.runaway().is_escaped());

        let t = open_envelope(&mut s);
        s.drain_signals();
        tick_with(
            &mut s,
            t + 16.0,
            vec![InputEvent::Runaway {
                signal: Proximity::PointerEnter,
                geometry: ask_geometry(),
            }],
        );
        assert!(s.runaway().is_escaped());
        let moved = s.drain_signals();
        assert!(matches!(moved.as_slice(), [Signal::ButtonMoved(_)]));
        assert_eq!(s.snapshot().button_escaped, 1.0);
        assert_eq!(s.screen(), Screen::Ask);
    }

    #[test]
    fn ps_modal_restores_focus_for_every_dismissal() {
        for reason in [DismissReason::CloseButton, DismissReason::Backdrop, DismissReason::Escape] {
            let mut s = session_with(Some(MotionMode::Off));
            s.handle(InputEvent::OpenPs { focused: Some("ps-button".into()) }, 0.0);
            assert!(s.state().is_ps_open);
            s.drain_signals();

            s.handle(InputEvent::DismissPs(reason), 1.0);
            assert!(!s.state().is_ps_open);
            assert_eq!(s.drain_signals(), vec![Signal::RestoreFocus("ps-button".into())]);

            // A second dismissal is a no-op.
            s.handle(InputEvent::DismissPs(reason), 2.0);
            assert!(s.drain_signals().is_empty());
        }
    }

    #[test]
    fn motion_change_reaches_intro_and_subscribers() {
        let mut s = session_with(None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        s.subscribe_motion(move |m| sink.borrow_mut().push(m));
        s.drain_signals();

        tick_with(&mut s, 16.0, vec![InputEvent::SetMotionMode(MotionMode::Off)]);
        assert_eq!(*seen.borrow(), vec![MotionMode::Off]);
        assert_eq!(s.drain_signals(), vec![Signal::MotionModeChanged(MotionMode::Off)]);
        assert_eq!(s.snapshot().envelope_ready, 1.0);
        assert_eq!(s.snapshot().motion_mode, 2.0);
    }

    #[test]
    fn reduced_motion_signal_respects_explicit_choice() {
        let mut s = session_with(Some(MotionMode::Full));
        s.handle(InputEvent::ReducedMotionChanged(true), 0.0);
        assert_eq!(s.motion_mode(), MotionMode::Full);

        let mut implicit = session_with(None);
        implicit.handle(InputEvent::ReducedMotionChanged(true), 0.0);
        assert_eq!(implicit.motion_mode(), MotionMode::Off);
    }

    #[test]
    fn snapshot_tracks_frames_and_screen() {
        let mut s = session_with(Some(MotionMode::Off));
        tick_with(&mut s, 16.0, vec![]);
        tick_with(&mut s, 32.0, vec![InputEvent::EnvelopeClick]);
        let snap = *s.snapshot();
        assert_eq!(snap.frame, 2.0);
        assert_eq!(snap.screen, Screen::Ask.code() as f32);
        assert_eq!(snap.intro_phase, IntroPhase::Opened.code() as f32);
        assert_eq!(snap.v_norm, 0.0);
    }
}
