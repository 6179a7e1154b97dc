//! Intro screen driver: scroll sample -> velocity -> progress -> pose,
//! plus the ready/click/opening gate in front of `OPEN_ENVELOPE`.

use glam::Vec2;

use super::opening::{OpeningFrame, OpeningSequence};
use super::pose::{compute_pose, EnvelopePose, ProgressPursuit, DEFAULT_ENVELOPE_SIZE};
use super::velocity::ScrollTracker;
use crate::assets::config::IntroParams;
use crate::prefs::motion_mode::MotionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    /// Flying; not clickable yet.
    Scroll,
    /// Landed far enough to be clicked.
    Ready,
    /// Click accepted, opening animation running.
    Opening,
    /// Done; the owner should fire `OPEN_ENVELOPE`.
    Opened,
}

impl IntroPhase {
    pub fn code(self) -> u32 {
        match self {
            IntroPhase::Scroll => 0,
            IntroPhase::Ready => 1,
            IntroPhase::Opening => 2,
            IntroPhase::Opened => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    /// Animation started; completion arrives through a later tick.
    Opening,
    /// No animation (motion off); open right away.
    Opened,
}

/// What one frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroFrame {
    pub v_norm: f32,
    /// Rendered (pursued) progress.
    pub progress: f32,
    pub pose: EnvelopePose,
    pub opening: Option<OpeningFrame>,
    /// True on exactly one frame: the one where the opening finished.
    pub opened: bool,
}

#[derive(Debug)]
pub struct IntroController {
    params: IntroParams,
    mode: MotionMode,
    phase: IntroPhase,
    tracker: ScrollTracker,
    target: f32,
    pursuit: ProgressPursuit,
    viewport: Option<Vec2>,
    envelope: Option<Vec2>,
    pose: EnvelopePose,
    opening: Option<OpeningSequence>,
    /// Latched by `skip`; later scroll samples no longer move the target.
    skipped: bool,
    /// OS reduced-motion signal. Opens without the animation, like `off`.
    reduced_motion: bool,
}

impl IntroController {
    /// `initial_scroll` is the scroll offset at mount, so a page that opens
    /// already scrolled does not register a velocity spike.
    pub fn new(params: IntroParams, mode: MotionMode, initial_scroll: f32, now_ms: f64) -> Self {
        let tracker = ScrollTracker::new(initial_scroll, now_ms, params.velocity);
        let pursuit = ProgressPursuit::new(params.pursuit_rate);
        let mut intro = Self {
            params,
            mode,
            phase: IntroPhase::Scroll,
            tracker,
            target: 0.0,
            pursuit,
            viewport: None,
            envelope: None,
            pose: EnvelopePose::IDENTITY,
            opening: None,
            skipped: false,
            reduced_motion: false,
        };
        intro.set_motion_mode(mode);
        intro
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn pose(&self) -> EnvelopePose {
        self.pose
    }

    pub fn v_norm(&self) -> f32 {
        self.tracker.state().v_norm
    }

    /// Scroll listener sample: position and the maximum scroll offset.
    pub fn on_scroll(&mut self, pos: f32, max_scroll: f32) {
        self.tracker.observe(pos);
        if self.skipped {
            return;
        }
        let normalized = pos / max_scroll.max(1.0);
        self.target = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = (size.is_finite() && size.x > 0.0 && size.y > 0.0).then_some(size);
    }

    /// Measured envelope size; `None` until it has been laid out.
    pub fn set_envelope_size(&mut self, size: Option<Vec2>) {
        self.envelope = size.filter(|s| s.is_finite() && s.x > 0.0 && s.y > 0.0);
    }

    pub fn set_motion_mode(&mut self, mode: MotionMode) {
        self.mode = mode;
        if !mode.animates() {
            self.pursuit.snap_to(1.0);
            self.refresh_pose(1.0);
        }
        self.pursuit.reset_clock();
        self.sync_ready();
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Jump straight to the landed position and stay there.
    pub fn skip(&mut self) {
        self.skipped = true;
        self.target = 1.0;
        self.pursuit.snap_to(1.0);
        self.refresh_pose(1.0);
        self.sync_ready();
    }

    /// Progress that gates readiness. Motion off or a skip counts as
    /// fully landed.
    pub fn effective_progress(&self) -> f32 {
        if self.mode.animates() && !self.skipped {
            self.target
        } else {
            1.0
        }
    }

    pub fn is_ready(&self) -> bool {
        self.effective_progress() >= self.params.ready_threshold
    }

    /// Mirrors `aria-disabled` on the envelope.
    pub fn envelope_disabled(&self) -> bool {
        self.phase != IntroPhase::Ready
    }

    pub fn click(&mut self, now_ms: f64) -> ClickOutcome {
        self.sync_ready();
        if self.phase != IntroPhase::Ready {
            return ClickOutcome::Ignored;
        }
        if !self.mode.animates() || self.reduced_motion {
            self.phase = IntroPhase::Opened;
            return ClickOutcome::Opened;
        }
        self.phase = IntroPhase::Opening;
        self.opening = Some(OpeningSequence::new(now_ms, self.params.opening));
        ClickOutcome::Opening
    }

    /// One animation frame. Velocity first, then pose, then the opening.
    pub fn tick(&mut self, now_ms: f64) -> IntroFrame {
        let v_norm = self.tracker.tick(now_ms).v_norm;
        self.sync_ready();

        if matches!(self.phase, IntroPhase::Scroll | IntroPhase::Ready) {
            let progress = if self.mode.animates() {
                self.pursuit.tick(self.target, now_ms)
            } else {
                self.pursuit.snap_to(1.0);
                1.0
            };
            self.refresh_pose(progress);
        }

        let mut opening = None;
        let mut opened = false;
        if let Some(seq) = &self.opening {
            let frame = seq.sample(now_ms);
            let landed = self.landed_pose();
            self.pose = EnvelopePose {
                pos: landed.pos + Vec2::new(0.0, frame.offset_y),
                scale: landed.scale,
                rotate_deg: frame.rotate_deg,
            };
            if frame.finished {
                self.opening = None;
                self.phase = IntroPhase::Opened;
                opened = true;
            }
            opening = Some(frame);
        }

        IntroFrame {
            v_norm,
            progress: self.pursuit.current(),
            pose: self.pose,
            opening,
            opened,
        }
    }

    fn sync_ready(&mut self) {
        let ready = self.is_ready();
        self.phase = match self.phase {
            IntroPhase::Scroll if ready => IntroPhase::Ready,
            IntroPhase::Ready if !ready => IntroPhase::Scroll,
            other => other,
        };
    }

    fn landed_pose(&self) -> EnvelopePose {
        let viewport = self.viewport.unwrap_or(Vec2::ZERO);
        compute_pose(1.0, viewport, self.envelope_size(), &self.params.path, false)
    }

    fn envelope_size(&self) -> Vec2 {
        self.envelope.unwrap_or(DEFAULT_ENVELOPE_SIZE)
    }

    /// Recompute the pose; without a viewport the previous pose stays.
    fn refresh_pose(&mut self, progress: f32) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let wobble = self.mode == MotionMode::Full;
        let envelope = self.envelope_size();
        self.pose = compute_pose(progress, viewport, envelope, &self.params.path, wobble);
    }
}
