//! Evasive button controller.
//!
//! Two cooperating instances share one state: the resting placeholder that
//! keeps the layout slot, and a detached fixed-position twin that becomes
//! the only interactive target once the button has escaped. Every proximity
//! signal moves the twin somewhere that does not overlap the protected
//! sibling; no activation ever completes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunawayParams {
    /// Minimum distance kept from every viewport edge.
    pub edge_padding: f32,
    /// Extra space kept around the protected sibling on all sides.
    pub protect_buffer: f32,
    /// Repositions closer together than this are dropped.
    pub throttle_ms: f64,
    /// Candidates sampled before settling for the last one.
    pub max_attempts: u32,
}

impl Default for RunawayParams {
    fn default() -> Self {
        Self {
            edge_padding: 20.0,
            protect_buffer: 90.0,
            throttle_ms: 150.0,
            max_attempts: 24,
        }
    }
}

/// Signals that mean "the pointer (or focus) is about to get me".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    PointerEnter,
    PointerDown,
    TouchStart,
    Focus,
    /// An activation that got through anyway. Treated like any other signal.
    Click,
}

impl Proximity {
    /// Map a DOM event type to a signal.
    pub fn from_event_type(kind: &str) -> Option<Self> {
        match kind {
            "pointerenter" | "mouseenter" => Some(Proximity::PointerEnter),
            "pointerdown" | "mousedown" => Some(Proximity::PointerDown),
            "touchstart" => Some(Proximity::TouchStart),
            "focus" | "focusin" => Some(Proximity::Focus),
            "click" => Some(Proximity::Click),
            _ => None,
        }
    }
}

/// Layout facts measured by the host at the moment of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonGeometry {
    /// The resting instance.
    pub placeholder: Option<Rect>,
    /// The detached twin, once it exists.
    pub detached: Option<Rect>,
    /// The sibling the button must stay away from.
    pub protected: Option<Rect>,
    pub viewport: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// First signal: detached twin created at this top-left.
    Escaped(Vec2),
    /// Twin relocated to this top-left.
    Moved(Vec2),
    /// Too soon after the previous move.
    Throttled,
    /// Geometry not available yet; try again next signal.
    Skipped,
}

impl Reaction {
    pub fn position(&self) -> Option<Vec2> {
        match self {
            Reaction::Escaped(p) | Reaction::Moved(p) => Some(*p),
            Reaction::Throttled | Reaction::Skipped => None,
        }
    }
}

/// Interactivity and accessibility flags for one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceAttrs {
    pub interactive: bool,
    pub aria_hidden: bool,
    pub tab_index: i32,
    pub opacity: f32,
}

impl InstanceAttrs {
    const ACTIVE: InstanceAttrs = InstanceAttrs {
        interactive: true,
        aria_hidden: false,
        tab_index: 0,
        opacity: 1.0,
    };

    const INERT: InstanceAttrs = InstanceAttrs {
        interactive: false,
        aria_hidden: true,
        tab_index: -1,
        opacity: 0.0,
    };
}

#[derive(Debug, Clone)]
pub struct RunawayButton {
    params: RunawayParams,
    rng: Rng,
    escaped: bool,
    position: Option<Vec2>,
    last_move_ms: Option<f64>,
}

impl RunawayButton {
    pub fn new(params: RunawayParams, seed: u64) -> Self {
        Self {
            params,
            rng: Rng::new(seed),
            escaped: false,
            position: None,
            last_move_ms: None,
        }
    }

    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    /// Top-left of the detached twin, if escaped.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Back to resting. Called whenever the hosting screen is (re-)entered.
    pub fn reset(&mut self) {
        self.escaped = false;
        self.position = None;
        self.last_move_ms = None;
    }

    /// Attributes for the resting instance.
    pub fn placeholder_attrs(&self) -> InstanceAttrs {
        if self.escaped {
            InstanceAttrs::INERT
        } else {
            InstanceAttrs::ACTIVE
        }
    }

    /// Attributes for the detached twin; `None` while it does not exist.
    pub fn detached_attrs(&self) -> Option<InstanceAttrs> {
        self.position.map(|_| InstanceAttrs::ACTIVE)
    }

    /// React to a proximity signal. The host prevents default and stops
    /// propagation for every signal regardless of the outcome.
    pub fn on_signal(
        &mut self,
        signal: Proximity,
        geometry: &ButtonGeometry,
        now_ms: f64,
    ) -> Reaction {
        if !geometry.viewport.is_finite() {
            return Reaction::Skipped;
        }

        if !self.escaped {
            let Some(resting) = geometry.placeholder.filter(Rect::is_measurable) else {
                log::debug!("runaway: {:?} before layout, skipping", signal);
                return Reaction::Skipped;
            };
            self.escaped = true;
            self.position = Some(resting.origin());
            let pos = self.relocate(resting.size(), geometry, now_ms);
            return Reaction::Escaped(pos);
        }

        if let Some(last) = self.last_move_ms {
            if now_ms - last < self.params.throttle_ms {
                return Reaction::Throttled;
            }
        }

        let size = geometry
            .detached
            .filter(Rect::is_measurable)
            .or_else(|| geometry.placeholder.filter(Rect::is_measurable));
        match size {
            Some(rect) => Reaction::Moved(self.relocate(rect.size(), geometry, now_ms)),
            None => Reaction::Skipped,
        }
    }

    fn relocate(&mut self, size: Vec2, geometry: &ButtonGeometry, now_ms: f64) -> Vec2 {
        let pos = place(size, geometry.viewport, geometry.protected, &self.params, &mut self.rng);
        self.position = Some(pos);
        self.last_move_ms = Some(now_ms);
        pos
    }
}

/// Pick a top-left for a `size` box inside `viewport` that avoids
/// `protected` inflated by the buffer. Falls back to the last candidate
/// when the budget runs out.
pub fn place(
    size: Vec2,
    viewport: Vec2,
    protected: Option<Rect>,
    params: &RunawayParams,
    rng: &mut Rng,
) -> Vec2 {
    let pad = params.edge_padding;
    let max = (viewport - size - Vec2::splat(pad)).max(Vec2::splat(pad));
    let keep_out = protected
        .filter(Rect::is_measurable)
        .map(|r| r.inflate(params.protect_buffer));

    let mut candidate = Vec2::splat(pad);
    for _ in 0..params.max_attempts.max(1) {
        candidate = Vec2::new(rng.range(pad, max.x), rng.range(pad, max.y));
        let Some(zone) = keep_out else {
            return candidate;
        };
        if !Rect::from_origin_size(candidate, size).intersects(&zone) {
            return candidate;
        }
    }
    log::debug!("runaway: no free spot in {} attempts", params.max_attempts);
    candidate
}
