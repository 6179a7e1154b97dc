/// Shortest frame delta (seconds) fed into any smoothing step.
pub const MIN_FRAME_DT: f32 = 0.008;
/// Longest frame delta (seconds). Caps the jump after a backgrounded tab.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Clamp a raw frame delta in seconds to `[MIN_FRAME_DT, MAX_FRAME_DT]`.
/// Zero or negative deltas (duplicate samples) come back as exactly 0.
pub fn clamp_frame_dt(dt_seconds: f32) -> f32 {
    if dt_seconds <= 0.0 || dt_seconds.is_nan() {
        return 0.0;
    }
    dt_seconds.clamp(MIN_FRAME_DT, MAX_FRAME_DT)
}

/// Delta between two millisecond timestamps, clamped, in seconds.
pub fn frame_dt_between(last_ms: f64, next_ms: f64) -> f32 {
    clamp_frame_dt(((next_ms - last_ms) / 1000.0) as f32)
}

/// Framerate-independent low-pass factor `1 - e^(-rate * dt)`.
#[inline]
pub fn smoothing_factor(rate: f32, dt_seconds: f32) -> f32 {
    if dt_seconds <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt_seconds).exp()
}

/// Identifies one visit of a screen (or any other owner of frame loops
/// and timers). Work captured under an old ticket is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitTicket(u32);

/// Monotonic generation counter. Bumping it invalidates every ticket
/// issued before, which is how torn-down loops become no-ops.
#[derive(Debug, Default)]
pub struct Generation {
    current: u32,
}

impl Generation {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    pub fn ticket(&self) -> VisitTicket {
        VisitTicket(self.current)
    }

    /// Tear down the current visit. Returns the ticket for the new one.
    pub fn advance(&mut self) -> VisitTicket {
        self.current = self.current.wrapping_add(1);
        VisitTicket(self.current)
    }

    pub fn is_current(&self, ticket: VisitTicket) -> bool {
        ticket.0 == self.current
    }
}

/// One-shot wall-clock timer, the `setTimeout` of the frame loop.
#[derive(Debug, Clone)]
pub struct Timeout {
    deadline_ms: f64,
    ticket: VisitTicket,
    fired: bool,
}

impl Timeout {
    pub fn new(started_at_ms: f64, duration_ms: f64, ticket: VisitTicket) -> Self {
        Self {
            deadline_ms: started_at_ms + duration_ms.max(0.0),
            ticket,
            fired: false,
        }
    }

    /// Returns true exactly once: on the first poll at or after the
    /// deadline while `ticket` is still current.
    pub fn poll(&mut self, now_ms: f64, generation: &Generation) -> bool {
        if self.fired || !generation.is_current(self.ticket) {
            return false;
        }
        if now_ms >= self.deadline_ms {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.deadline_ms - now_ms).max(0.0)
    }
}
