//! The process-wide full/lite/off motion preference.
//!
//! One in-memory value, loaded from the store once, written back only on
//! explicit user change. Consumers subscribe instead of polling.

use std::fmt;
use std::str::FromStr;

use super::store::PreferenceStore;

/// Storage key for the persisted mode.
pub const MOTION_MODE_KEY: &str = "valentine.motionMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MotionMode {
    #[default]
    Full,
    Lite,
    Off,
}

impl MotionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MotionMode::Full => "full",
            MotionMode::Lite => "lite",
            MotionMode::Off => "off",
        }
    }

    pub fn code(self) -> u32 {
        match self {
            MotionMode::Full => 0,
            MotionMode::Lite => 1,
            MotionMode::Off => 2,
        }
    }

    /// Whether animators run at all.
    pub fn animates(self) -> bool {
        self != MotionMode::Off
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMotionMode(pub String);

impl FromStr for MotionMode {
    type Err = UnknownMotionMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(MotionMode::Full),
            "lite" => Ok(MotionMode::Lite),
            "off" => Ok(MotionMode::Off),
            other => Err(UnknownMotionMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Listener = Box<dyn FnMut(MotionMode)>;

pub struct MotionPreference {
    mode: MotionMode,
    /// Set once the user picked a mode (or one was found in storage).
    explicit: bool,
    /// Latest OS reduced-motion signal, kept even when a mode was chosen.
    os_reduced: bool,
    store: Box<dyn PreferenceStore>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u32,
}

impl MotionPreference {
    /// Read the stored mode; fall back to the OS reduced-motion signal.
    pub fn load(store: Box<dyn PreferenceStore>, prefers_reduced_motion: bool) -> Self {
        let stored = match store.get(MOTION_MODE_KEY) {
            Ok(Some(raw)) => match raw.parse::<MotionMode>() {
                Ok(mode) => Some(mode),
                Err(UnknownMotionMode(bad)) => {
                    log::debug!("ignoring stored motion mode {:?}", bad);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("motion preference read failed: {}", err);
                None
            }
        };

        let (mode, explicit) = match stored {
            Some(mode) => (mode, true),
            None if prefers_reduced_motion => (MotionMode::Off, false),
            None => (MotionMode::Full, false),
        };
        log::info!("motion mode: {} (explicit: {})", mode, explicit);

        Self {
            mode,
            explicit,
            os_reduced: prefers_reduced_motion,
            store,
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn os_prefers_reduced(&self) -> bool {
        self.os_reduced
    }

    /// Explicit user choice: persist (best effort) and notify.
    pub fn set(&mut self, mode: MotionMode) {
        self.explicit = true;
        if let Err(err) = self.store.set(MOTION_MODE_KEY, mode.as_str()) {
            log::warn!("motion preference write failed: {}", err);
        }
        self.apply(mode);
    }

    /// The OS reduced-motion signal changed. Only honored while the user
    /// has not chosen a mode, and only ever turns `full` into `off`.
    pub fn on_reduced_motion_change(&mut self, reduced: bool) {
        self.os_reduced = reduced;
        if self.explicit {
            return;
        }
        if reduced && self.mode == MotionMode::Full {
            self.apply(MotionMode::Off);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(MotionMode) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn apply(&mut self, mode: MotionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        for (_, listener) in self.listeners.iter_mut() {
            listener(mode);
        }
    }
}

impl fmt::Debug for MotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionPreference")
            .field("mode", &self.mode)
            .field("explicit", &self.explicit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
