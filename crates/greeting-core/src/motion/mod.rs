//! Cosmetic motion: never gates the flow except through the envelope's
//! ready/click gate.

pub mod easing;
pub mod heart;
pub mod intro;
pub mod opening;
pub mod pose;
pub mod velocity;

pub use easing::{lerp, lerp_vec2, Easing};
pub use heart::heart_xy;
pub use intro::{ClickOutcome, IntroController, IntroFrame, IntroPhase};
pub use opening::{OpeningFrame, OpeningSequence, OpeningTimings};
pub use pose::{compute_pose, EnvelopePose, PathParams, ProgressPursuit};
pub use velocity::{ScrollTracker, ScrollVelocity, VelocityParams};
