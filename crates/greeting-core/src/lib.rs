pub mod api;
pub mod app;
pub mod assets;
pub mod bridge;
pub mod core;
pub mod input;
pub mod motion;
pub mod prefs;
pub mod runaway;

pub use glam::Vec2;

// Re-export key types at crate root for convenience
pub use api::present::{deliver, Presenter};
pub use api::types::{EffectPreset, Signal};
pub use app::modal::DismissReason;
pub use app::session::Session;
pub use assets::config::{ConfigError, GreetingConfig};
pub use bridge::protocol::{FrameSnapshot, PROTOCOL_VERSION};
pub use core::state::{transition, AppEvent, AppState, Screen};
pub use input::queue::{InputEvent, InputQueue};
pub use prefs::{MemoryStore, MotionMode, MotionPreference, PreferenceStore, StoreError};
pub use runaway::{ButtonGeometry, Proximity, Rect};
