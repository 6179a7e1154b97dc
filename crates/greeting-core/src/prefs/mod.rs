pub mod motion_mode;
pub mod store;

pub use motion_mode::{MotionMode, MotionPreference, SubscriptionId, MOTION_MODE_KEY};
pub use store::{MemoryStore, PreferenceStore, StoreError};
