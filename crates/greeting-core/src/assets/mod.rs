pub mod config;
pub mod recipient;

pub use config::{
    ChoiceOption, ConfigError, GreetingConfig, IntroParams, MediaPaths, MediaSlot, Texts, Timings,
};
pub use recipient::{ask_headline, sanitize_name, MAX_NAME_CHARS};
