use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::state::Screen;
use crate::motion::opening::OpeningTimings;
use crate::motion::pose::PathParams;
use crate::motion::velocity::VelocityParams;
use crate::runaway::button::RunawayParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid greeting config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("greeting config has no choices")]
    NoChoices,
    #[error("choice #{index} has an empty id")]
    EmptyChoiceId { index: usize },
    #[error("duplicate choice id {0:?}")]
    DuplicateChoiceId(String),
}

/// Everything the greeting reads but never mutates. Loaded from a JSON
/// document; every section falls back to the built-in greeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GreetingConfig {
    pub texts: Texts,
    pub media: MediaPaths,
    /// Ordered; rendered in this order on the choice screen.
    pub choices: Vec<ChoiceOption>,
    pub intro: IntroParams,
    pub runaway: RunawayParams,
    pub timings: Timings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Texts {
    pub intro_hint: String,
    /// Used when no recipient name is given.
    pub ask_headline: String,
    /// `{name}` is replaced by the sanitized recipient.
    pub ask_headline_named: String,
    pub celebrate_headline: String,
    pub choice_headline: String,
    pub final_headline: String,
    pub final_subtext: String,
    pub ps_title: String,
    pub ps_body: String,
    pub signature: String,
}

impl Default for Texts {
    fn default() -> Self {
        Self {
            intro_hint: "Open".into(),
            ask_headline: "Will you be my valentine?".into(),
            ask_headline_named: "{name}, will you be my valentine?".into(),
            celebrate_headline: "I love you more than anything ❤️".into(),
            choice_headline: "A date? ⭐".into(),
            final_headline: "Good choice ✅".into(),
            final_subtext: "I can't wait! 💕".into(),
            ps_title: "Psssst.... 🙊".into(),
            ps_body: "You are the most wonderful person I know.".into(),
            signature: "With love".into(),
        }
    }
}

/// A piece of media plus the glyph shown when it fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSlot {
    pub src: String,
    pub fallback: String,
}

impl MediaSlot {
    fn new(src: &str, fallback: &str) -> Self {
        Self {
            src: src.into(),
            fallback: fallback.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaPaths {
    pub ask: MediaSlot,
    pub celebrate: MediaSlot,
    #[serde(rename = "final")]
    pub finale: MediaSlot,
    pub hero_image: String,
}

impl Default for MediaPaths {
    fn default() -> Self {
        Self {
            ask: MediaSlot::new("/assets/gif/ask.gif", "🥺💕"),
            celebrate: MediaSlot::new("/assets/gif/yay.gif", "🎉❤️🎉"),
            finale: MediaSlot::new("/assets/gif/final.gif", "💖"),
            hero_image: "/assets/hero/hero.jpg".into(),
        }
    }
}

impl MediaPaths {
    /// Media shown on `screen`, if it has any.
    pub fn for_screen(&self, screen: Screen) -> Option<&MediaSlot> {
        match screen {
            Screen::Ask => Some(&self.ask),
            Screen::Celebrate => Some(&self.celebrate),
            Screen::Final => Some(&self.finale),
            Screen::Intro | Screen::Choice => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub emoji: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ChoiceOption {
    fn new(id: &str, label: &str, emoji: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            emoji: emoji.into(),
            image_path: None,
            description: Some(description.into()),
        }
    }

    /// Description, falling back to the label.
    pub fn description_or_label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.label)
    }
}

pub fn default_choices() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("dinner", "Dinner", "🍝", "A romantic dinner for two"),
        ChoiceOption::new("movie", "Movie?", "🎬", "Cinema or a film at home"),
        ChoiceOption::new("walk", "Walk?", "☕", "A walk with a cup of coffee"),
    ]
}

/// Intro flight tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroParams {
    /// Progress at which the envelope becomes clickable.
    pub ready_threshold: f32,
    /// Pursuit rate (1/s) of the rendered progress toward the scroll target.
    pub pursuit_rate: f32,
    pub velocity: VelocityParams,
    pub path: PathParams,
    pub opening: OpeningTimings,
}

impl Default for IntroParams {
    fn default() -> Self {
        Self {
            ready_threshold: 0.985,
            pursuit_rate: 16.0,
            velocity: VelocityParams::default(),
            path: PathParams::default(),
            opening: OpeningTimings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Hard auto-advance from celebrate to choice.
    pub celebrate_ms: f64,
    pub celebrate_effect_ms: u32,
    pub ambient_effect_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            celebrate_ms: 7600.0,
            celebrate_effect_ms: 9000,
            ambient_effect_ms: 12000,
        }
    }
}

impl GreetingConfig {
    /// The built-in greeting.
    pub fn builtin() -> Self {
        Self {
            choices: default_choices(),
            ..Self::default()
        }
    }

    /// Parse and validate a config document. Missing sections use the
    /// built-in values; a missing `choices` list uses the built-in choices.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: GreetingConfig = serde_json::from_str(json)?;
        if config.choices.is_empty() && !json_has_key(json, "choices") {
            config.choices = default_choices();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.choices.is_empty() {
            return Err(ConfigError::NoChoices);
        }
        for (index, choice) in self.choices.iter().enumerate() {
            if choice.id.trim().is_empty() {
                return Err(ConfigError::EmptyChoiceId { index });
            }
            if self.choices[..index].iter().any(|c| c.id == choice.id) {
                return Err(ConfigError::DuplicateChoiceId(choice.id.clone()));
            }
        }
        Ok(())
    }

    pub fn choice(&self, id: &str) -> Option<&ChoiceOption> {
        self.choices.iter().find(|c| c.id == id)
    }
}

fn json_has_key(json: &str, key: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|v| v.as_object().map(|o| o.contains_key(key)))
        .unwrap_or(false)
}
