//! The authoritative screen flow.
//!
//! `intro -> ask -> celebrate -> choice -> final`, plus the orthogonal
//! PS-note flag. [`transition`] is pure and total: an event that does not
//! match the current screen hands back the very same state.

use std::borrow::Cow;
use std::fmt;

/// Which of the five screens is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Intro,
    Ask,
    Celebrate,
    Choice,
    Final,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Intro,
        Screen::Ask,
        Screen::Celebrate,
        Screen::Choice,
        Screen::Final,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Intro => "intro",
            Screen::Ask => "ask",
            Screen::Celebrate => "celebrate",
            Screen::Choice => "choice",
            Screen::Final => "final",
        }
    }

    /// Stable numeric code used on the wire.
    pub fn code(self) -> u32 {
        match self {
            Screen::Intro => 0,
            Screen::Ask => 1,
            Screen::Celebrate => 2,
            Screen::Choice => 3,
            Screen::Final => 4,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the flow knows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub screen: Screen,
    /// Set together with the move into `Final`; never cleared.
    pub selected_choice_id: Option<String>,
    pub is_ps_open: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The only ways to mutate [`AppState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    OpenEnvelope,
    Yes,
    CelebrateDone,
    SelectChoice { choice_id: String },
    OpenPs,
    ClosePs,
}

impl AppEvent {
    /// Screen the event must be fired from, or `None` for the PS events.
    pub fn source(&self) -> Option<Screen> {
        match self {
            AppEvent::OpenEnvelope => Some(Screen::Intro),
            AppEvent::Yes => Some(Screen::Ask),
            AppEvent::CelebrateDone => Some(Screen::Celebrate),
            AppEvent::SelectChoice { .. } => Some(Screen::Choice),
            AppEvent::OpenPs | AppEvent::ClosePs => None,
        }
    }
}

/// Apply one event. No-ops come back as `Cow::Borrowed(state)`.
pub fn transition<'a>(state: &'a AppState, event: &AppEvent) -> Cow<'a, AppState> {
    if let Some(source) = event.source() {
        if state.screen != source {
            log::debug!("ignoring {:?} on screen {}", event, state.screen);
            return Cow::Borrowed(state);
        }
    }

    match event {
        AppEvent::OpenEnvelope => Cow::Owned(AppState {
            screen: Screen::Ask,
            ..state.clone()
        }),
        AppEvent::Yes => Cow::Owned(AppState {
            screen: Screen::Celebrate,
            ..state.clone()
        }),
        AppEvent::CelebrateDone => Cow::Owned(AppState {
            screen: Screen::Choice,
            ..state.clone()
        }),
        AppEvent::SelectChoice { choice_id } => Cow::Owned(AppState {
            screen: Screen::Final,
            selected_choice_id: Some(choice_id.clone()),
            is_ps_open: state.is_ps_open,
        }),
        AppEvent::OpenPs if state.is_ps_open => Cow::Borrowed(state),
        AppEvent::OpenPs => Cow::Owned(AppState {
            is_ps_open: true,
            ..state.clone()
        }),
        AppEvent::ClosePs if !state.is_ps_open => Cow::Borrowed(state),
        AppEvent::ClosePs => Cow::Owned(AppState {
            is_ps_open: false,
            ..state.clone()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn on(screen: Screen) -> AppState {
        AppState {
            screen,
            ..AppState::new()
        }
    }

    fn select(id: &str) -> AppEvent {
        AppEvent::SelectChoice {
            choice_id: id.to_string(),
        }
    }

    fn is_identity(before: &AppState, after: &Cow<'_, AppState>) -> bool {
        matches!(after, Cow::Borrowed(s) if std::ptr::eq(*s, before))
    }

    #[test]
    fn starts_on_intro() {
        let s = AppState::new();
        assert_eq!(s.screen, Screen::Intro);
        assert_eq!(s.selected_choice_id, None);
        assert!(!s.is_ps_open);
    }

    #[test]
    fn open_envelope_moves_intro_to_ask() {
        let initial = AppState::new();
        let next = transition(&initial, &AppEvent::OpenEnvelope);
        assert_eq!(next.screen, Screen::Ask);
    }

    #[test]
    fn events_off_their_source_screen_are_identity() {
        let cases = [
            (Screen::Ask, AppEvent::OpenEnvelope),
            (Screen::Intro, AppEvent::Yes),
            (Screen::Celebrate, AppEvent::Yes),
            (Screen::Ask, AppEvent::CelebrateDone),
            (Screen::Celebrate, select("movie")),
            (Screen::Final, select("walk")),
        ];
        for (screen, event) in cases {
            let state = on(screen);
            let next = transition(&state, &event);
            assert!(is_identity(&state, &next), "{:?} on {}", event, screen);
        }
    }

    #[test]
    fn repeated_yes_in_celebrate_is_noop() {
        let state = on(Screen::Celebrate);
        for _ in 0..3 {
            let next = transition(&state, &AppEvent::Yes);
            assert!(is_identity(&state, &next));
        }
    }

    #[test]
    fn final_is_terminal() {
        let state = AppState {
            screen: Screen::Final,
            selected_choice_id: Some("dinner".into()),
            is_ps_open: false,
        };
        for event in [
            AppEvent::OpenEnvelope,
            AppEvent::Yes,
            AppEvent::CelebrateDone,
            select("movie"),
        ] {
            let next = transition(&state, &event);
            assert_eq!(next.screen, Screen::Final);
            assert_eq!(next.selected_choice_id.as_deref(), Some("dinner"));
        }
    }

    #[test]
    fn ps_toggles_from_any_screen() {
        for screen in Screen::ALL {
            let opened = transition(&on(screen), &AppEvent::OpenPs).into_owned();
            assert!(opened.is_ps_open);
            assert_eq!(opened.screen, screen);
            let closed = transition(&opened, &AppEvent::ClosePs);
            assert!(!closed.is_ps_open);
        }
    }

    #[test]
    fn redundant_ps_events_are_identity() {
        let closed = AppState::new();
        assert!(is_identity(&closed, &transition(&closed, &AppEvent::ClosePs)));
        let open = AppState {
            is_ps_open: true,
            ..AppState::new()
        };
        assert!(is_identity(&open, &transition(&open, &AppEvent::OpenPs)));
    }

    #[test]
    fn full_happy_path() {
        let mut state = AppState::new();

        state = transition(&state, &AppEvent::OpenEnvelope).into_owned();
        assert_eq!(state, on(Screen::Ask));

        state = transition(&state, &AppEvent::Yes).into_owned();
        assert_eq!(state, on(Screen::Celebrate));

        state = transition(&state, &AppEvent::CelebrateDone).into_owned();
        assert_eq!(state, on(Screen::Choice));

        state = transition(&state, &select("dinner")).into_owned();
        let finished = AppState {
            screen: Screen::Final,
            selected_choice_id: Some("dinner".into()),
            is_ps_open: false,
        };
        assert_eq!(state, finished);

        state = transition(&state, &AppEvent::OpenPs).into_owned();
        assert_eq!(
            state,
            AppState {
                is_ps_open: true,
                ..finished.clone()
            }
        );

        state = transition(&state, &AppEvent::ClosePs).into_owned();
        assert_eq!(state, finished);
    }

    #[test]
    fn choice_is_set_iff_final_was_reached() {
        // Walk a scrambled event sequence and check the coupling after every step.
        let events = [
            AppEvent::Yes,
            AppEvent::OpenPs,
            select("walk"),
            AppEvent::OpenEnvelope,
            AppEvent::CelebrateDone,
            AppEvent::Yes,
            select("movie"),
            AppEvent::OpenEnvelope,
            AppEvent::CelebrateDone,
            AppEvent::ClosePs,
            select("walk"),
            select("dinner"),
            AppEvent::Yes,
        ];
        let mut state = AppState::new();
        let mut reached_final = false;
        for event in &events {
            state = transition(&state, event).into_owned();
            reached_final |= state.screen == Screen::Final;
            assert!(Screen::ALL.contains(&state.screen));
            assert_eq!(state.selected_choice_id.is_some(), reached_final);
        }
        assert_eq!(state.selected_choice_id.as_deref(), Some("walk"));
    }
}
