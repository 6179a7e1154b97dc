//! Focus bookkeeping for the PS modal.
//!
//! Opening remembers who held focus; every way of dismissing (close
//! button, backdrop, Escape) has the same effect and hands that element
//! back.

/// How the modal was dismissed. All variants close it identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseButton,
    Backdrop,
    Escape,
}

impl DismissReason {
    /// Map a keyboard `key` value to a dismissal, if it is one.
    pub fn from_key(key: &str) -> Option<Self> {
        (key == "Escape").then_some(DismissReason::Escape)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ModalFocus {
    open: bool,
    restore_to: Option<String>,
}

impl ModalFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns false if it was already open; the first remembered element wins.
    pub fn open(&mut self, focused: Option<String>) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.restore_to = focused;
        true
    }

    /// Close and return the element to refocus, if any.
    pub fn close(&mut self) -> Option<String> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.restore_to.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_restores_previous_focus() {
        let mut modal = ModalFocus::new();
        assert!(modal.open(Some("ps-button".into())));
        assert!(!modal.open(Some("close".into())));
        assert_eq!(modal.close(), Some("ps-button".to_string()));
        assert!(!modal.is_open());
        assert_eq!(modal.close(), None);
    }

    #[test]
    fn only_escape_key_dismisses() {
        assert_eq!(DismissReason::from_key("Escape"), Some(DismissReason::Escape));
        assert_eq!(DismissReason::from_key("Enter"), None);
    }
}
