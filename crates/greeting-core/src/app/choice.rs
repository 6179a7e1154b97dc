/// Which choice card is expanded. At most one at a time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChoicePicker {
    expanded: Option<String>,
}

impl ChoicePicker {
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Expand `id`, or collapse it if it already is.
    pub fn toggle(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    /// A card other than the expanded one renders minimized.
    pub fn is_minimized(&self, id: &str) -> bool {
        matches!(self.expanded.as_deref(), Some(open) if open != id)
    }

    pub fn clear(&mut self) {
        self.expanded = None;
    }
}
