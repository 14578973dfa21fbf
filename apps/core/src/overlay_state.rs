#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Opened,
    Closed,
}

/// Search overlay visibility plus the query typed into it. Closing always
/// discards the query so the next open starts fresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOverlay {
    open: bool,
    query: String,
}

impl SearchOverlay {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        true
    }

    pub fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        self.query.clear();
        was_open
    }

    pub fn toggle(&mut self) -> OverlayTransition {
        if self.open {
            self.close();
            OverlayTransition::Closed
        } else {
            self.open();
            OverlayTransition::Opened
        }
    }

    pub fn on_escape(&mut self) -> bool {
        if self.open {
            self.close();
            return true;
        }
        false
    }

    pub fn set_query(&mut self, query: &str) {
        self.query.clear();
        self.query.push_str(query);
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlayTransition, SearchOverlay};

    #[test]
    fn toggle_opens_hidden_overlay() {
        let mut overlay = SearchOverlay::default();
        assert_eq!(overlay.toggle(), OverlayTransition::Opened);
        assert!(overlay.is_open());
    }

    #[test]
    fn toggle_closes_and_clears_query() {
        let mut overlay = SearchOverlay::default();
        overlay.toggle();
        overlay.set_query("loan");
        assert_eq!(overlay.toggle(), OverlayTransition::Closed);
        assert!(!overlay.is_open());
        assert_eq!(overlay.query(), "");
    }

    #[test]
    fn opening_keeps_existing_query() {
        let mut overlay = SearchOverlay::default();
        overlay.set_query("tip");
        assert!(overlay.open());
        assert_eq!(overlay.query(), "tip");
        assert!(!overlay.open());
    }

    #[test]
    fn escape_closes_only_when_open() {
        let mut overlay = SearchOverlay::default();
        assert!(!overlay.on_escape());
        overlay.toggle();
        overlay.set_query("bmi");
        assert!(overlay.on_escape());
        assert!(!overlay.is_open());
        assert_eq!(overlay.query(), "");
    }
}
