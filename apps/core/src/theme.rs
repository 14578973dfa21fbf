use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Cyber,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Cyber];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Cyber => "cyber",
        }
    }

    /// Accepts the bare identifier or a JSON-quoted one, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim().trim_matches('"').trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
    }

    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Cyber,
            Self::Cyber => Self::Dark,
        }
    }

    /// Presentation attribute set on the root display context.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Dark => "theme-dark",
            Self::Light => "theme-light",
            Self::Cyber => "theme-cyber",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global presentation context. Both calls must be idempotent.
pub trait ThemeDisplay {
    fn apply(&mut self, theme: Theme);
    fn remove(&mut self, theme: Theme);
}

/// Attribute set of the root element, as a UI host would mirror it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootAttributes {
    active: BTreeSet<&'static str>,
}

impl RootAttributes {
    pub fn active(&self) -> Vec<&'static str> {
        self.active.iter().copied().collect()
    }

    pub fn is_active(&self, theme: Theme) -> bool {
        self.active.contains(theme.attribute())
    }
}

impl ThemeDisplay for RootAttributes {
    fn apply(&mut self, theme: Theme) {
        self.active.insert(theme.attribute());
    }

    fn remove(&mut self, theme: Theme) {
        self.active.remove(theme.attribute());
    }
}

/// Ring `dark -> light -> cyber -> dark`. Every transition persists the new
/// theme and leaves exactly one theme attribute applied on the display.
#[derive(Debug)]
pub struct ThemeState<S: KeyValueStore, D: ThemeDisplay = RootAttributes> {
    store: S,
    display: D,
    current: Theme,
}

impl<S: KeyValueStore, D: ThemeDisplay> ThemeState<S, D> {
    pub fn load(store: S, mut display: D) -> Self {
        let current = load_theme(&store);
        for theme in Theme::ALL {
            if theme != current {
                display.remove(theme);
            }
        }
        display.apply(current);

        Self {
            store,
            display,
            current,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn set_theme(&mut self, theme: Theme) {
        let previous = self.current;
        if let Err(error) = self.store.set(THEME_KEY, theme.as_str()) {
            tracing::warn!(%error, %theme, "failed to persist theme; keeping in-memory state");
        }
        self.display.remove(previous);
        self.display.apply(theme);
        self.current = theme;
        tracing::debug!(from = %previous, to = %theme, "theme changed");
    }

    pub fn cycle_theme(&mut self) -> Theme {
        let next = self.current.next();
        self.set_theme(next);
        next
    }
}

fn load_theme<S: KeyValueStore>(store: &S) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "unknown persisted theme; using default");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(error) => {
            tracing::warn!(%error, "failed to read theme slot; using default");
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn ring_closes_after_three_steps() {
        for start in Theme::ALL {
            assert_eq!(start.next().next().next(), start);
        }
        assert_eq!(Theme::Cyber.next(), Theme::Dark);
    }

    #[test]
    fn parse_accepts_quoted_and_mixed_case() {
        assert_eq!(Theme::parse("\"Light\""), Some(Theme::Light));
        assert_eq!(Theme::parse(" CYBER "), Some(Theme::Cyber));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
