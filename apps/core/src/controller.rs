use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::hotkey::{normalize_key, KeyCombo, Modifier};
use crate::overlay_state::SearchOverlay;
use crate::storage::KeyValueStore;
use crate::theme::{ThemeDisplay, ThemeState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Exact match: a pressed modifier the combo does not name disqualifies it.
    pub fn satisfies(&self, required: &BTreeSet<Modifier>) -> bool {
        if self.alt != required.contains(&Modifier::Alt)
            || self.shift != required.contains(&Modifier::Shift)
        {
            return false;
        }

        let need_ctrl = required.contains(&Modifier::Ctrl);
        let need_meta = required.contains(&Modifier::Meta);
        if required.contains(&Modifier::Mod) {
            return (self.ctrl || self.meta) && (self.ctrl || !need_ctrl) && (self.meta || !need_meta);
        }

        self.ctrl == need_ctrl && self.meta == need_meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    #[default]
    Document,
    TextInput,
    TextArea,
    Other,
}

impl FocusTarget {
    pub fn is_text_entry(self) -> bool {
        matches!(self, Self::TextInput | Self::TextArea)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
            focus: FocusTarget::Document,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn focused(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ToggleSearch,
    CloseSearch,
    CycleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    OverlayOpen,
    NotEditingText,
}

impl Guard {
    pub fn allows(self, event: &KeyEvent, overlay_open: bool) -> bool {
        match self {
            Self::Always => true,
            Self::OverlayOpen => overlay_open,
            Self::NotEditingText => !event.focus.is_text_entry(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub combo: KeyCombo,
    pub guard: Guard,
    pub action: Action,
}

impl Binding {
    pub fn matches(&self, event: &KeyEvent, overlay_open: bool) -> bool {
        let Ok(key) = normalize_key(&event.key) else {
            return false;
        };
        key == self.combo.key
            && event.modifiers.satisfies(&self.combo.modifiers)
            && self.guard.allows(event, overlay_open)
    }
}

pub fn default_bindings(search_hotkey: KeyCombo, theme_hotkey: KeyCombo) -> Vec<Binding> {
    let escape = KeyCombo {
        modifiers: BTreeSet::new(),
        key: "Escape".to_string(),
    };
    vec![
        Binding {
            combo: search_hotkey,
            guard: Guard::Always,
            action: Action::ToggleSearch,
        },
        Binding {
            combo: escape,
            guard: Guard::OverlayOpen,
            action: Action::CloseSearch,
        },
        Binding {
            combo: theme_hotkey,
            guard: Guard::NotEditingText,
            action: Action::CycleTheme,
        },
    ]
}

/// First binding whose combo and guard accept the event.
pub fn resolve(bindings: &[Binding], event: &KeyEvent, overlay_open: bool) -> Option<Action> {
    bindings
        .iter()
        .find(|binding| binding.matches(event, overlay_open))
        .map(|binding| binding.action)
}

pub type ListenerId = u64;

/// Where the global key listener lives (a document, a window, a test double).
pub trait ListenerHost {
    fn add_key_listener(&mut self) -> ListenerId;
    fn remove_key_listener(&mut self, id: ListenerId) -> bool;
}

#[derive(Debug, Default)]
pub struct DocumentListeners {
    next_id: ListenerId,
    active: Vec<ListenerId>,
}

impl DocumentListeners {
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl ListenerHost for DocumentListeners {
    fn add_key_listener(&mut self) -> ListenerId {
        self.next_id += 1;
        self.active.push(self.next_id);
        self.next_id
    }

    fn remove_key_listener(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|active| *active != id);
        self.active.len() != before
    }
}

/// Routes global key events to the search overlay and theme ring. Events are
/// ignored unless the controller is mounted; mounting installs exactly one
/// listener and unmounting (or dropping) removes it.
#[derive(Debug)]
pub struct InteractionController<H: ListenerHost = DocumentListeners> {
    bindings: Vec<Binding>,
    host: H,
    listener: Option<ListenerId>,
    overlay: SearchOverlay,
}

impl<H: ListenerHost> InteractionController<H> {
    pub fn new(bindings: Vec<Binding>, host: H) -> Self {
        Self {
            bindings,
            host,
            listener: None,
            overlay: SearchOverlay::default(),
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn overlay(&self) -> &SearchOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut SearchOverlay {
        &mut self.overlay
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    pub fn mount(&mut self) -> bool {
        if self.listener.is_some() {
            return false;
        }
        let id = self.host.add_key_listener();
        self.listener = Some(id);
        tracing::debug!(listener = id, "key listener mounted");
        true
    }

    pub fn unmount(&mut self) -> bool {
        let Some(id) = self.listener.take() else {
            return false;
        };
        self.host.remove_key_listener(id);
        tracing::debug!(listener = id, "key listener unmounted");
        true
    }

    /// Returns the action taken, if any; the host should then suppress the
    /// key's default behaviour.
    pub fn handle_key<S, D>(&mut self, event: &KeyEvent, theme: &mut ThemeState<S, D>) -> Option<Action>
    where
        S: KeyValueStore,
        D: ThemeDisplay,
    {
        if !self.is_mounted() {
            return None;
        }

        let action = resolve(&self.bindings, event, self.overlay.is_open())?;
        match action {
            Action::ToggleSearch => {
                self.overlay.toggle();
            }
            Action::CloseSearch => {
                self.overlay.on_escape();
            }
            Action::CycleTheme => {
                theme.cycle_theme();
            }
        }
        Some(action)
    }
}

impl<H: ListenerHost> Drop for InteractionController<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
