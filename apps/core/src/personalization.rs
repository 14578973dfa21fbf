use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, FAVORITES_KEY, RECENT_KEY};

pub const MAX_RECENT: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalizationState {
    favorites: HashSet<String>,
    recent: Vec<String>,
}

impl PersonalizationState {
    pub fn is_favorite(&self, calculator_id: &str) -> bool {
        self.favorites.contains(calculator_id)
    }

    /// Favorites sorted by id, the order they are persisted in.
    pub fn favorites(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.favorites.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    /// Returns the new membership.
    fn toggle_favorite(&mut self, calculator_id: &str) -> bool {
        if self.favorites.remove(calculator_id) {
            false
        } else {
            self.favorites.insert(calculator_id.to_string());
            true
        }
    }

    fn push_recent(&mut self, calculator_id: &str) {
        self.recent.retain(|id| id != calculator_id);
        self.recent.insert(0, calculator_id.to_string());
        self.recent.truncate(MAX_RECENT);
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct IdList(Vec<String>);

pub fn encode_ids(ids: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&IdList(ids.to_vec()))
}

pub fn decode_ids(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str::<IdList>(raw).map(|list| list.0)
}

/// Favorites and recently opened calculators, loaded once and written back on
/// every change. The two slots are independent: a corrupt favorites slot never
/// affects recents and vice versa. Ids are not checked against the catalog.
#[derive(Debug)]
pub struct PersonalizationStore<S: KeyValueStore> {
    store: S,
    state: PersonalizationState,
}

impl<S: KeyValueStore> PersonalizationStore<S> {
    pub fn load(store: S) -> Self {
        let favorites: HashSet<String> = load_ids(&store, FAVORITES_KEY).into_iter().collect();

        let mut recent: Vec<String> = Vec::new();
        for id in load_ids(&store, RECENT_KEY) {
            if !recent.contains(&id) {
                recent.push(id);
            }
        }
        recent.truncate(MAX_RECENT);

        Self {
            store,
            state: PersonalizationState { favorites, recent },
        }
    }

    pub fn state(&self) -> &PersonalizationState {
        &self.state
    }

    pub fn is_favorite(&self, calculator_id: &str) -> bool {
        self.state.is_favorite(calculator_id)
    }

    pub fn favorites(&self) -> Vec<String> {
        self.state.favorites()
    }

    pub fn recent(&self) -> &[String] {
        self.state.recent()
    }

    pub fn toggle_favorite(&mut self, calculator_id: &str) -> bool {
        let now_favorite = self.state.toggle_favorite(calculator_id);
        self.persist_favorites();
        now_favorite
    }

    pub fn remove_favorite(&mut self, calculator_id: &str) {
        if self.state.favorites.remove(calculator_id) {
            self.persist_favorites();
        }
    }

    pub fn add_to_recent(&mut self, calculator_id: &str) {
        self.state.push_recent(calculator_id);
        self.persist_recent();
    }

    pub fn clear_recent(&mut self) {
        self.state.recent.clear();
        self.persist_recent();
    }

    fn persist_favorites(&self) {
        save_ids(&self.store, FAVORITES_KEY, &self.state.favorites());
    }

    fn persist_recent(&self) {
        save_ids(&self.store, RECENT_KEY, &self.state.recent);
    }
}

fn load_ids<S: KeyValueStore>(store: &S, key: &str) -> Vec<String> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(key, %error, "failed to read personalization slot; using default");
            return Vec::new();
        }
    };

    match decode_ids(&raw) {
        Ok(ids) => ids,
        Err(error) => {
            tracing::warn!(key, %error, "corrupt personalization slot; using default");
            Vec::new()
        }
    }
}

fn save_ids<S: KeyValueStore>(store: &S, key: &str, ids: &[String]) {
    let encoded = match encode_ids(ids) {
        Ok(encoded) => encoded,
        Err(error) => {
            tracing::warn!(key, %error, "failed to encode personalization slot");
            return;
        }
    };
    if let Err(error) = store.set(key, &encoded) {
        tracing::warn!(key, %error, "failed to persist personalization slot; keeping in-memory state");
    }
}
