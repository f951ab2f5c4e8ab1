use crate::events::model::Event;
use crate::storage::{KeyValueStore, StoreError};
use itertools::Itertools;
use tracing::{error, info, warn};

pub const FAVORITES_KEY: &str = "escale_favorites";

/// Unreadable or corrupted data counts as no favorites.
pub fn load_favorites<S: KeyValueStore>(store: &S) -> Vec<Event> {
    let raw = match store.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Could not read favorites: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Event>>(&raw) {
        Ok(favorites) => favorites
            .into_iter()
            .unique_by(|event| event.id.clone())
            .collect(),
        Err(e) => {
            warn!("Stored favorites are corrupted, ignoring them: {}", e);
            Vec::new()
        }
    }
}

pub fn save_favorites<S: KeyValueStore>(store: &mut S, favorites: &[Event]) -> Result<(), StoreError> {
    store.set(FAVORITES_KEY, serde_json::to_string(favorites)?)
}

/// Saved events, deduplicated by id and written through on every change.
pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
    favorites: Vec<Event>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn load(store: S) -> Self {
        let favorites = load_favorites(&store);

        info!("Loaded {} favorites", favorites.len());

        Self { store, favorites }
    }

    pub fn events(&self) -> &[Event] {
        &self.favorites
    }

    pub fn contains(&self, id: &str) -> bool {
        self.favorites.iter().any(|favorite| favorite.id == id)
    }

    /// Returns whether the event is a favorite afterwards.
    #[tracing::instrument(skip(self, event), fields(event = %event.id))]
    pub fn toggle(&mut self, event: &Event) -> bool {
        let favorited = if self.contains(&event.id) {
            self.favorites.retain(|favorite| favorite.id != event.id);
            false
        } else {
            self.favorites.push(event.clone());
            true
        };

        if let Err(e) = save_favorites(&mut self.store, &self.favorites) {
            error!("Failed to persist favorites: {}", e);
        }

        favorited
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
