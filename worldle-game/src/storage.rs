//! Persistence slots over a platform key-value store.
//!
//! Each slot holds one JSON document. Documents that fail to parse are treated
//! as absent: they are logged and replaced with defaults, never surfaced to
//! the player.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

use crate::achievements::Trophy;
use crate::constants::{SLOT_HISTORY, SLOT_PREFERENCES, SLOT_SESSION, SLOT_TROPHY_BASELINE};
use crate::history::{GameRecord, HistoryAggregate};
use crate::preferences::Preferences;
use crate::session::GameSession;

/// Trait for abstracting raw slot storage.
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the document stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, slot: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the document stored in `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn write(&mut self, slot: &str, document: &str) -> Result<(), Self::Error>;

    /// Remove `slot` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    fn remove(&mut self, slot: &str) -> Result<(), Self::Error>;
}

/// Failures from [`GameStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError<E: std::error::Error + 'static> {
    #[error("storage backend failed: {0}")]
    Backend(#[source] E),
    #[error("could not encode {slot} document: {source}")]
    Encode {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("store is read-only; refused to modify {slot}")]
    ReadOnly { slot: String },
}

/// In-memory store. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A view over the same slots that rejects every mutation.
    #[must_use]
    pub fn read_only(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
            read_only: true,
        }
    }

    #[must_use]
    pub fn raw(&self, slot: &str) -> Option<String> {
        self.slots.borrow().get(slot).cloned()
    }

    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    fn guard(&self, slot: &str) -> Result<(), MemoryStoreError> {
        if self.read_only {
            return Err(MemoryStoreError::ReadOnly {
                slot: slot.to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn read(&self, slot: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(slot))
    }

    fn write(&mut self, slot: &str, document: &str) -> Result<(), Self::Error> {
        self.guard(slot)?;
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), document.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), Self::Error> {
        self.guard(slot)?;
        self.slots.borrow_mut().remove(slot);
        Ok(())
    }
}

/// Session slot document, tagged with the catalog revision it was played on.
#[derive(Serialize, Deserialize)]
struct SessionDocument {
    catalog: String,
    session: GameSession,
}

/// Typed access to the game's persistence slots.
#[derive(Debug)]
pub struct GameStore<S> {
    backend: S,
}

impl<S: KeyValueStore> GameStore<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    pub const fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// The stored session, whatever its date. Date checks happen on resume.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load_session(
        &self,
        catalog_fingerprint: u64,
    ) -> Result<Option<GameSession>, StoreError<S::Error>> {
        let Some(doc) = self.load::<SessionDocument>(SLOT_SESSION)? else {
            return Ok(None);
        };
        if doc.catalog != fingerprint_tag(catalog_fingerprint) {
            log::info!(
                "session for {} was saved against catalog {}; resuming verbatim",
                doc.session.date(),
                doc.catalog
            );
        }
        Ok(Some(doc.session))
    }

    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub fn save_session(
        &mut self,
        session: &GameSession,
        catalog_fingerprint: u64,
    ) -> Result<(), StoreError<S::Error>> {
        let doc = SessionDocument {
            catalog: fingerprint_tag(catalog_fingerprint),
            session: session.clone(),
        };
        self.save(SLOT_SESSION, &doc)
    }

    /// The full ledger; absent or malformed documents yield an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load_history(&self) -> Result<HistoryAggregate, StoreError<S::Error>> {
        Ok(self.load(SLOT_HISTORY)?.unwrap_or_default())
    }

    /// Upsert `record` into the persisted ledger and return the recomputed
    /// aggregate. Read, merge and write happen under one exclusive borrow.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read, encoded or written.
    pub fn append_record(
        &mut self,
        record: GameRecord,
    ) -> Result<HistoryAggregate, StoreError<S::Error>> {
        let mut history = self.load_history()?;
        history.append(record);
        self.save(SLOT_HISTORY, &history)?;
        Ok(history)
    }

    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load_preferences(&self) -> Result<Preferences, StoreError<S::Error>> {
        Ok(self.load(SLOT_PREFERENCES)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub fn save_preferences(
        &mut self,
        preferences: Preferences,
    ) -> Result<(), StoreError<S::Error>> {
        self.save(SLOT_PREFERENCES, &preferences)
    }

    /// Trophy snapshot used as the unlock baseline; empty when none was taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn load_baseline(&self) -> Result<Vec<Trophy>, StoreError<S::Error>> {
        Ok(self.load(SLOT_TROPHY_BASELINE)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub fn save_baseline(&mut self, trophies: &[Trophy]) -> Result<(), StoreError<S::Error>> {
        self.save(SLOT_TROPHY_BASELINE, trophies)
    }

    /// Remove every slot the game owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects a removal.
    pub fn clear_all(&mut self) -> Result<(), StoreError<S::Error>> {
        for slot in [SLOT_SESSION, SLOT_HISTORY, SLOT_PREFERENCES, SLOT_TROPHY_BASELINE] {
            self.backend.remove(slot).map_err(StoreError::Backend)?;
        }
        log::info!("cleared all persisted game state");
        Ok(())
    }

    fn load<T: DeserializeOwned>(
        &self,
        slot: &'static str,
    ) -> Result<Option<T>, StoreError<S::Error>> {
        let Some(raw) = self.backend.read(slot).map_err(StoreError::Backend)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                log::warn!("ignoring malformed {slot} document: {err}");
                Ok(None)
            }
        }
    }

    fn save<T: Serialize + ?Sized>(
        &mut self,
        slot: &'static str,
        value: &T,
    ) -> Result<(), StoreError<S::Error>> {
        let json =
            serde_json::to_string(value).map_err(|source| StoreError::Encode { slot, source })?;
        self.backend.write(slot, &json).map_err(StoreError::Backend)
    }
}

fn fingerprint_tag(fingerprint: u64) -> String {
    format!("{fingerprint:016x}")
}
