//! The in-memory record store.
//!
//! Storage is the validated JSON snapshot itself, keyed by record type and
//! record ID. Writes run validation first, then emit the `Pre*` signal,
//! mutate storage, and emit the `Post*` signal — all inline on the calling
//! thread, so the write call returns only after every receiver has run.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use tabula_record::{Record, RecordId, RecordIdAllocator, RecordTypeId, ValidationError};
use tabula_signal::{SignalEvent, SignalHub, SignalKind};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this ID exists for the type.
    #[error("{type_name} {id} not found")]
    NotFound {
        /// The record type that was addressed.
        type_name: &'static str,
        /// The missing ID.
        id: RecordId,
    },

    /// The record failed its own field validation; nothing was written.
    #[error("validation failed for '{type_name}': {source}")]
    Validation {
        /// The record type that was rejected.
        type_name: &'static str,
        /// The underlying field error.
        #[source]
        source: ValidationError,
    },

    /// Failed to encode a record to, or decode one from, its JSON snapshot.
    #[error("snapshot codec error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// The persistence layer: validated snapshot storage plus the signal hub
/// that announces every write.
///
/// The store owns record identity ([`RecordIdAllocator`]) and the
/// [`SignalHub`]; receivers registered through [`Store::signals_mut`] are
/// invoked synchronously around each write.
#[derive(Debug)]
pub struct Store {
    /// Lifecycle signal receivers.
    hub: SignalHub,
    /// Single source of record identity.
    allocator: RecordIdAllocator,
    /// Snapshots keyed by record type, then record ID.
    records: HashMap<RecordTypeId, HashMap<RecordId, Value>>,
}

impl Store {
    /// Create an empty store with no receivers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hub: SignalHub::new(),
            allocator: RecordIdAllocator::new(),
            records: HashMap::new(),
        }
    }

    /// Access the signal hub.
    #[must_use]
    pub fn signals(&self) -> &SignalHub {
        &self.hub
    }

    /// Access the signal hub for receiver registration.
    pub fn signals_mut(&mut self) -> &mut SignalHub {
        &mut self.hub
    }

    // -- Writes --

    /// Validate and persist a new record, returning its allocated ID.
    ///
    /// Emits `PreSave` before the write and `PostSave` after it, both with
    /// `created = true`. Both signals run to completion on the calling
    /// thread before this returns.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] if the record rejects itself; nothing is
    /// stored and no signal fires.
    pub fn create<R: Record>(&mut self, record: R) -> Result<RecordId, StoreError> {
        record
            .validate()
            .map_err(|source| StoreError::Validation {
                type_name: R::type_name(),
                source,
            })?;
        let snapshot = serde_json::to_value(&record)?;
        let type_id = R::record_type_id();
        let id = self.allocator.allocate();

        self.hub.emit(&SignalEvent::new(
            SignalKind::PreSave,
            type_id,
            R::type_name(),
            id,
            snapshot.clone(),
            true,
        ));
        self.records.entry(type_id).or_default().insert(id, snapshot.clone());
        self.hub.emit(&SignalEvent::new(
            SignalKind::PostSave,
            type_id,
            R::type_name(),
            id,
            snapshot,
            true,
        ));

        debug!(type_name = R::type_name(), record_id = id.id(), "record created");
        Ok(id)
    }

    /// Validate and overwrite an existing record.
    ///
    /// Emits `PreSave`/`PostSave` with `created = false`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the ID is unknown, or
    /// [`StoreError::Validation`] if the record rejects itself. In either
    /// case nothing is written and no signal fires.
    pub fn update<R: Record>(&mut self, id: RecordId, record: R) -> Result<(), StoreError> {
        let type_id = R::record_type_id();
        if !self.contains(type_id, id) {
            return Err(StoreError::NotFound {
                type_name: R::type_name(),
                id,
            });
        }
        record
            .validate()
            .map_err(|source| StoreError::Validation {
                type_name: R::type_name(),
                source,
            })?;
        let snapshot = serde_json::to_value(&record)?;

        self.hub.emit(&SignalEvent::new(
            SignalKind::PreSave,
            type_id,
            R::type_name(),
            id,
            snapshot.clone(),
            false,
        ));
        self.records.entry(type_id).or_default().insert(id, snapshot.clone());
        self.hub.emit(&SignalEvent::new(
            SignalKind::PostSave,
            type_id,
            R::type_name(),
            id,
            snapshot,
            false,
        ));

        debug!(type_name = R::type_name(), record_id = id.id(), "record updated");
        Ok(())
    }

    /// Remove a record.
    ///
    /// Emits `PreDelete` with the pre-removal snapshot, removes the record,
    /// then emits `PostDelete` with the same snapshot.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the ID is unknown; no signal fires.
    pub fn delete<R: Record>(&mut self, id: RecordId) -> Result<(), StoreError> {
        let type_id = R::record_type_id();
        let snapshot = match self.records.get(&type_id).and_then(|table| table.get(&id)) {
            Some(value) => value.clone(),
            None => {
                return Err(StoreError::NotFound {
                    type_name: R::type_name(),
                    id,
                });
            }
        };

        self.hub.emit(&SignalEvent::new(
            SignalKind::PreDelete,
            type_id,
            R::type_name(),
            id,
            snapshot.clone(),
            false,
        ));
        if let Some(table) = self.records.get_mut(&type_id) {
            table.remove(&id);
        }
        self.hub.emit(&SignalEvent::new(
            SignalKind::PostDelete,
            type_id,
            R::type_name(),
            id,
            snapshot,
            false,
        ));

        debug!(type_name = R::type_name(), record_id = id.id(), "record deleted");
        Ok(())
    }

    // -- Reads --

    /// Decode a stored record.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the ID is unknown, or
    /// [`StoreError::Snapshot`] if the stored snapshot does not decode as `R`.
    pub fn get<R: Record>(&self, id: RecordId) -> Result<R, StoreError> {
        let snapshot = self
            .records
            .get(&R::record_type_id())
            .and_then(|table| table.get(&id))
            .ok_or(StoreError::NotFound {
                type_name: R::type_name(),
                id,
            })?;
        Ok(serde_json::from_value(snapshot.clone())?)
    }

    /// Check whether a record of type `R` exists.
    #[must_use]
    pub fn exists<R: Record>(&self, id: RecordId) -> bool {
        self.contains(R::record_type_id(), id)
    }

    /// Number of stored records of type `R`.
    #[must_use]
    pub fn count<R: Record>(&self) -> usize {
        self.records
            .get(&R::record_type_id())
            .map_or(0, HashMap::len)
    }

    /// All IDs of stored records of type `R`, in ascending order.
    #[must_use]
    pub fn ids<R: Record>(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self
            .records
            .get(&R::record_type_id())
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    fn contains(&self, type_id: RecordTypeId, id: RecordId) -> bool {
        self.records
            .get(&type_id)
            .is_some_and(|table| table.contains_key(&id))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde::{Deserialize, Serialize};
    use tabula_record::text;

    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Tag {
        label: String,
    }

    impl Record for Tag {
        fn type_name() -> &'static str {
            "Tag"
        }

        fn validate(&self) -> Result<(), ValidationError> {
            text::max_length("label", &self.label, 16)
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        body: String,
    }

    impl Record for Note {
        fn type_name() -> &'static str {
            "Note"
        }
    }

    fn tag(label: &str) -> Tag {
        Tag {
            label: label.to_string(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let mut store = Store::new();
        let id = store.create(tag("alpha")).unwrap();
        assert!(id.is_valid());
        assert!(store.exists::<Tag>(id));
        assert_eq!(store.get::<Tag>(id).unwrap(), tag("alpha"));
    }

    #[test]
    fn test_update_overwrites() {
        let mut store = Store::new();
        let id = store.create(tag("alpha")).unwrap();
        store.update(id, tag("beta")).unwrap();
        assert_eq!(store.get::<Tag>(id).unwrap(), tag("beta"));
        assert_eq!(store.count::<Tag>(), 1);
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let store = Store::new();
        let err = store.get::<Tag>(RecordId::from_raw(9)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = Store::new();
        let id = store.create(tag("alpha")).unwrap();
        store.delete::<Tag>(id).unwrap();
        assert!(!store.exists::<Tag>(id));
        assert!(matches!(
            store.delete::<Tag>(id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_types_are_stored_separately() {
        let mut store = Store::new();
        let tag_id = store.create(tag("alpha")).unwrap();
        let note_id = store
            .create(Note {
                body: "hello".to_string(),
            })
            .unwrap();

        assert_eq!(store.count::<Tag>(), 1);
        assert_eq!(store.count::<Note>(), 1);
        // IDs come from one allocator, so they never collide across types.
        assert_ne!(tag_id, note_id);
        // A Tag ID does not address a Note.
        assert!(!store.exists::<Note>(tag_id));
    }

    #[test]
    fn test_ids_are_sorted() {
        let mut store = Store::new();
        let a = store.create(tag("a")).unwrap();
        let b = store.create(tag("b")).unwrap();
        let c = store.create(tag("c")).unwrap();
        assert_eq!(store.ids::<Tag>(), vec![a, b, c]);
    }

    #[test]
    fn test_post_save_receiver_runs_on_caller_thread() {
        let mut store = Store::new();
        let seen = Arc::new(Mutex::new(None));

        let captured = Arc::clone(&seen);
        store
            .signals_mut()
            .connect(SignalKind::PostSave, Some(Tag::record_type_id()), move |_| {
                *captured.lock().unwrap() = Some(std::thread::current().id());
            });

        let caller_thread = std::thread::current().id();
        store.create(tag("alpha")).unwrap();

        // The receiver already ran, on this very thread.
        assert_eq!(*seen.lock().unwrap(), Some(caller_thread));
    }

    #[test]
    fn test_one_post_save_per_create() {
        let mut store = Store::new();
        let count = Arc::new(AtomicUsize::new(0));

        let captured = Arc::clone(&count);
        store
            .signals_mut()
            .connect(SignalKind::PostSave, Some(Tag::record_type_id()), move |_| {
                captured.fetch_add(1, Ordering::SeqCst);
            });

        store.create(tag("first")).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // A second create adds exactly one more invocation.
        store.create(tag("second")).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_created_flag_distinguishes_insert_from_update() {
        let mut store = Store::new();
        let flags = Arc::new(Mutex::new(Vec::new()));

        let captured = Arc::clone(&flags);
        store
            .signals_mut()
            .connect(SignalKind::PostSave, Some(Tag::record_type_id()), move |event| {
                captured.lock().unwrap().push(event.created);
            });

        let id = store.create(tag("alpha")).unwrap();
        store.update(id, tag("beta")).unwrap();

        assert_eq!(*flags.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_pre_save_fires_before_post_save() {
        let mut store = Store::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for kind in [SignalKind::PreSave, SignalKind::PostSave] {
            let order = Arc::clone(&order);
            store.signals_mut().connect(kind, None, move |event| {
                order.lock().unwrap().push(event.kind);
            });
        }

        store.create(tag("alpha")).unwrap();
        assert_eq!(
            *order.lock().unwrap(),
            vec![SignalKind::PreSave, SignalKind::PostSave]
        );
    }

    #[test]
    fn test_post_save_snapshot_matches_committed_record() {
        let mut store = Store::new();
        let seen = Arc::new(Mutex::new(None));

        let captured = Arc::clone(&seen);
        store
            .signals_mut()
            .connect(SignalKind::PostSave, Some(Tag::record_type_id()), move |event| {
                *captured.lock().unwrap() = Some(event.snapshot.clone());
            });

        store.create(tag("alpha")).unwrap();
        let snapshot = seen.lock().unwrap().take().unwrap();
        assert_eq!(snapshot["label"], "alpha");
    }

    #[test]
    fn test_validation_failure_stores_nothing_and_emits_nothing() {
        let mut store = Store::new();
        let count = Arc::new(AtomicUsize::new(0));

        for kind in SignalKind::ALL {
            let captured = Arc::clone(&count);
            store.signals_mut().connect(kind, None, move |_| {
                captured.fetch_add(1, Ordering::SeqCst);
            });
        }

        let err = store.create(tag("far too long for the bound")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
        assert_eq!(store.count::<Tag>(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_update_unknown_id_emits_nothing() {
        let mut store = Store::new();
        let count = Arc::new(AtomicUsize::new(0));

        let captured = Arc::clone(&count);
        store.signals_mut().connect(SignalKind::PostSave, None, move |_| {
            captured.fetch_add(1, Ordering::SeqCst);
        });

        let err = store.update(RecordId::from_raw(9), tag("alpha")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_delete_signals_carry_pre_removal_snapshot() {
        let mut store = Store::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for kind in [SignalKind::PreDelete, SignalKind::PostDelete] {
            let seen = Arc::clone(&seen);
            store.signals_mut().connect(kind, None, move |event| {
                seen.lock()
                    .unwrap()
                    .push((event.kind, event.snapshot.clone(), event.created));
            });
        }

        let id = store.create(tag("alpha")).unwrap();
        store.delete::<Tag>(id).unwrap();

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, SignalKind::PreDelete);
        assert_eq!(events[1].0, SignalKind::PostDelete);
        for (_, snapshot, created) in events.iter() {
            assert_eq!(snapshot["label"], "alpha");
            assert!(!created);
        }
    }

    #[test]
    fn test_receiver_filtered_to_other_type_stays_silent() {
        let mut store = Store::new();
        let count = Arc::new(AtomicUsize::new(0));

        let captured = Arc::clone(&count);
        store
            .signals_mut()
            .connect(SignalKind::PostSave, Some(Note::record_type_id()), move |_| {
                captured.fetch_add(1, Ordering::SeqCst);
            });

        store.create(tag("alpha")).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disconnected_receiver_misses_later_saves() {
        let mut store = Store::new();
        let count = Arc::new(AtomicUsize::new(0));

        let captured = Arc::clone(&count);
        let receiver = store
            .signals_mut()
            .connect(SignalKind::PostSave, None, move |_| {
                captured.fetch_add(1, Ordering::SeqCst);
            });

        store.create(tag("first")).unwrap();
        assert!(store.signals_mut().disconnect(receiver));
        store.create(tag("second")).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
