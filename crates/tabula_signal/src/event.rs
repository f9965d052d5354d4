//! The payload delivered to signal receivers.

use serde_json::Value;

use tabula_record::{RecordId, RecordTypeId};

use crate::kind::SignalKind;

/// An immutable snapshot of one store write, passed by reference to every
/// matching receiver.
///
/// The `snapshot` is the record as committed (for delete kinds: as it was
/// before removal). Receivers never see, and cannot reach, the store's
/// mutable state.
#[derive(Debug, Clone)]
pub struct SignalEvent {
    /// Which lifecycle event this is.
    pub kind: SignalKind,
    /// The sender's type identity, for filtering.
    pub record_type: RecordTypeId,
    /// The sender's human-readable type name.
    pub type_name: &'static str,
    /// The record the event is about.
    pub record_id: RecordId,
    /// JSON snapshot of the record's fields.
    pub snapshot: Value,
    /// `true` only for the save pair of an insert; always `false` for
    /// updates and for the delete kinds.
    pub created: bool,
}

impl SignalEvent {
    /// Build an event for a write.
    #[must_use]
    pub fn new(
        kind: SignalKind,
        record_type: RecordTypeId,
        type_name: &'static str,
        record_id: RecordId,
        snapshot: Value,
        created: bool,
    ) -> Self {
        Self {
            kind,
            record_type,
            type_name,
            record_id,
            snapshot,
            created,
        }
    }
}
