//! Record identifiers and allocation utilities.
//!
//! A [`RecordId`] is a lightweight `u64` identifier with no inherent data.
//! All record IDs are allocated by the store to ensure they are unique for
//! the lifetime of the process.

use serde::{Deserialize, Serialize};

/// A unique record identifier.
///
/// Records are addressed by ID; the ID carries no data of its own. IDs are
/// allocated by the store and never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The null / invalid record sentinel.
    pub const INVALID: RecordId = RecordId(0);

    /// Create a record ID from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) record ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record({})", self.0)
    }
}

/// Allocates monotonically increasing record IDs.
///
/// The allocator lives in the store and is the single source of record
/// identity. Records never carry their own IDs; the store hands them out
/// at creation time.
#[derive(Debug)]
pub struct RecordIdAllocator {
    next_id: u64,
}

impl RecordIdAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`RecordId::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh record ID.
    pub fn allocate(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        RecordId(id)
    }

    /// Returns the number of IDs allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for RecordIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
