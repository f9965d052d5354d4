//! Core [`Record`] trait and type identity.
//!
//! Every piece of data stored in the tabula store must implement [`Record`].
//! The trait requires `Send + Sync + 'static` plus serde bounds so records
//! can be snapshotted to JSON on write and decoded back on read.
//!
//! ## Type Identity
//!
//! [`RecordTypeId`] is derived from the record's **string name** using the
//! FNV-1a 64-bit hash algorithm. The derivation is deterministic: the same
//! name always produces the same ID, across runs and processes. Signal
//! receivers use it to filter on the sender type.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// A unique identifier for a record type, derived from its string name
/// using the FNV-1a 64-bit hash algorithm.
///
/// The ID is deterministic: hashing the same UTF-8 name bytes always yields
/// the same `RecordTypeId`, so it is stable enough to key storage tables and
/// sender filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RecordTypeId(pub u64);

impl RecordTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`RecordTypeId`] from a record type's string name using
    /// the FNV-1a 64-bit hash algorithm.
    ///
    /// This is the **canonical** way to derive a `RecordTypeId`.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`RecordTypeId`] for a Rust record type `R`.
    ///
    /// This calls `R::type_name()` and hashes it with FNV-1a, producing the
    /// same result as [`RecordTypeId::from_name`] with the same string.
    #[must_use]
    pub fn of<R: Record>() -> Self {
        Self::from_name(R::type_name())
    }
}

/// The core record trait.
///
/// All data stored in the tabula store must implement this trait. Records
/// must be serialisable so the store can keep immutable JSON snapshots, and
/// `Send + Sync` so a store can be moved between threads.
///
/// [`Record::validate`] is the hook for field invariants; the store calls it
/// before every write and refuses the write on error. The default accepts
/// everything.
///
/// # Examples
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use tabula_record::{Record, ValidationError, text};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Record for Tag {
///     fn type_name() -> &'static str { "Tag" }
///
///     fn validate(&self) -> Result<(), ValidationError> {
///         text::max_length("label", &self.label, 32)
///     }
/// }
/// ```
pub trait Record: Send + Sync + 'static + Serialize + for<'de> Deserialize<'de> {
    /// A human-readable name for this record type.
    fn type_name() -> &'static str;

    /// Returns the [`RecordTypeId`] for this record type.
    ///
    /// The default implementation hashes [`Record::type_name()`] with
    /// FNV-1a 64-bit, producing a deterministic ID.
    fn record_type_id() -> RecordTypeId {
        RecordTypeId::from_name(Self::type_name())
    }

    /// Check this record's field invariants.
    ///
    /// Called by the store before every write. Returning an error aborts
    /// the write before anything is stored or any signal fires.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
