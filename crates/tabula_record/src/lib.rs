//! # tabula_record
//!
//! Record identity and the storage contract for the tabula store.
//!
//! This crate provides:
//!
//! - [`Record`] trait — the contract all storable data must satisfy.
//! - [`RecordTypeId`] — stable type identity derived from the type name.
//! - [`RecordId`] — lightweight `u64` record identifiers.
//! - [`RecordIdAllocator`] — monotonically increasing ID allocator.
//! - [`ValidationError`] and the [`text`] validators — field checks the
//!   store applies before a write.

pub mod id;
pub mod record;
pub mod validate;

pub use id::{RecordId, RecordIdAllocator};
pub use record::{Record, RecordTypeId};
pub use validate::{ValidationError, text};
