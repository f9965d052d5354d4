//! # tabula_store
//!
//! The persistence layer: an in-memory store that validates records on the
//! way in, keeps immutable JSON snapshots, and emits lifecycle signals
//! through an owned [`SignalHub`](tabula_signal::SignalHub) around every
//! write.
//!
//! Dispatch is strictly synchronous. When [`Store::create`] returns, every
//! `PreSave` and `PostSave` receiver has already run — on the same thread
//! that called `create`.
//!
//! ## Usage
//!
//! ```rust
//! use serde::{Serialize, Deserialize};
//! use tabula_record::Record;
//! use tabula_signal::SignalKind;
//! use tabula_store::Store;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Tag {
//!     label: String,
//! }
//!
//! impl Record for Tag {
//!     fn type_name() -> &'static str { "Tag" }
//! }
//!
//! let mut store = Store::new();
//! store.signals_mut().connect(SignalKind::PostSave, Some(Tag::record_type_id()), |event| {
//!     println!("saved {}", event.record_id);
//! });
//!
//! let id = store.create(Tag { label: "alpha".to_string() }).unwrap();
//! let tag: Tag = store.get(id).unwrap();
//! assert_eq!(tag.label, "alpha");
//! ```

pub mod store;

pub use store::{Store, StoreError};
