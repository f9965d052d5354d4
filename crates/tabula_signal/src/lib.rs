//! # tabula_signal
//!
//! Lifecycle signal dispatch for the tabula store.
//!
//! The store emits a signal around every write: `PreSave`/`PostSave` for
//! creates and updates, `PreDelete`/`PostDelete` for removals. Receivers are
//! registered on a [`SignalHub`] during process initialisation and invoked
//! **synchronously, in registration order, on the thread that performed the
//! write** — there is no queue and no thread hand-off. The triggering store
//! call does not return until the last receiver has.
//!
//! This crate provides:
//!
//! - [`SignalKind`] — the lifecycle events a store emits.
//! - [`SignalEvent`] — the immutable payload passed to receivers.
//! - [`SignalHub`] — ordered receiver registration and dispatch.
//!
//! ## Usage
//!
//! ```rust
//! use tabula_record::RecordTypeId;
//! use tabula_signal::{SignalHub, SignalKind};
//!
//! let mut hub = SignalHub::new();
//! let id = hub.connect(SignalKind::PostSave, Some(RecordTypeId::from_name("Tag")), |event| {
//!     println!("saved {} (created: {})", event.record_id, event.created);
//! });
//! assert_eq!(hub.receiver_count(SignalKind::PostSave), 1);
//! assert!(hub.disconnect(id));
//! ```

pub mod event;
pub mod hub;
pub mod kind;

pub use event::SignalEvent;
pub use hub::{Receiver, ReceiverId, SignalHub};
pub use kind::SignalKind;
