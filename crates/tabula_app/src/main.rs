//! # tabula_app — synchronous-dispatch demonstration
//!
//! Shows that a post-save receiver runs on the same thread as the code that
//! triggered the save. The program:
//!
//! 1. Builds a [`Store`] and connects a `PostSave` receiver for
//!    [`NamedRecord`] that prints the thread it runs in.
//! 2. Prints the caller's thread.
//! 3. Creates one `NamedRecord`.
//!
//! Expected output: two lines naming the identical thread, caller first —
//! the receiver ran inline, before `create` returned.

mod models;

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tabula_record::Record;
use tabula_signal::SignalKind;
use tabula_store::Store;

use models::NamedRecord;

fn current_thread_name() -> String {
    std::thread::current().name().unwrap_or("<unnamed>").to_string()
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tabula_app=info".parse()?))
        .init();

    info!("store starting");

    let mut store = Store::new();

    store.signals_mut().connect(
        SignalKind::PostSave,
        Some(NamedRecord::record_type_id()),
        |event| {
            println!("signal receiver running in thread: {}", current_thread_name());
            debug!(
                record_id = event.record_id.id(),
                created = event.created,
                "post-save receiver fired"
            );
        },
    );

    println!("caller running in thread: {}", current_thread_name());
    let id = store.create(NamedRecord::new("Test"))?;

    info!(record_id = id.id(), "record created, receiver already ran");
    Ok(())
}
