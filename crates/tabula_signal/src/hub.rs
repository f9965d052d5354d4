//! Receiver registration and synchronous dispatch.
//!
//! The hub maintains, per [`SignalKind`], an ordered list of receivers.
//! [`SignalHub::emit`] walks that list on the calling thread and invokes
//! every receiver whose sender filter matches, in the order they were
//! connected. It returns only after the last receiver returns.

use std::collections::HashMap;

use tracing::{debug, trace};
use uuid::Uuid;

use tabula_record::RecordTypeId;

use crate::event::SignalEvent;
use crate::kind::SignalKind;

/// A signal receiver.
///
/// Receivers run synchronously on the thread that performed the triggering
/// write. A panicking receiver unwinds through [`SignalHub::emit`] into the
/// triggering store call; the hub applies no catch or retry policy.
pub type Receiver = Box<dyn Fn(&SignalEvent) + Send>;

/// Handle identifying one connected receiver.
///
/// Returned by [`SignalHub::connect`]; pass it to [`SignalHub::disconnect`]
/// to stop delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(Uuid);

impl ReceiverId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One connected receiver with its sender filter.
struct Registration {
    id: ReceiverId,
    sender: Option<RecordTypeId>,
    receiver: Receiver,
}

impl Registration {
    /// Whether this registration wants events from the given sender type.
    fn matches(&self, record_type: RecordTypeId) -> bool {
        match self.sender {
            Some(wanted) => wanted == record_type,
            None => true,
        }
    }
}

/// Ordered receiver table for every signal kind.
///
/// The hub is owned by the store; registration normally happens once during
/// process initialisation, before the first write.
#[derive(Default)]
pub struct SignalHub {
    receivers: HashMap<SignalKind, Vec<Registration>>,
}

impl SignalHub {
    /// Create a new hub with no receivers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            receivers: HashMap::new(),
        }
    }

    /// Connect a receiver for a signal kind.
    ///
    /// `sender` restricts delivery to events from one record type;
    /// `None` receives the kind for all types. Receivers fire in the order
    /// they were connected, filtered and unfiltered interleaved.
    pub fn connect<F>(
        &mut self,
        kind: SignalKind,
        sender: Option<RecordTypeId>,
        receiver: F,
    ) -> ReceiverId
    where
        F: Fn(&SignalEvent) + Send + 'static,
    {
        let id = ReceiverId::new();
        self.receivers.entry(kind).or_default().push(Registration {
            id,
            sender,
            receiver: Box::new(receiver),
        });
        debug!(
            kind = kind.as_str(),
            receiver_id = %id,
            filtered = sender.is_some(),
            "receiver connected"
        );
        id
    }

    /// Disconnect a receiver by handle.
    ///
    /// Returns `true` if the receiver was found and removed.
    pub fn disconnect(&mut self, id: ReceiverId) -> bool {
        for (kind, list) in &mut self.receivers {
            if let Some(pos) = list.iter().position(|reg| reg.id == id) {
                list.remove(pos);
                debug!(kind = kind.as_str(), receiver_id = %id, "receiver disconnected");
                return true;
            }
        }
        false
    }

    /// Synchronously invoke every receiver matching the event.
    ///
    /// Receivers run on the calling thread, in registration order. This
    /// returns only after the last matching receiver has returned; there is
    /// no queue and no hand-off.
    pub fn emit(&self, event: &SignalEvent) {
        let Some(list) = self.receivers.get(&event.kind) else {
            return;
        };

        let mut delivered = 0usize;
        for reg in list {
            if reg.matches(event.record_type) {
                trace!(
                    kind = event.kind.as_str(),
                    receiver_id = %reg.id,
                    record_id = event.record_id.id(),
                    "invoking receiver"
                );
                (reg.receiver)(event);
                delivered += 1;
            }
        }

        debug!(
            kind = event.kind.as_str(),
            type_name = event.type_name,
            record_id = event.record_id.id(),
            delivered,
            "signal dispatched"
        );
    }

    /// Number of receivers connected for a kind (filtered or not).
    #[must_use]
    pub fn receiver_count(&self, kind: SignalKind) -> usize {
        self.receivers.get(&kind).map_or(0, Vec::len)
    }

    /// Total number of connected receivers across all kinds.
    #[must_use]
    pub fn total_receivers(&self) -> usize {
        self.receivers.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHub")
            .field("receivers", &self.total_receivers())
            .finish()
    }
}
