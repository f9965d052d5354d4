//! Lifecycle signal kinds.

use serde::{Deserialize, Serialize};

/// The lifecycle events a store emits around writes.
///
/// The `Pre*` kinds fire before the storage mutation, the `Post*` kinds
/// immediately after it. All four are dispatched synchronously on the
/// thread performing the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// About to write a record (create or update).
    PreSave,
    /// A record was written (create or update).
    PostSave,
    /// About to remove a record.
    PreDelete,
    /// A record was removed.
    PostDelete,
}

impl SignalKind {
    /// All signal kinds, in lifecycle order.
    pub const ALL: [SignalKind; 4] = [
        SignalKind::PreSave,
        SignalKind::PostSave,
        SignalKind::PreDelete,
        SignalKind::PostDelete,
    ];

    /// A stable lowercase name, used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SignalKind::PreSave => "pre_save",
            SignalKind::PostSave => "post_save",
            SignalKind::PreDelete => "pre_delete",
            SignalKind::PostDelete => "post_delete",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
