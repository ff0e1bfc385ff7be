//! Process-wide registry of display handles.
//!
//! A display handle is an ephemeral, locally-resolvable reference to an
//! encoded payload held for preview. Handles follow scoped-resource
//! semantics: acquire on creation, release exactly once when the payload is
//! discarded or replaced. Release is idempotent so double-cleanup paths stay
//! harmless.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use tracing::debug;

/// An opaque reference to a registered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(u64);

/// Registry mapping live handles to their payloads.
///
/// The map is the only resource shared across concurrent callers; each
/// handle itself is owned by whichever caller created it.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    entries: Mutex<HashMap<u64, Bytes>>,
    next_id: AtomicU64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a payload and returns a handle bound 1:1 to it.
    pub fn register(&self, data: Bytes) -> DisplayHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, data);
        debug!("Registered display handle {id}");
        DisplayHandle(id)
    }

    /// Resolves a handle to its payload, if still registered.
    pub fn resolve(&self, handle: DisplayHandle) -> Option<Bytes> {
        self.lock().get(&handle.0).cloned()
    }

    /// Releases a handle.
    ///
    /// Best-effort and idempotent: releasing an already released or unknown
    /// handle is a no-op.
    pub fn release(&self, handle: DisplayHandle) {
        if self.lock().remove(&handle.0).is_some() {
            debug!("Released display handle {}", handle.0);
        }
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Bytes>> {
        // A poisoned lock only means a panic elsewhere; the map is still valid
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
