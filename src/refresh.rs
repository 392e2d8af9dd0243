//! Cross-controller refresh signal.
//!
//! Actions in one controller sometimes need another controller to reload its
//! authoritative state: sending the first message of a conversation creates a
//! session the session list has never seen, and uploads change the document
//! library. The bus carries those notifications without the controllers
//! holding references to each other. It is owned by the composition root and
//! handed to each controller at construction.

use std::sync::{Arc, Mutex};

type RefreshFn = Box<dyn Fn() + Send + Sync>;

#[derive(Clone, Default)]
pub struct RefreshBus {
    inner: Arc<Slots>,
}

#[derive(Default)]
struct Slots {
    sessions: Mutex<Option<RefreshFn>>,
    documents: Mutex<Option<RefreshFn>>,
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the session-list refresh callback. Re-registration replaces
    /// the previous callback; it does not stack.
    pub fn on_sessions(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.inner.sessions.lock().expect("refresh bus poisoned") = Some(Box::new(callback));
    }

    /// Register the document-library refresh callback. Same replacement
    /// semantics as [`Self::on_sessions`].
    pub fn on_documents(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.inner.documents.lock().expect("refresh bus poisoned") = Some(Box::new(callback));
    }

    /// Invoke the session-list callback; a no-op when nothing is registered.
    pub fn notify_sessions(&self) {
        if let Some(cb) = self
            .inner
            .sessions
            .lock()
            .expect("refresh bus poisoned")
            .as_ref()
        {
            cb();
        }
    }

    /// Invoke the document-library callback; a no-op when nothing is
    /// registered.
    pub fn notify_documents(&self) {
        if let Some(cb) = self
            .inner
            .documents
            .lock()
            .expect("refresh bus poisoned")
            .as_ref()
        {
            cb();
        }
    }
}
