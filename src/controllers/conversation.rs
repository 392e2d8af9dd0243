use crate::api::{ApiError, ApiResult, RagApi};
use crate::refresh::RefreshBus;
use crate::types::ChatMessage;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Longest session title derived from a first message, in characters.
pub const TITLE_MAX_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversationState {
    /// New, unsaved conversation; nothing exists server-side yet.
    NoSession,
    /// A session is selected and its history is being fetched.
    Loading,
    /// A session is selected and its history is cached.
    Ready,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("a message is already being sent")]
    AlreadySending,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Session title for a conversation started by its first message: the first
/// [`TITLE_MAX_CHARS`] characters, with an ellipsis marker when truncated.
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Message history for at most one active session. This is the hub: sending
/// the first message of a new conversation provisions the session, adopts its
/// id, and tells the session list to refresh.
pub struct ConversationController {
    api: Arc<dyn RagApi>,
    bus: RefreshBus,
    active: Mutex<Option<i64>>,
    messages: Mutex<Vec<ChatMessage>>,
    loading: AtomicBool,
    sending: AtomicBool,
    load_token: AtomicU64,
}

impl ConversationController {
    pub fn new(api: Arc<dyn RagApi>, bus: RefreshBus) -> Self {
        Self {
            api,
            bus,
            active: Mutex::new(None),
            messages: Mutex::new(Vec::new()),
            loading: AtomicBool::new(false),
            sending: AtomicBool::new(false),
            load_token: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ConversationState {
        if self.active.lock().expect("active session poisoned").is_none() {
            ConversationState::NoSession
        } else if self.loading.load(Ordering::SeqCst) {
            ConversationState::Loading
        } else {
            ConversationState::Ready
        }
    }

    pub fn active_session(&self) -> Option<i64> {
        *self.active.lock().expect("active session poisoned")
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().expect("message cache poisoned").clone()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Switch to an existing session and fetch its history.
    pub async fn select_session(&self, session_id: i64) -> ApiResult<()> {
        *self.active.lock().expect("active session poisoned") = Some(session_id);
        self.reload_messages(session_id).await
    }

    /// Leave the current session: no active session, empty history. Any
    /// in-flight history load is orphaned and will be discarded when it
    /// resolves.
    pub fn new_conversation(&self) {
        self.load_token.fetch_add(1, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
        *self.active.lock().expect("active session poisoned") = None;
        self.messages.lock().expect("message cache poisoned").clear();
    }

    /// Send a message to the active session, creating the session first when
    /// there is none. At most one send is in flight per controller; a second
    /// attempt is rejected before any network call. Empty input is ignored.
    ///
    /// The backend owns the assistant reply and its citations, so after a
    /// successful send the full history is re-fetched instead of merging
    /// locally.
    pub async fn send_message(&self, text: &str) -> Result<(), SendError> {
        let content = text.trim();
        if content.is_empty() {
            return Ok(());
        }

        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SendError::AlreadySending);
        }

        let result = self.send_inner(content).await;
        self.sending.store(false, Ordering::SeqCst);
        result
    }

    async fn send_inner(&self, content: &str) -> Result<(), SendError> {
        let session_id = match self.active_session() {
            Some(id) => id,
            None => {
                let session = self.api.create_session(&derive_title(content)).await?;
                *self.active.lock().expect("active session poisoned") = Some(session.id);
                self.bus.notify_sessions();
                session.id
            }
        };

        self.api.send_message(session_id, content).await?;

        // The send itself succeeded; a failed history refresh is already
        // logged and retriable by the next action.
        let _ = self.reload_messages(session_id).await;
        self.bus.notify_sessions();
        Ok(())
    }

    /// Token-guarded history fetch: a response that resolves after the user
    /// switched sessions (or after a newer load started) is discarded rather
    /// than applied to the wrong conversation.
    async fn reload_messages(&self, session_id: i64) -> ApiResult<()> {
        let token = self.load_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let result = self.api.list_messages(session_id).await;

        if self.load_token.load(Ordering::SeqCst) != token
            || self.active_session() != Some(session_id)
        {
            return Ok(());
        }
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(history) => {
                *self.messages.lock().expect("message cache poisoned") = history;
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load messages for session {session_id}: {err}");
                Err(err)
            }
        }
    }
}
