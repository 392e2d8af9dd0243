use crate::api::{ApiResult, RagApi};
use crate::controllers::ConfirmPrompt;
use crate::types::ChatSession;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Fixed page size for session listing.
pub const SESSION_PAGE_SIZE: u32 = 20;

/// Paginated cache of chat sessions, most-recent-first as the backend returns
/// them. Pages are fetched incrementally; a short page marks the end.
pub struct SessionListController {
    api: Arc<dyn RagApi>,
    confirm: Arc<dyn ConfirmPrompt>,
    sessions: Mutex<Vec<ChatSession>>,
    page: AtomicU32,
    has_more: AtomicBool,
    loading: AtomicBool,
    load_token: AtomicU64,
}

impl SessionListController {
    pub fn new(api: Arc<dyn RagApi>, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            api,
            confirm,
            sessions: Mutex::new(Vec::new()),
            page: AtomicU32::new(1),
            has_more: AtomicBool::new(true),
            loading: AtomicBool::new(false),
            load_token: AtomicU64::new(0),
        }
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.lock().expect("session cache poisoned").clone()
    }

    pub fn has_more(&self) -> bool {
        self.has_more.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn current_page(&self) -> u32 {
        self.page.load(Ordering::SeqCst)
    }

    /// Fetch one page. `append` concatenates onto the cached sequence;
    /// otherwise the sequence is replaced wholesale. A page shorter than
    /// [`SESSION_PAGE_SIZE`] is the last page.
    ///
    /// A response that resolves after a newer load started is discarded, so a
    /// slow early load can never overwrite a later one.
    pub async fn load(&self, page: u32, append: bool) -> ApiResult<()> {
        let token = self.load_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let result = self.api.list_sessions(page, SESSION_PAGE_SIZE).await;

        if self.load_token.load(Ordering::SeqCst) != token {
            // a newer load owns the state now
            return Ok(());
        }
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(batch) => {
                self.has_more
                    .store(batch.len() as u32 == SESSION_PAGE_SIZE, Ordering::SeqCst);
                self.page.store(page, Ordering::SeqCst);
                let mut sessions = self.sessions.lock().expect("session cache poisoned");
                if append {
                    sessions.extend(batch);
                } else {
                    *sessions = batch;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load sessions page {page}: {err}");
                Err(err)
            }
        }
    }

    /// Fetch the next page. Does nothing, and issues no request, while a load
    /// is in flight or when the last page was already reached.
    pub async fn load_more(&self) -> ApiResult<()> {
        if self.loading.load(Ordering::SeqCst) || !self.has_more.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.load(self.page.load(Ordering::SeqCst) + 1, true).await
    }

    /// Reset to the first page. Used after external events such as a session
    /// created by the conversation controller.
    pub async fn refresh(&self) -> ApiResult<()> {
        self.load(1, false).await
    }

    /// Delete a session after user confirmation. Returns `false` when the
    /// user declined (no request issued). The caller is responsible for
    /// leaving the conversation if the deleted session was active.
    pub async fn delete(&self, session_id: i64) -> ApiResult<bool> {
        if !self.confirm.confirm("Delete this chat session?") {
            return Ok(false);
        }

        match self.api.delete_session(session_id).await {
            Ok(()) => {
                self.sessions
                    .lock()
                    .expect("session cache poisoned")
                    .retain(|s| s.id != session_id);
                Ok(true)
            }
            Err(err) => {
                tracing::error!("failed to delete session {session_id}: {err}");
                Err(err)
            }
        }
    }
}
