//! Composition root: builds the gateway, controllers, health monitor, and
//! refresh bus, and owns the wiring between them.

use crate::api::{ApiClient, ApiResult, RagApi};
use crate::config::AppConfig;
use crate::controllers::{
    AutoConfirm, ConfirmPrompt, ConversationController, DocumentLibraryController,
    SessionListController,
};
use crate::health::HealthMonitor;
use crate::refresh::RefreshBus;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

pub struct App {
    bus: RefreshBus,
    pub sessions: Arc<SessionListController>,
    pub conversation: Arc<ConversationController>,
    pub documents: Arc<DocumentLibraryController>,
    pub health: Arc<HealthMonitor>,
}

impl App {
    pub fn from_env() -> Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::new(&config))
    }

    pub fn new(config: &AppConfig) -> Self {
        Self::with_backend(
            Arc::new(ApiClient::from_config(config)),
            Arc::new(AutoConfirm),
            config.health_interval,
        )
    }

    /// Assemble against any backend and confirmation gate. This is the seam
    /// UIs use to inject their confirmation dialog, and tests use to swap in
    /// an in-memory backend.
    pub fn with_backend(
        api: Arc<dyn RagApi>,
        confirm: Arc<dyn ConfirmPrompt>,
        health_interval: Duration,
    ) -> Self {
        let bus = RefreshBus::new();
        let sessions = Arc::new(SessionListController::new(
            Arc::clone(&api),
            Arc::clone(&confirm),
        ));
        let conversation = Arc::new(ConversationController::new(Arc::clone(&api), bus.clone()));
        let documents = Arc::new(DocumentLibraryController::new(
            Arc::clone(&api),
            bus.clone(),
            confirm,
        ));
        let health = Arc::new(HealthMonitor::new(api, health_interval));

        let app = Self {
            bus,
            sessions,
            conversation,
            documents,
            health,
        };
        app.wire_refresh();
        app
    }

    /// The conversation controller announces new and updated sessions on the
    /// bus; pull the first page again whenever it does.
    fn wire_refresh(&self) {
        let sessions = Arc::clone(&self.sessions);
        self.bus.on_sessions(move || {
            let sessions = Arc::clone(&sessions);
            tokio::spawn(async move {
                // failures are logged by the controller and the stale list stays
                let _ = sessions.refresh().await;
            });
        });
    }

    /// Bus handle for embedders that want their own document-change hook.
    pub fn refresh_bus(&self) -> &RefreshBus {
        &self.bus
    }

    /// First load: session page 1 and the document library in parallel, then
    /// an immediate health check before the poll starts ticking.
    pub async fn bootstrap(&self) {
        let _ = futures::join!(self.sessions.refresh(), self.documents.load());
        self.health.check_now().await;
        self.health.start();
    }

    /// Delete a session through the session list; when it was the active
    /// conversation, fall back to the no-session state.
    pub async fn delete_session(&self, session_id: i64) -> ApiResult<bool> {
        let deleted = self.sessions.delete(session_id).await?;
        if deleted && self.conversation.active_session() == Some(session_id) {
            self.conversation.new_conversation();
        }
        Ok(deleted)
    }

    pub fn shutdown(&self) {
        self.health.shutdown();
    }
}
