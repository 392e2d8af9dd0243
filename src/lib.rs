//! Client-side orchestration for a local-first RAG chat application.
//!
//! Users upload PDFs, ask questions, and get assistant answers with source
//! citations. Retrieval and generation happen in a backend service; this
//! crate keeps the client's view of that service consistent: the paginated
//! session list, the active conversation's history, the document library, and
//! a polled health snapshot. Rendering is the embedder's job.
//!
//! # Architecture
//!
//! - [`api`] - typed HTTP gateway; all backend traffic goes through it
//! - [`controllers`] - session list, conversation, and document library state
//! - [`health`] - background health poll with a latest-only snapshot
//! - [`refresh`] - cross-controller refresh signal
//! - [`app`] - composition root wiring the above together
//!
//! # Usage
//!
//! ```rust,no_run
//! # async fn example() -> anyhow::Result<()> {
//! let app = ragchat::App::from_env()?;
//! app.bootstrap().await;
//! app.conversation.send_message("What does the report conclude?").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod controllers;
pub mod health;
pub mod logging;
pub mod refresh;
pub mod types;

pub use api::{ApiClient, ApiError, ApiResult, RagApi};
pub use app::App;
pub use config::AppConfig;
pub use controllers::{
    AutoConfirm, ConfirmPrompt, ConversationController, ConversationState,
    DocumentLibraryController, SendError, SessionListController, UploadError, UploadRejection,
};
pub use health::{HealthMonitor, HealthSnapshot, IndicatorStatus};
pub use refresh::RefreshBus;
pub use types::{
    BackendState, ChatMessage, ChatSession, Document, HealthStatus, Role, ServiceState,
    SourceReference, UploadFile, UploadReceipt,
};
