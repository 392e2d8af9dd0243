/// HTTP gateway to the RAG backend
///
/// Every outbound call goes through here. The backend is an opaque
/// collaborator: retrieval, embeddings, and model inference all live behind
/// its HTTP API, and this module only knows the request/response contract.
///
/// # Architecture
///
/// - `RagApi` - the trait covering the nine backend operations; controllers
///   depend on it so tests can substitute an in-memory backend
/// - `http` - the `reqwest`-backed implementation
mod http;

pub use http::ApiClient;

use crate::types::{ChatMessage, ChatSession, Document, HealthStatus, UploadFile, UploadReceipt};
use async_trait::async_trait;

/// Common error type for all backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. The body is the raw response text; no shape is
    /// assumed on failure.
    #[error("backend error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait RagApi: Send + Sync {
    async fn health(&self) -> ApiResult<HealthStatus>;

    async fn create_session(&self, title: &str) -> ApiResult<ChatSession>;

    async fn list_sessions(&self, page: u32, page_size: u32) -> ApiResult<Vec<ChatSession>>;

    async fn list_messages(&self, session_id: i64) -> ApiResult<Vec<ChatMessage>>;

    /// Post a user message; the response is the assistant reply, which only
    /// arrives once generation finished (no streaming).
    async fn send_message(&self, session_id: i64, content: &str) -> ApiResult<ChatMessage>;

    async fn delete_session(&self, session_id: i64) -> ApiResult<()>;

    async fn list_documents(&self) -> ApiResult<Vec<Document>>;

    async fn upload_document(&self, file: UploadFile) -> ApiResult<UploadReceipt>;

    async fn delete_document(&self, filename: &str) -> ApiResult<()>;
}
