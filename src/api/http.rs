use super::{ApiError, ApiResult, RagApi};
use crate::config::AppConfig;
use crate::types::{ChatMessage, ChatSession, Document, HealthStatus, UploadFile, UploadReceipt};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct CreateSessionBody<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    session_id: i64,
    content: &'a str,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser-openable URL for the document viewer. A page lands in the URL
    /// fragment, where in-browser PDF viewers pick it up.
    pub fn document_view_url(&self, filename: &str, page: Option<u32>) -> String {
        let mut url = format!(
            "{}/api/v1/documents/view/{}",
            self.base_url,
            urlencoding::encode(filename)
        );
        if let Some(page) = page {
            url.push_str(&format!("#page={page}"));
        }
        url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> ApiResult<T> {
        let status = res.status();
        let body = res.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let res = self
            .client
            .get(self.url(path))
            .header("content-type", "application/json")
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let res = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(res).await
    }

    /// DELETE endpoints are status-only: the body is ignored on success.
    async fn delete(&self, path: &str) -> ApiResult<()> {
        let res = self
            .client
            .delete(self.url(path))
            .header("content-type", "application/json")
            .send()
            .await?;
        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl RagApi for ApiClient {
    async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json("/api/v1/health").await
    }

    async fn create_session(&self, title: &str) -> ApiResult<ChatSession> {
        self.post_json("/api/v1/chat/sessions", &CreateSessionBody { title })
            .await
    }

    async fn list_sessions(&self, page: u32, page_size: u32) -> ApiResult<Vec<ChatSession>> {
        self.get_json(&format!(
            "/api/v1/chat/sessions?page={page}&page_size={page_size}"
        ))
        .await
    }

    async fn list_messages(&self, session_id: i64) -> ApiResult<Vec<ChatMessage>> {
        self.get_json(&format!("/api/v1/chat/sessions/{session_id}/messages"))
            .await
    }

    async fn send_message(&self, session_id: i64, content: &str) -> ApiResult<ChatMessage> {
        self.post_json(
            &format!("/api/v1/chat/sessions/{session_id}/messages"),
            &SendMessageBody {
                session_id,
                content,
            },
        )
        .await
    }

    async fn delete_session(&self, session_id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/v1/chat/sessions/{session_id}"))
            .await
    }

    async fn list_documents(&self) -> ApiResult<Vec<Document>> {
        self.get_json("/api/v1/documents").await
    }

    /// Multipart upload; deliberately not a JSON request. The file goes in a
    /// single part named `file`.
    async fn upload_document(&self, file: UploadFile) -> ApiResult<UploadReceipt> {
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);
        let res = self
            .client
            .post(self.url("/api/v1/documents/upload"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(res).await
    }

    async fn delete_document(&self, filename: &str) -> ApiResult<()> {
        self.delete(&format!(
            "/api/v1/documents/{}",
            urlencoding::encode(filename)
        ))
        .await
    }
}
