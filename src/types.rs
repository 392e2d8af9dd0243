use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A persisted conversation thread, as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: i64,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ChatSession {
    /// Most recent activity on the session, preferring `updated_at` over
    /// `created_at` when both are present.
    pub fn last_activity(&self) -> Option<OffsetDateTime> {
        let raw = if self.updated_at.is_empty() {
            &self.created_at
        } else {
            &self.updated_at
        };
        parse_timestamp(raw).ok()
    }
}

/// A pointer from an assistant message back to a document page, with a short
/// excerpt of the matched text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    pub filename: String,
    /// 1-based page number.
    pub page: u32,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub session_id: i64,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceReference>>,
    pub created_at: String,
}

/// An uploaded document. The filename is the identity; there is no separate
/// numeric id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    pub upload_date: String,
    pub pages: u32,
    pub size_mb: f64,
}

impl Document {
    pub fn uploaded_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.upload_date).ok()
    }
}

/// Overall backend status as the backend reports it. A completely unreachable
/// backend never gets to report anything, so `Unhealthy` is usually
/// synthesized client-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendState {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Healthy,
    Unhealthy,
}

/// Wire shape of the health endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: BackendState,
    pub services: HashMap<String, ServiceState>,
    pub timestamp: String,
}

/// Upload response; `message` is meant to be shown to the user verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub pages: u32,
    pub message: String,
}

/// A file picked for upload: its name and raw bytes. Everything the
/// client-side validation and the multipart request need.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

const NAIVE_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Parse a backend timestamp. The backend emits ISO-8601 but may omit the
/// zone suffix; zone-less values are UTC. Applies to every timestamp field,
/// not just sessions.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    PrimitiveDateTime::parse(raw, NAIVE_TIMESTAMP).map(PrimitiveDateTime::assume_utc)
}
