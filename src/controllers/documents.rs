use crate::api::{ApiError, ApiResult, RagApi};
use crate::controllers::ConfirmPrompt;
use crate::refresh::RefreshBus;
use crate::types::{Document, UploadFile, UploadReceipt};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Hard client-side cap on upload size: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Client-side rejection reasons; these never reach the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("File size must be less than 50MB")]
    TooLarge,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error("an upload is already in progress")]
    AlreadyUploading,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Accepts exactly the files the backend is willing to index from us: a
/// `.pdf` extension in any casing, at most [`MAX_UPLOAD_BYTES`] bytes.
pub fn validate_for_upload(file: &UploadFile) -> Result<(), UploadRejection> {
    if !file.filename.to_lowercase().ends_with(".pdf") {
        return Err(UploadRejection::NotPdf);
    }
    if file.size_bytes() > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

/// Flat cache of the uploaded document library, unique by filename.
pub struct DocumentLibraryController {
    api: Arc<dyn RagApi>,
    bus: RefreshBus,
    confirm: Arc<dyn ConfirmPrompt>,
    documents: Mutex<Vec<Document>>,
    deleting: Mutex<HashSet<String>>,
    loading: AtomicBool,
    uploading: AtomicBool,
    load_token: AtomicU64,
}

impl DocumentLibraryController {
    pub fn new(api: Arc<dyn RagApi>, bus: RefreshBus, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            api,
            bus,
            confirm,
            documents: Mutex::new(Vec::new()),
            deleting: Mutex::new(HashSet::new()),
            loading: AtomicBool::new(false),
            uploading: AtomicBool::new(false),
            load_token: AtomicU64::new(0),
        }
    }

    pub fn documents(&self) -> Vec<Document> {
        self.documents
            .lock()
            .expect("document cache poisoned")
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Whether a delete is in flight for this filename, so UIs can disable
    /// the per-row affordance.
    pub fn is_deleting(&self, filename: &str) -> bool {
        self.deleting
            .lock()
            .expect("deleting set poisoned")
            .contains(filename)
    }

    /// Replace the cached library with the backend's full list. There is no
    /// pagination on this endpoint.
    pub async fn load(&self) -> ApiResult<()> {
        let token = self.load_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);

        let result = self.api.list_documents().await;

        if self.load_token.load(Ordering::SeqCst) != token {
            return Ok(());
        }
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(list) => {
                *self.documents.lock().expect("document cache poisoned") = list;
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load documents: {err}");
                Err(err)
            }
        }
    }

    /// Upload a validated file. Validation failures never reach the network;
    /// backend failures surface their message verbatim. On success the
    /// library is re-listed (the backend decides what a duplicate filename
    /// means) and the documents refresh signal fires.
    pub async fn upload(&self, file: UploadFile) -> Result<UploadReceipt, UploadError> {
        validate_for_upload(&file)?;

        if self
            .uploading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UploadError::AlreadyUploading);
        }

        let result = self.api.upload_document(file).await;
        self.uploading.store(false, Ordering::SeqCst);

        match result {
            Ok(receipt) => {
                if let Err(err) = self.load().await {
                    tracing::warn!("document list refresh after upload failed: {err}");
                }
                self.bus.notify_documents();
                Ok(receipt)
            }
            Err(err) => {
                tracing::error!("upload failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Delete a document after user confirmation. Returns `false` when the
    /// user declined or a delete for this filename is already in flight.
    pub async fn delete(&self, filename: &str) -> ApiResult<bool> {
        let prompt =
            format!("Delete \"{filename}\"? This will remove it from the vector database.");
        if !self.confirm.confirm(&prompt) {
            return Ok(false);
        }

        {
            let mut deleting = self.deleting.lock().expect("deleting set poisoned");
            if !deleting.insert(filename.to_string()) {
                return Ok(false);
            }
        }

        let result = self.api.delete_document(filename).await;
        self.deleting
            .lock()
            .expect("deleting set poisoned")
            .remove(filename);

        match result {
            Ok(()) => {
                self.documents
                    .lock()
                    .expect("document cache poisoned")
                    .retain(|d| d.filename != filename);
                self.bus.notify_documents();
                Ok(true)
            }
            Err(err) => {
                tracing::error!("failed to delete document {filename}: {err}");
                Err(err)
            }
        }
    }
}
