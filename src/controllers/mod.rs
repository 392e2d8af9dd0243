/// Controllers own the client-side caches of backend state
///
/// Each controller wraps one slice of the UI's state: the paginated session
/// list, the document library, and the active conversation. They expose
/// `&self` async operations over interior mutability so a UI can hold them in
/// `Arc`s and call in from anywhere. A failed operation logs, leaves the
/// cached state untouched, and returns the error for inline display; nothing
/// here is fatal.
pub mod conversation;
pub mod documents;
pub mod sessions;

pub use conversation::{ConversationController, ConversationState, SendError, derive_title};
pub use documents::{
    DocumentLibraryController, MAX_UPLOAD_BYTES, UploadError, UploadRejection, validate_for_upload,
};
pub use sessions::{SESSION_PAGE_SIZE, SessionListController};

/// Gate for destructive actions. Deletes must not proceed without an
/// affirmative answer; embedders route this to their confirmation UI.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything. For embedders that already gate destructive actions
/// upstream of the controllers.
pub struct AutoConfirm;

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
