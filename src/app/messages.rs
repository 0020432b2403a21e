use crate::identity::UserHandle;
use crate::llm::RemoteResult;
use crate::session::{Action, CallPurpose};
use crate::upload::{UploadBatch, UploadError};

/// Messages from background tasks to the main UI thread
pub enum BackgroundMessage {
    RemoteReplied {
        purpose: CallPurpose,
        result: RemoteResult,
    },
    FolderLoaded(Result<UploadBatch, UploadError>),
    IdentityResolved(Option<UserHandle>),
    /// A scheduled action whose delay has elapsed
    Due(Action),
    /// A background task crashed
    Error(String),
}

impl BackgroundMessage {
    /// The session action this message completes, if any
    pub fn into_action(self) -> Option<Action> {
        match self {
            BackgroundMessage::RemoteReplied { purpose, result } => {
                Some(Action::RemoteReplied { purpose, result })
            }
            BackgroundMessage::FolderLoaded(result) => Some(Action::FolderLoaded(result)),
            BackgroundMessage::IdentityResolved(handle) => Some(Action::IdentityResolved(handle)),
            BackgroundMessage::Due(action) => Some(action),
            BackgroundMessage::Error(_) => None,
        }
    }
}
