use agenda_client::ApiError;
use agenda_kv::KVError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session storage: {0}")]
    Storage(#[from] KVError),
}

impl SessionError {
    /// Text to show the user; see [`ApiError::user_message`].
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SessionError::Api(e) => e.user_message(fallback),
            SessionError::Storage(_) => fallback.to_string(),
        }
    }
}
