use thiserror::Error;

use crate::api::{ApiError, AttemptResult};
use crate::storage::StorageError;

/// Shown for a 401 from whichever provider answered.
pub const INCORRECT_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";

/// Shown when nothing more specific is available.
pub const GENERIC_FAILURE_MESSAGE: &str = "Login failed";

/// Terminal failure of a login flow.
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Credentials rejected by provider")]
    CredentialRejected,

    #[error("Provider rejected login with status {status}")]
    ProviderRejected { status: u16, message: Option<String> },

    #[error("Provider response carried no session token")]
    NoSessionExtractable,

    #[error(transparent)]
    Transport(#[from] ApiError),

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

impl LoginError {
    /// Classify a non-2xx answer from the provider that ended the flow.
    pub fn from_rejection(result: &AttemptResult) -> Self {
        match result.http_status {
            401 => LoginError::CredentialRejected,
            status => LoginError::ProviderRejected {
                status,
                message: result.message().map(str::to_string),
            },
        }
    }

    /// Text for the outcome notification.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::CredentialRejected => INCORRECT_CREDENTIALS_MESSAGE.to_string(),
            LoginError::ProviderRejected {
                message: Some(message),
                ..
            } => message.clone(),
            LoginError::ProviderRejected { message: None, .. } | LoginError::NoSessionExtractable => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            LoginError::Transport(e) => e.to_string(),
            LoginError::Storage(_) => self.to_string(),
        }
    }
}
