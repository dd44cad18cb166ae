//! Console service error types.

use thiserror::Error;
use wayedge_core::error::WayedgeError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("current password is incorrect")]
    PasswordMismatch,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<ConsoleError> for WayedgeError {
    fn from(err: ConsoleError) -> Self {
        match err {
            ConsoleError::PasswordMismatch => WayedgeError::InvalidCredentials,
            ConsoleError::Crypto(msg) => WayedgeError::Crypto(msg),
        }
    }
}
