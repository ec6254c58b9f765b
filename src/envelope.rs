//! The reply shape shared by every API route.

use serde::{Deserialize, Serialize};

/// A reply from the API.
///
/// When `success` is false, `data` is meaningless and `error` says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The API reported that a request did not succeed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct DomainError(pub String);

impl<T> Envelope<T> {
    /// A successful reply carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A successful reply with nothing to return.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// A failed reply.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// The data of a successful reply, or the error of a failed one.
    ///
    /// # Errors
    /// Returns a [DomainError] with the reply's error text when `success` is
    /// false.
    pub fn into_result(self) -> Result<Option<T>, DomainError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(DomainError(self.error.unwrap_or_default()))
        }
    }
}
