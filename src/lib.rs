//! Coinpurse is a personal-finance tracker for incomes and expenses across
//! several accounts.
//!
//! The client half of this library is the asynchronous request [transport],
//! the account and transaction services in [api], and the page and widget
//! controllers in [ui]. The [server] module provides the JSON API they talk
//! to, backed by SQLite.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub mod api;
pub mod config;
pub mod endpoints;
pub mod envelope;
mod logging;
pub mod params;
pub mod server;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use config::ClientConfig;
pub use envelope::Envelope;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use params::Params;
pub use server::{ApiState, build_router, graceful_shutdown};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A component was constructed without a collaborator it cannot work
    /// without.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The HTTP client could not be built.
    #[error("could not build the HTTP client: {0}")]
    HttpClient(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A required form field was missing or blank.
    #[error("the field \"{0}\" is required")]
    MissingField(String),

    /// A form field had a value that could not be used, e.g. a sum that is
    /// not a positive number.
    ///
    /// Callers should pass in the field name and the offending value.
    #[error("invalid value \"{1}\" for the field \"{0}\"")]
    InvalidField(String, String),

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists in the database")]
    DuplicateAccountName(String),

    /// The request body could not be parsed as a multipart form.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SqlError(_) | Error::DatabaseLockError | Error::HttpClient(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Envelope::<()>::failure(
                        "An unexpected error occurred, check the server logs for more details.",
                    )),
                )
                    .into_response()
            }
            // The rest are problems with the request that the client can show as is.
            error => {
                tracing::debug!("Rejected request: {error}");
                Json(Envelope::<()>::failure(error.to_string())).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{Error, test_utils::json_body};

    #[test]
    fn no_rows_is_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[tokio::test]
    async fn request_problems_are_failed_envelopes() {
        let response = Error::MissingField("name".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "the field \"name\" is required" })
        );
    }

    #[tokio::test]
    async fn internal_problems_are_server_errors() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["success"], json!(false));
    }
}
