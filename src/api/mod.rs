//! The account and transaction services the UI talks to.
//!
//! Each service call issues exactly one request through a [Transport] and
//! hands the decoded [Envelope] to its completion callback.

mod account;
mod transaction;

pub use account::{Account, AccountApi, AccountService};
pub use transaction::{
    NewTransaction, TransactionApi, TransactionItem, TransactionKind, TransactionService,
    format_timestamp, parse_timestamp,
};

use serde::de::DeserializeOwned;

use crate::{
    envelope::Envelope,
    params::Params,
    transport::{Method, RequestDescriptor, ResponseBody, Transport, TransportError},
};

/// Why a service call produced no envelope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The reply was not an envelope of the expected shape.
    #[error("unexpected reply: {0}")]
    Decode(String),
}

/// The callback that receives the outcome of one service call.
pub type Completion<T> = Box<dyn FnOnce(Result<Envelope<T>, ServiceError>)>;

fn decode_envelope<T: DeserializeOwned>(
    result: Result<ResponseBody, TransportError>,
) -> Result<Envelope<T>, ServiceError> {
    match result? {
        ResponseBody::Json(value) => {
            serde_json::from_value(value).map_err(|error| ServiceError::Decode(error.to_string()))
        }
        ResponseBody::Text(text) => {
            serde_json::from_str(&text).map_err(|error| ServiceError::Decode(error.to_string()))
        }
    }
}

fn request<T: DeserializeOwned + 'static>(
    transport: &dyn Transport,
    method: Method,
    url: String,
    data: Option<Params>,
    on_complete: Completion<T>,
) {
    transport.send(RequestDescriptor::json(method, url, data, move |result| {
        on_complete(decode_envelope(result))
    }));
}
