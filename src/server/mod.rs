//! A JSON API over SQLite that serves accounts and transactions to the
//! client.
//!
//! Every reply is an [Envelope]. Problems with the request, such as a missing
//! field or an unknown ID, are reported in the envelope with status 200.
//! Only internal failures use status 500.

mod account;
mod db;
mod form;
mod transaction;

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    Json, Router, middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_server::Handle;
use rusqlite::Connection;
use serde::Serialize;
use tokio::signal;

pub use db::initialize as initialize_db;

use crate::{
    Error,
    endpoints,
    envelope::Envelope,
    logging::logging_middleware,
    server::{
        account::{
            create_account_endpoint, delete_account_endpoint, get_account_endpoint,
            list_accounts_endpoint,
        },
        transaction::{
            create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        },
    },
};

/// The state shared by the route handlers.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// The connection to the application's SQLite database.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl ApiState {
    /// Create the state for `connection`, creating the tables if needed.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the tables could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize_db(&connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(connection)),
        })
    }
}

/// Return a router with all the app's routes.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint)
                .put(create_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(endpoints::ACCOUNT, get(get_account_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint)
                .put(create_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

pub(crate) fn lock(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Wrap the outcome of a read or create in an envelope.
pub(crate) fn reply<T: Serialize>(result: Result<T, Error>) -> Response {
    match result {
        Ok(data) => Json(Envelope::ok(data)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Wrap the outcome of a delete in an envelope without data.
pub(crate) fn reply_done(result: Result<(), Error>) -> Response {
    match result {
        Ok(()) => Json(Envelope::<()>::done()).into_response(),
        Err(error) => error.into_response(),
    }
}

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
