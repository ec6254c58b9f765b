//! Account routes: list, get, create and delete.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};

use crate::{
    Error,
    api::Account,
    server::{
        ApiState,
        form::{parse_id, read_form, required},
        lock, reply, reply_done,
    },
};

/// The state needed by the account routes.
#[derive(Debug, Clone)]
pub struct AccountState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<ApiState> for AccountState {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

const SELECT_ACCOUNT_WITH_BALANCE: &str = "SELECT account.id, account.name,
        COALESCE(SUM(CASE WHEN t.type = 'income' THEN t.sum ELSE -t.sum END), 0.0)
    FROM account
    LEFT JOIN \"transaction\" t ON t.account_id = account.id";

fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let name = row.get(1)?;
    let sum = row.get(2)?;

    Ok(Account {
        id: id.to_string(),
        name,
        sum,
    })
}

/// Get the account with `id` and its balance.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such account.
pub fn get_account(id: i64, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_row(
            &format!("{SELECT_ACCOUNT_WITH_BALANCE} WHERE account.id = ?1 GROUP BY account.id"),
            params![id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get every account and its balance, ordered by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT_WITH_BALANCE} GROUP BY account.id ORDER BY account.name"
        ))?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Create an account called `name`.
///
/// # Errors
/// Returns [Error::DuplicateAccountName] if an account with `name` exists.
pub fn create_account(name: &str, connection: &Connection) -> Result<Account, Error> {
    connection
        .execute("INSERT INTO account (name) VALUES (?1)", params![name])
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067 => {
                Error::DuplicateAccountName(name.to_owned())
            }
            error => error.into(),
        })?;

    Ok(Account {
        id: connection.last_insert_rowid().to_string(),
        name: name.to_owned(),
        sum: 0.0,
    })
}

type RowsAffected = usize;

fn delete_account(id: i64, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// A route handler for getting one account.
pub async fn get_account_endpoint(
    State(state): State<AccountState>,
    Path(account_id): Path<String>,
) -> Response {
    let result = parse_id("account_id", &account_id).and_then(|id| {
        let connection = lock(&state.db_connection)?;
        get_account(id, &connection)
    });

    reply(result)
}

/// A route handler for listing accounts.
pub async fn list_accounts_endpoint(State(state): State<AccountState>) -> Response {
    let result = lock(&state.db_connection).and_then(|connection| get_all_accounts(&connection));

    reply(result)
}

/// A route handler for creating an account from the form field `name`.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_response(),
    };

    let result = required(&form, "name").and_then(|name| {
        let connection = lock(&state.db_connection)?;
        create_account(name, &connection)
    });

    if let Ok(account) = &result {
        tracing::info!("created account {} \"{}\"", account.id, account.name);
    }

    reply(result)
}

/// A route handler for deleting the account given by the form field `id`,
/// along with its transactions.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_response(),
    };

    let result = required(&form, "id")
        .and_then(|id| parse_id("id", id))
        .and_then(|id| {
            let connection = lock(&state.db_connection)?;
            match delete_account(id, &connection)? {
                0 => Err(Error::DeleteMissingAccount),
                _ => {
                    tracing::info!("deleted account {id}");
                    Ok(())
                }
            }
        });

    reply_done(result)
}
