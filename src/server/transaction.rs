//! Transaction routes: list, create and delete.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params, types::Type};
use serde::Deserialize;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::{
    Error,
    api::{TransactionItem, TransactionKind, format_timestamp, parse_timestamp},
    params::Params,
    server::{
        ApiState,
        account::get_account,
        form::{parse_id, read_form, required},
        lock, reply, reply_done,
    },
};

/// The state needed by the transaction routes.
#[derive(Debug, Clone)]
pub struct TransactionState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<ApiState> for TransactionState {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string of the list route. Other parameters are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub account_id: Option<String>,
}

/// A validated request to record an income or expense.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub account_id: i64,
    pub kind: TransactionKind,
    pub name: String,
    pub sum: f64,
}

impl TryFrom<&Params> for TransactionForm {
    type Error = Error;

    fn try_from(form: &Params) -> Result<Self, Self::Error> {
        let account_id = parse_id("account_id", required(form, "account_id")?)?;

        let kind = required(form, "type")?;
        let kind = TransactionKind::parse(kind)
            .ok_or_else(|| Error::InvalidField("type".to_owned(), kind.to_owned()))?;

        let name = required(form, "name")?.to_owned();

        let sum = required(form, "sum")?;
        let sum = sum
            .parse::<f64>()
            .ok()
            .filter(|sum| sum.is_finite() && *sum > 0.0)
            .ok_or_else(|| Error::InvalidField("sum".to_owned(), sum.to_owned()))?;

        Ok(Self {
            account_id,
            kind,
            name,
            sum,
        })
    }
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            account_id INTEGER NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            name TEXT NOT NULL,
            sum REAL NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_transaction(row: &rusqlite::Row) -> Result<TransactionItem, rusqlite::Error> {
    let id: i64 = row.get(0)?;

    let kind: String = row.get(1)?;
    let kind = TransactionKind::parse(&kind)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(1, "type".to_owned(), Type::Text))?;

    let name = row.get(2)?;
    let sum = row.get(3)?;

    let created_at: String = row.get(4)?;
    let created_at = parse_timestamp(&created_at)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;

    Ok(TransactionItem {
        id: id.to_string(),
        kind,
        name,
        sum,
        created_at,
    })
}

/// Get the transactions of `account_id`, or of every account when `None`,
/// newest first.
pub fn get_transactions(
    account_id: Option<i64>,
    connection: &Connection,
) -> Result<Vec<TransactionItem>, Error> {
    connection
        .prepare(
            "SELECT id, type, name, sum, created_at FROM \"transaction\"
            WHERE ?1 IS NULL OR account_id = ?1
            ORDER BY created_at DESC, id DESC",
        )?
        .query_map(params![account_id], map_row_to_transaction)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Record `form` as created at `created_at`.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist.
pub fn create_transaction(
    form: &TransactionForm,
    created_at: PrimitiveDateTime,
    connection: &Connection,
) -> Result<TransactionItem, Error> {
    get_account(form.account_id, connection)?;

    connection.execute(
        "INSERT INTO \"transaction\" (account_id, type, name, sum, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            form.account_id,
            form.kind.as_str(),
            form.name,
            form.sum,
            format_timestamp(&created_at)
        ],
    )?;

    Ok(TransactionItem {
        id: connection.last_insert_rowid().to_string(),
        kind: form.kind,
        name: form.name.clone(),
        sum: form.sum,
        created_at,
    })
}

type RowsAffected = usize;

fn delete_transaction(id: i64, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(Error::from)
}

fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let now = now.replace_nanosecond(0).unwrap_or(now);

    PrimitiveDateTime::new(now.date(), now.time())
}

/// A route handler for listing transactions, optionally of one account.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Query(filter): Query<TransactionFilter>,
) -> Response {
    let account_id = filter
        .account_id
        .as_deref()
        .map(|account_id| parse_id("account_id", account_id))
        .transpose();

    let result = account_id.and_then(|account_id| {
        let connection = lock(&state.db_connection)?;
        get_transactions(account_id, &connection)
    });

    reply(result)
}

/// A route handler for recording an income or expense from the form fields
/// `account_id`, `type`, `name` and `sum`.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_response(),
    };

    let result = TransactionForm::try_from(&form).and_then(|form| {
        let connection = lock(&state.db_connection)?;
        create_transaction(&form, now(), &connection)
    });

    if let Ok(transaction) = &result {
        tracing::info!("created {} {}", transaction.kind, transaction.id);
    }

    reply(result)
}

/// A route handler for deleting the transaction given by the form field `id`.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
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
            match delete_transaction(id, &connection)? {
                0 => Err(Error::DeleteMissingTransaction),
                _ => {
                    tracing::info!("deleted transaction {id}");
                    Ok(())
                }
            }
        });

    reply_done(result)
}
