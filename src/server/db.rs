//! Database setup for the API server.

use rusqlite::Connection;

use crate::server::{account::create_account_table, transaction::create_transaction_table};

/// Create the tables for accounts and transactions if they do not exist, and
/// turn on foreign key enforcement for `connection`.
///
/// # Errors
/// Returns an error if a statement fails.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    create_account_table(connection)?;
    create_transaction_table(connection)?;

    Ok(())
}
