use std::{fmt::Display, rc::Rc};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use time::{
    PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    api::{Completion, request},
    config::ClientConfig,
    endpoints,
    params::Params,
    transport::{Method, Transport},
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const ISO_TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Whether a transaction added money to an account or took it away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parse the wire name of a kind, e.g. "income".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An income or expense as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub name: String,
    pub sum: f64,
    #[serde(serialize_with = "serialize_timestamp")]
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: PrimitiveDateTime,
}

/// The fields needed to record a new income or expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub name: String,
    pub sum: f64,
    pub account_id: String,
}

impl NewTransaction {
    fn to_params(&self) -> Params {
        Params::new()
            .with("type", self.kind)
            .with("name", &self.name)
            .with("sum", self.sum)
            .with("account_id", &self.account_id)
    }
}

/// Parse a timestamp such as `2019-03-10 03:20:41` or `2019-03-10T03:20:41`.
///
/// # Errors
/// Returns the parse error for the space separated form when neither form
/// matches.
pub fn parse_timestamp(text: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)
        .or_else(|error| PrimitiveDateTime::parse(text, ISO_TIMESTAMP_FORMAT).map_err(|_| error))
}

/// Format a timestamp as `2019-03-10 03:20:41`.
pub fn format_timestamp(timestamp: &PrimitiveDateTime) -> String {
    timestamp
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| timestamp.to_string())
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &PrimitiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(timestamp))
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<PrimitiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).map_err(D::Error::custom)
}

/// Reads and changes incomes and expenses.
pub trait TransactionService {
    /// List the transactions matching `filter`, e.g. `account_id=42`.
    fn list(&self, filter: &Params, on_complete: Completion<Vec<TransactionItem>>);

    /// Record a new income or expense.
    fn create(&self, transaction: &NewTransaction, on_complete: Completion<TransactionItem>);

    /// Delete the transaction with `id`.
    fn remove(&self, id: &str, on_complete: Completion<serde_json::Value>);
}

/// [TransactionService] backed by the HTTP API.
pub struct TransactionApi {
    transport: Rc<dyn Transport>,
    config: ClientConfig,
}

impl TransactionApi {
    pub fn new(transport: Rc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }
}

impl TransactionService for TransactionApi {
    fn list(&self, filter: &Params, on_complete: Completion<Vec<TransactionItem>>) {
        let url = self.config.url(endpoints::TRANSACTIONS);
        request(
            self.transport.as_ref(),
            Method::Get,
            url,
            Some(filter.clone()),
            on_complete,
        );
    }

    fn create(&self, transaction: &NewTransaction, on_complete: Completion<TransactionItem>) {
        let url = self.config.url(endpoints::TRANSACTIONS);
        request(
            self.transport.as_ref(),
            Method::Put,
            url,
            Some(transaction.to_params()),
            on_complete,
        );
    }

    fn remove(&self, id: &str, on_complete: Completion<serde_json::Value>) {
        let url = self.config.url(endpoints::TRANSACTIONS);
        let data = Params::new().with("id", id);
        request(self.transport.as_ref(), Method::Delete, url, Some(data), on_complete);
    }
}
