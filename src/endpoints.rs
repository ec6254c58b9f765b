//! The API endpoint URIs.
//!
//! Clients address a single resource with
//! [ClientConfig::resource_url](crate::config::ClientConfig::resource_url).

/// The route to list, create and delete accounts.
pub const ACCOUNTS: &str = "/account";
/// The route to get a single account.
pub const ACCOUNT: &str = "/account/{account_id}";
/// The route to list, create and delete transactions.
pub const TRANSACTIONS: &str = "/transaction";
