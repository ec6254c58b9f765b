use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    api::{Completion, request},
    config::ClientConfig,
    endpoints,
    params::Params,
    transport::{Method, Transport},
};

/// A bank account, wallet or card the user tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// The balance: the total of incomes minus the total of expenses.
    #[serde(default)]
    pub sum: f64,
}

/// Reads and changes accounts.
pub trait AccountService {
    /// Get the account with `id`.
    fn get(&self, id: &str, on_complete: Completion<Account>);

    /// List every account.
    fn list(&self, on_complete: Completion<Vec<Account>>);

    /// Create an account called `name`.
    fn create(&self, name: &str, on_complete: Completion<Account>);

    /// Delete the account identified by `params`, e.g. `id=42`.
    fn remove(&self, params: Params, on_complete: Completion<serde_json::Value>);
}

/// [AccountService] backed by the HTTP API.
pub struct AccountApi {
    transport: Rc<dyn Transport>,
    config: ClientConfig,
}

impl AccountApi {
    pub fn new(transport: Rc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }
}

impl AccountService for AccountApi {
    fn get(&self, id: &str, on_complete: Completion<Account>) {
        let url = self.config.resource_url(endpoints::ACCOUNTS, id);
        request(self.transport.as_ref(), Method::Get, url, None, on_complete);
    }

    fn list(&self, on_complete: Completion<Vec<Account>>) {
        let url = self.config.url(endpoints::ACCOUNTS);
        request(self.transport.as_ref(), Method::Get, url, None, on_complete);
    }

    fn create(&self, name: &str, on_complete: Completion<Account>) {
        let url = self.config.url(endpoints::ACCOUNTS);
        let data = Params::new().with("name", name);
        request(self.transport.as_ref(), Method::Put, url, Some(data), on_complete);
    }

    fn remove(&self, params: Params, on_complete: Completion<serde_json::Value>) {
        let url = self.config.url(endpoints::ACCOUNTS);
        request(
            self.transport.as_ref(),
            Method::Delete,
            url,
            Some(params),
            on_complete,
        );
    }
}
