//! The page that shows the incomes and expenses of one account.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    Error,
    api::{Account, AccountService, ServiceError, TransactionItem, TransactionService},
    envelope::Envelope,
    params::Params,
    ui::{
        AppSignals, Confirm, PageHost,
        events::{ClickEvent, ControlRole, DispatchTable},
    },
};

/// The heading shown while no account is loaded.
pub const ACCOUNT_TITLE_PLACEHOLDER: &str = "Account name";

const ACCOUNT_ID: &str = "account_id";
const REMOVE_ACCOUNT_PROMPT: &str = "Do you really want to delete this account?";
const REMOVE_TRANSACTION_PROMPT: &str = "Do you really want to delete this transaction?";

/// The collaborators a [TransactionsPage] works with.
#[derive(Clone)]
pub struct PageServices {
    pub accounts: Rc<dyn AccountService>,
    pub transactions: Rc<dyn TransactionService>,
    pub confirm: Rc<dyn Confirm>,
    pub app: Rc<dyn AppSignals>,
}

/// What a page remembers about its current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// The account the page is bound to, if any.
    pub account_id: Option<String>,
    /// The parameters of the latest render, replayed by
    /// [TransactionsPage::update].
    pub last_render_params: Params,
    /// Bumped on every render and clear. Replies issued under an older
    /// generation are dropped.
    generation: u64,
}

/// Shows the title and transactions of one account and handles deleting the
/// account or one of its transactions.
///
/// A page only runs on one thread. Service replies may arrive in any order;
/// a reply is applied only if no render or clear happened since its request
/// was issued.
pub struct TransactionsPage {
    this: Weak<TransactionsPage>,
    host: Rc<dyn PageHost>,
    services: PageServices,
    state: RefCell<ViewState>,
    dispatch: DispatchTable,
}

impl TransactionsPage {
    /// Create a page drawing into `host`.
    ///
    /// # Errors
    /// Returns [Error::InvalidArgument] if `host` is `None`.
    pub fn new(host: Option<Rc<dyn PageHost>>, services: PageServices) -> Result<Rc<Self>, Error> {
        let host = host.ok_or_else(|| {
            Error::InvalidArgument("a transactions page needs a host region".to_owned())
        })?;

        Ok(Rc::new_cyclic(|this| Self {
            this: this.clone(),
            host,
            services,
            state: RefCell::default(),
            dispatch: register_events(this.clone()),
        }))
    }

    /// A copy of the current view state.
    pub fn view_state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Handle a click inside the page. Returns false if the click did not hit
    /// one of the page's controls.
    pub fn handle_click(&self, event: &ClickEvent) -> bool {
        self.dispatch.dispatch(event)
    }

    /// Load the account title and the transactions matching `params`.
    ///
    /// Does nothing if `params` is empty.
    pub fn render(&self, params: &Params) {
        if params.is_empty() {
            return;
        }

        let account_id = params.get(ACCOUNT_ID).map(str::to_owned);
        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.account_id = account_id.clone();
            state.last_render_params = params.clone();
            state.generation
        };

        match account_id {
            Some(account_id) => {
                let page = self.this.clone();
                self.services.accounts.get(
                    &account_id,
                    Box::new(move |result| {
                        if let Some(page) = page.upgrade().filter(|page| page.is_current(generation))
                        {
                            page.show_title(result);
                        }
                    }),
                );
            }
            None => tracing::debug!("rendering transactions without an account title"),
        }

        let page = self.this.clone();
        self.services.transactions.list(
            params,
            Box::new(move |result| {
                if let Some(page) = page.upgrade().filter(|page| page.is_current(generation)) {
                    page.show_transactions(result);
                }
            }),
        );
    }

    /// Render again with the parameters of the latest render.
    pub fn update(&self) {
        let params = self.state.borrow().last_render_params.clone();
        self.render(&params);
    }

    /// Empty the page and forget the account it was bound to.
    pub fn clear(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.account_id = None;
            state.last_render_params = Params::new();
        }

        self.host.replace_transactions(&[]);
        self.host.set_title(ACCOUNT_TITLE_PLACEHOLDER);
    }

    /// Ask the user, then delete the account the page is bound to.
    ///
    /// Once deleted, the page is cleared and the account widgets and forms are
    /// asked to refresh. Does nothing if the page is not bound to an account.
    pub fn remove_account(&self) {
        let account_id = {
            let state = self.state.borrow();
            if state.last_render_params.is_empty() {
                return;
            }
            state.account_id.clone()
        };
        let Some(account_id) = account_id else {
            tracing::debug!("not removing account: the page is not bound to one");
            return;
        };

        if !self.services.confirm.confirm(REMOVE_ACCOUNT_PROMPT) {
            return;
        }

        let page = self.this.clone();
        let app = self.services.app.clone();
        self.services.accounts.remove(
            Params::new().with("id", &account_id),
            Box::new(move |result| {
                if let Err(error) = succeeded(result) {
                    tracing::warn!("could not delete account {account_id}: {error}");
                    return;
                }

                if let Some(page) = page.upgrade() {
                    page.account_removed(&account_id);
                }

                app.update_widgets();
                app.update_forms();
            }),
        );
    }

    /// Ask the user, then delete the transaction with `id`.
    ///
    /// Once deleted, the whole application is asked to refresh.
    pub fn remove_transaction(&self, id: &str) {
        if !self.services.confirm.confirm(REMOVE_TRANSACTION_PROMPT) {
            return;
        }

        let app = self.services.app.clone();
        let removed_id = id.to_owned();
        self.services.transactions.remove(
            id,
            Box::new(move |result| match succeeded(result) {
                Ok(()) => app.update(),
                Err(error) => tracing::warn!("could not delete transaction {removed_id}: {error}"),
            }),
        );
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    fn show_title(&self, result: Result<Envelope<Account>, ServiceError>) {
        match result.map(Envelope::into_result) {
            Ok(Ok(Some(account))) if !account.name.is_empty() => {
                self.host.set_title(&account.name)
            }
            Ok(Ok(_)) => tracing::debug!("account reply has no name, keeping the title"),
            Ok(Err(error)) => tracing::warn!("could not get account: {error}"),
            Err(error) => tracing::warn!("could not get account: {error}"),
        }
    }

    fn show_transactions(&self, result: Result<Envelope<Vec<TransactionItem>>, ServiceError>) {
        match result.map(Envelope::into_result) {
            Ok(Ok(Some(items))) => self.host.replace_transactions(&items),
            Ok(Ok(None)) => tracing::debug!("transaction reply has no data, keeping the list"),
            Ok(Err(error)) => tracing::warn!("could not list transactions: {error}"),
            Err(error) => tracing::warn!("could not list transactions: {error}"),
        }
    }

    /// Clear the page if it still shows the deleted account.
    fn account_removed(&self, account_id: &str) {
        let still_bound = self.state.borrow().account_id.as_deref() == Some(account_id);
        if still_bound {
            self.clear();
        }
    }
}

fn register_events(page: Weak<TransactionsPage>) -> DispatchTable {
    let account_page = page.clone();

    DispatchTable::new()
        .on(ControlRole::RemoveAccount, move |_| {
            if let Some(page) = account_page.upgrade() {
                page.remove_account();
            }
        })
        .on(ControlRole::RemoveTransaction, move |activation| {
            let Some(id) = activation.data_id else {
                tracing::warn!("transaction delete control has no id");
                return;
            };
            if let Some(page) = page.upgrade() {
                page.remove_transaction(id);
            }
        })
}

fn succeeded<T>(result: Result<Envelope<T>, ServiceError>) -> Result<(), String> {
    match result {
        Ok(envelope) => envelope
            .into_result()
            .map(|_| ())
            .map_err(|error| error.to_string()),
        Err(error) => Err(error.to_string()),
    }
}
