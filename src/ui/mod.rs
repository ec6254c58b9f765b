//! The page controller, the transactions widget, and the interfaces they use
//! to reach the screen and the rest of the application.

pub mod events;
mod html_region;
pub mod templates;
mod transactions_page;
mod transactions_widget;

pub use html_region::HtmlRegion;
pub use transactions_page::{
    ACCOUNT_TITLE_PLACEHOLDER, PageServices, TransactionsPage, ViewState,
};
pub use transactions_widget::{NEW_EXPENSE_MODAL, NEW_INCOME_MODAL, TransactionsWidget};

use crate::api::TransactionItem;

/// The screen region a [TransactionsPage] draws into.
pub trait PageHost {
    /// Show `title` as the page heading.
    fn set_title(&self, title: &str);

    /// Remove every transaction shown and show `items` instead.
    fn replace_transactions(&self, items: &[TransactionItem]);
}

/// A blocking yes/no question to the user.
pub trait Confirm {
    /// Ask `message` and return true if the user agreed.
    fn confirm(&self, message: &str) -> bool;
}

/// Requests for other parts of the application to refresh.
pub trait AppSignals {
    /// Refresh the widgets that list accounts and their balances.
    fn update_widgets(&self);

    /// Refresh the forms that offer a choice of account.
    fn update_forms(&self);

    /// Refresh everything, including the active page.
    fn update(&self);
}

/// Opens modal dialogs by name.
pub trait ModalHost {
    fn open(&self, name: &str);
}
