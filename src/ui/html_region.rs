use std::cell::RefCell;

use maud::{Markup, html};

use crate::{
    api::TransactionItem,
    ui::{
        PageHost,
        events::ControlRole,
        templates::transactions_list,
    },
};

/// A [PageHost] that keeps its title and rendered transaction rows in memory.
#[derive(Debug)]
pub struct HtmlRegion {
    title: RefCell<String>,
    transactions: RefCell<Markup>,
}

impl HtmlRegion {
    /// An empty region showing `title`.
    pub fn new(title: &str) -> Self {
        Self {
            title: RefCell::new(title.to_owned()),
            transactions: RefCell::new(html! {}),
        }
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// The markup of the transaction rows currently shown.
    pub fn transactions_html(&self) -> String {
        self.transactions.borrow().clone().into_string()
    }

    /// The whole region: heading, account delete control and rows.
    pub fn render(&self) -> Markup {
        html! {
            section class="content-wrapper"
            {
                div class="content-header"
                {
                    h1 class="content-title" { (self.title()) }
                    button
                        class="btn btn-danger remove-account"
                        data-role=(ControlRole::RemoveAccount.as_attr())
                    {
                        "Delete account"
                    }
                }
                div class="content" { (self.transactions.borrow().clone()) }
            }
        }
    }
}

impl PageHost for HtmlRegion {
    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_owned();
    }

    fn replace_transactions(&self, items: &[TransactionItem]) {
        *self.transactions.borrow_mut() = transactions_list(items);
    }
}
