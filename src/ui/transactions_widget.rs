use std::rc::Rc;

use crate::{
    Error,
    ui::{
        ModalHost,
        events::{ClickEvent, ControlRole, DispatchTable},
    },
};

/// The name of the dialog for recording an income.
pub const NEW_INCOME_MODAL: &str = "newIncome";
/// The name of the dialog for recording an expense.
pub const NEW_EXPENSE_MODAL: &str = "newExpense";

/// The "new income" and "new expense" buttons, each opening its own dialog.
pub struct TransactionsWidget {
    dispatch: DispatchTable,
}

impl TransactionsWidget {
    /// # Errors
    /// Returns [Error::InvalidArgument] if `modals` is `None`.
    pub fn new(modals: Option<Rc<dyn ModalHost>>) -> Result<Self, Error> {
        let modals = modals.ok_or_else(|| {
            Error::InvalidArgument("a transactions widget needs a modal host".to_owned())
        })?;

        Ok(Self {
            dispatch: register_events(modals),
        })
    }

    /// Handle a click inside the widget. Returns false if the click did not hit
    /// one of its buttons.
    pub fn handle_click(&self, event: &ClickEvent) -> bool {
        self.dispatch.dispatch(event)
    }
}

fn register_events(modals: Rc<dyn ModalHost>) -> DispatchTable {
    let income_modals = modals.clone();

    DispatchTable::new()
        .on(ControlRole::CreateIncome, move |_| {
            income_modals.open(NEW_INCOME_MODAL)
        })
        .on(ControlRole::CreateExpense, move |_| modals.open(NEW_EXPENSE_MODAL))
}
