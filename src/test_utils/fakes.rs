//! Stand-ins for the collaborators of the page and widget.
//!
//! The fake services never complete a call by themselves. Tests pop pending
//! calls and complete them in whatever order the scenario needs.

use std::cell::{Cell, RefCell};

use serde_json::Value;

use crate::{
    api::{
        Account, AccountService, Completion, NewTransaction, ServiceError, TransactionItem,
        TransactionService,
    },
    envelope::Envelope,
    params::Params,
    transport::{RequestDescriptor, Transport},
    ui::{AppSignals, Confirm, ModalHost},
};

/// Keeps every descriptor it is given without sending anything.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    pub sent: RefCell<Vec<RequestDescriptor>>,
}

impl RecordingTransport {
    /// The only descriptor sent so far.
    #[track_caller]
    pub fn take_one(&self) -> RequestDescriptor {
        let mut sent = self.sent.take();
        assert_eq!(sent.len(), 1, "want exactly one request, got {sent:?}");
        sent.remove(0)
    }
}

impl Transport for RecordingTransport {
    fn send(&self, descriptor: RequestDescriptor) {
        self.sent.borrow_mut().push(descriptor);
    }
}

type Reply<T> = Result<Envelope<T>, ServiceError>;

/// Pops the oldest pending call and completes it with `reply`.
///
/// The borrow is released before the completion runs so that it may issue new
/// calls on the same fake.
#[track_caller]
fn complete_first<K, T>(pending: &RefCell<Vec<(K, Completion<T>)>>, reply: Reply<T>) -> K {
    let (key, on_complete) = {
        let mut pending = pending.borrow_mut();
        assert!(!pending.is_empty(), "no pending call to complete");
        pending.remove(0)
    };
    on_complete(reply);
    key
}

#[derive(Default)]
pub(crate) struct FakeAccounts {
    pub gets: RefCell<Vec<(String, Completion<Account>)>>,
    pub removes: RefCell<Vec<(Params, Completion<Value>)>>,
}

impl FakeAccounts {
    pub fn requested_ids(&self) -> Vec<String> {
        self.gets.borrow().iter().map(|(id, _)| id.clone()).collect()
    }

    #[track_caller]
    pub fn reply_get(&self, reply: Reply<Account>) -> String {
        complete_first(&self.gets, reply)
    }

    #[track_caller]
    pub fn reply_remove(&self, reply: Reply<Value>) -> Params {
        complete_first(&self.removes, reply)
    }
}

impl AccountService for FakeAccounts {
    fn get(&self, id: &str, on_complete: Completion<Account>) {
        self.gets.borrow_mut().push((id.to_owned(), on_complete));
    }

    fn list(&self, _on_complete: Completion<Vec<Account>>) {
        unimplemented!("the page never lists accounts")
    }

    fn create(&self, _name: &str, _on_complete: Completion<Account>) {
        unimplemented!("the page never creates accounts")
    }

    fn remove(&self, params: Params, on_complete: Completion<Value>) {
        self.removes.borrow_mut().push((params, on_complete));
    }
}

#[derive(Default)]
pub(crate) struct FakeTransactions {
    pub lists: RefCell<Vec<(Params, Completion<Vec<TransactionItem>>)>>,
    pub removes: RefCell<Vec<(String, Completion<Value>)>>,
}

impl FakeTransactions {
    pub fn requested_filters(&self) -> Vec<Params> {
        self.lists
            .borrow()
            .iter()
            .map(|(filter, _)| filter.clone())
            .collect()
    }

    #[track_caller]
    pub fn reply_list(&self, reply: Reply<Vec<TransactionItem>>) -> Params {
        complete_first(&self.lists, reply)
    }

    #[track_caller]
    pub fn reply_remove(&self, reply: Reply<Value>) -> String {
        complete_first(&self.removes, reply)
    }
}

impl TransactionService for FakeTransactions {
    fn list(&self, filter: &Params, on_complete: Completion<Vec<TransactionItem>>) {
        self.lists.borrow_mut().push((filter.clone(), on_complete));
    }

    fn create(&self, _transaction: &NewTransaction, _on_complete: Completion<TransactionItem>) {
        unimplemented!("the page never creates transactions")
    }

    fn remove(&self, id: &str, on_complete: Completion<Value>) {
        self.removes.borrow_mut().push((id.to_owned(), on_complete));
    }
}

/// Answers every prompt with a fixed answer and remembers the prompts.
pub(crate) struct ScriptedConfirm {
    pub answer: Cell<bool>,
    pub prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Cell::new(answer),
            prompts: RefCell::default(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_owned());
        self.answer.get()
    }
}

#[derive(Default)]
pub(crate) struct RecordingSignals {
    pub widgets: Cell<u32>,
    pub forms: Cell<u32>,
    pub updates: Cell<u32>,
}

impl AppSignals for RecordingSignals {
    fn update_widgets(&self) {
        self.widgets.set(self.widgets.get() + 1);
    }

    fn update_forms(&self) {
        self.forms.set(self.forms.get() + 1);
    }

    fn update(&self) {
        self.updates.set(self.updates.get() + 1);
    }
}

#[derive(Default)]
pub(crate) struct FakeModals {
    pub opened: RefCell<Vec<String>>,
}

impl ModalHost for FakeModals {
    fn open(&self, name: &str) {
        self.opened.borrow_mut().push(name.to_owned());
    }
}
