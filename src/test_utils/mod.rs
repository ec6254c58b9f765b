#![allow(missing_docs)]

pub(crate) mod fakes;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use fakes::{
    FakeAccounts, FakeModals, FakeTransactions, RecordingSignals, RecordingTransport,
    ScriptedConfirm,
};
pub(crate) use html::{assert_valid_html, parse_html_fragment};
pub(crate) use http::{json_body, serve};
