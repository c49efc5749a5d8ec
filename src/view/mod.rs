//! View-state layer: the invoice list and the invoice editor

pub mod card;
pub mod editor;
pub mod store;

pub use card::InvoiceCard;
pub use editor::{
    EditorAction, FieldPatch, FieldUpdate, InvoiceEditor, SubmitOutcome, reduce,
};
pub use store::{DELETE_PROMPT, EMPTY_LIST_MESSAGE, InvoiceStoreView, LogPrompt, Prompt};
