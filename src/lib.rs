//! # invoice-desk
//!
//! View-state core for a single-page invoice manager backed by a REST
//! invoice collection.
//!
//! ## Features
//!
//! - **Store View**: fetches the collection once, then patches its local list
//!   after each create, update and delete
//! - **Editor**: a pure reducer over the eleven editable fields, with `total`
//!   kept equal to `qty * rate`
//! - **Explicit outcomes**: submit returns a typed result and the editor only
//!   closes on success
//! - **Pluggable backends**: `reqwest`-based REST client, or an in-memory
//!   collection for development and tests
//! - **Change events**: a broadcast channel tells renderers when to redraw
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_desk::prelude::*;
//!
//! let config = ClientConfig::from_yaml_file("invoice-desk.yaml")?;
//! let mut store = InvoiceStoreView::from_config(&config)?;
//! store.mount().await.ok();
//!
//! store.open_create_form();
//! if let Some(editor) = store.editor_mut() {
//!     editor.input("name", "Ada Lovelace");
//!     editor.input("qty", "3");
//!     editor.input("rate", "40");
//! }
//! store.submit_editor().await.ok();
//!
//! for card in store.cards() {
//!     println!("{card}\n");
//! }
//! ```

pub mod config;
pub mod core;
pub mod storage;
pub mod telemetry;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ClientError, ClientResult, Envelope, EventBus, EventEnvelope, Invoice, InvoiceBackend,
        InvoiceFields, StoreEvent,
    };

    // === Config ===
    pub use crate::config::ClientConfig;

    // === Storage ===
    pub use crate::storage::{BackendCall, InMemoryInvoiceBackend, RestInvoiceBackend};

    // === View ===
    pub use crate::view::{
        DELETE_PROMPT, EMPTY_LIST_MESSAGE, EditorAction, FieldPatch, FieldUpdate, InvoiceCard,
        InvoiceEditor, InvoiceStoreView, LogPrompt, Prompt, SubmitOutcome, reduce,
    };

    // === Telemetry ===
    pub use crate::telemetry::init_tracing;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
