//! Core module containing the invoice model, backend trait, errors and events

pub mod error;
pub mod events;
pub mod invoice;
pub mod service;

pub use error::{ClientError, ClientResult};
pub use events::{EventBus, EventEnvelope, StoreEvent};
pub use invoice::{Envelope, Invoice, InvoiceFields};
pub use service::InvoiceBackend;
