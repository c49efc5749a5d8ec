//! Invoice backend implementations

pub mod in_memory;
pub mod rest;

pub use in_memory::{BackendCall, InMemoryInvoiceBackend};
pub use rest::RestInvoiceBackend;
