//! Backend trait for the invoice collection

use crate::core::error::ClientResult;
use crate::core::invoice::{Invoice, InvoiceFields};
use async_trait::async_trait;

/// Access to the remote invoice collection
///
/// Implementations speak to whatever holds the invoices. The view layer is
/// agnostic to the transport: it only needs these four operations.
#[async_trait]
pub trait InvoiceBackend: Send + Sync {
    /// Fetch the full collection, in backend order
    async fn list(&self) -> ClientResult<Vec<Invoice>>;

    /// Create an invoice; the returned record carries the assigned identifiers
    async fn create(&self, fields: &InvoiceFields) -> ClientResult<Invoice>;

    /// Replace every editable field of the invoice addressed by `document_id`
    ///
    /// Success means the backend accepted the request; no record is read back.
    async fn update(&self, document_id: &str, fields: &InvoiceFields) -> ClientResult<()>;

    /// Remove the invoice addressed by `document_id`
    async fn delete(&self, document_id: &str) -> ClientResult<()>;
}
