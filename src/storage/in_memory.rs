//! In-memory implementation of InvoiceBackend for testing and development

use crate::core::error::operation;
use crate::core::{ClientError, ClientResult, Invoice, InvoiceBackend, InvoiceFields};
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// One request received by the in-memory backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List,
    Create(InvoiceFields),
    Update {
        document_id: String,
        fields: InvoiceFields,
    },
    Delete {
        document_id: String,
    },
}

impl BackendCall {
    /// The HTTP method the REST backend would use for this call
    pub fn method(&self) -> &'static str {
        match self {
            BackendCall::List => "GET",
            BackendCall::Create(_) => "POST",
            BackendCall::Update { .. } => "PUT",
            BackendCall::Delete { .. } => "DELETE",
        }
    }

    pub fn document_id(&self) -> Option<&str> {
        match self {
            BackendCall::Update { document_id, .. } | BackendCall::Delete { document_id } => {
                Some(document_id)
            }
            BackendCall::List | BackendCall::Create(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    invoices: Vec<Invoice>,
    next_id: i64,
    calls: Vec<BackendCall>,
    failures_pending: usize,
}

impl State {
    /// Record the call, then consume one pending failure if any
    fn admit(&mut self, op: &str, call: BackendCall) -> ClientResult<()> {
        self.calls.push(call);
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(ClientError::transport(op, "simulated backend failure"));
        }
        Ok(())
    }

    fn position(&self, document_id: &str) -> ClientResult<usize> {
        self.invoices
            .iter()
            .position(|inv| inv.document_id == document_id)
            .ok_or_else(|| ClientError::NotFound {
                document_id: document_id.to_string(),
            })
    }
}

/// In-memory invoice collection
///
/// Keeps insertion order, assigns `documentId` and `id` on create, and keeps
/// a log of every call so tests can assert exactly which requests were made.
/// Uses RwLock for thread-safe access.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvoiceBackend {
    state: Arc<RwLock<State>>,
}

impl InMemoryInvoiceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing invoices; they keep the identifiers they carry
    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        let next_id = invoices.iter().map(|inv| inv.id).max().unwrap_or(0);
        Self {
            state: Arc::new(RwLock::new(State {
                invoices,
                next_id,
                ..State::default()
            })),
        }
    }

    /// Make the next `count` calls fail with a transport error
    pub fn fail_next(&self, count: usize) -> ClientResult<()> {
        self.lock("fail_next")?.failures_pending = count;
        Ok(())
    }

    /// Snapshot of the stored collection
    pub fn invoices(&self) -> ClientResult<Vec<Invoice>> {
        Ok(self.read("invoices")?.invoices.clone())
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> ClientResult<Vec<BackendCall>> {
        Ok(self.read("calls")?.calls.clone())
    }

    fn lock(&self, op: &str) -> ClientResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| ClientError::transport(op, format!("Failed to acquire write lock: {}", e)))
    }

    fn read(&self, op: &str) -> ClientResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| ClientError::transport(op, format!("Failed to acquire read lock: {}", e)))
    }
}

#[async_trait]
impl InvoiceBackend for InMemoryInvoiceBackend {
    async fn list(&self) -> ClientResult<Vec<Invoice>> {
        let mut state = self.lock(operation::LIST)?;
        state.admit(operation::LIST, BackendCall::List)?;
        Ok(state.invoices.clone())
    }

    async fn create(&self, fields: &InvoiceFields) -> ClientResult<Invoice> {
        let mut state = self.lock(operation::CREATE)?;
        state.admit(operation::CREATE, BackendCall::Create(fields.clone()))?;

        state.next_id += 1;
        let document_id = Uuid::new_v4().simple().to_string();
        let invoice = Invoice::new(document_id, state.next_id, fields.clone());
        state.invoices.push(invoice.clone());

        Ok(invoice)
    }

    async fn update(&self, document_id: &str, fields: &InvoiceFields) -> ClientResult<()> {
        let mut state = self.lock(operation::UPDATE)?;
        state.admit(
            operation::UPDATE,
            BackendCall::Update {
                document_id: document_id.to_string(),
                fields: fields.clone(),
            },
        )?;

        let index = state.position(document_id)?;
        state.invoices[index].merge_fields(fields);

        Ok(())
    }

    async fn delete(&self, document_id: &str) -> ClientResult<()> {
        let mut state = self.lock(operation::DELETE)?;
        state.admit(
            operation::DELETE,
            BackendCall::Delete {
                document_id: document_id.to_string(),
            },
        )?;

        let index = state.position(document_id)?;
        state.invoices.remove(index);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> InvoiceFields {
        InvoiceFields {
            name: name.to_string(),
            qty: 2.0,
            rate: 10.0,
            total: 20.0,
            ..InvoiceFields::template()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identifiers() {
        let backend = InMemoryInvoiceBackend::new();

        let first = backend.create(&fields("first")).await.unwrap();
        let second = backend.create(&fields("second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.document_id.is_empty());
        assert_ne!(first.document_id, second.document_id);

        let names: Vec<_> = backend
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|inv| inv.fields.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_with_invoices_continues_numbering() {
        let backend =
            InMemoryInvoiceBackend::with_invoices(vec![Invoice::new("D7", 7, fields("seed"))]);
        let created = backend.create(&fields("next")).await.unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown() {
        let backend = InMemoryInvoiceBackend::new();

        let err = backend.update("missing", &fields("x")).await.unwrap_err();
        assert_eq!(err.error_code(), "INVOICE_NOT_FOUND");

        let err = backend.delete("missing").await.unwrap_err();
        assert_eq!(err.error_code(), "INVOICE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let backend =
            InMemoryInvoiceBackend::with_invoices(vec![Invoice::new("D1", 1, fields("old"))]);

        backend.update("D1", &fields("new")).await.unwrap();
        let stored = backend.invoices().unwrap();
        assert_eq!(stored[0].document_id, "D1");
        assert_eq!(stored[0].fields.name, "new");
    }

    #[tokio::test]
    async fn test_fail_next_records_call() {
        let backend = InMemoryInvoiceBackend::new();
        backend.fail_next(1).unwrap();

        let err = backend.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert!(backend.list().await.is_ok());

        let calls = backend.calls().unwrap();
        assert_eq!(calls, vec![BackendCall::List, BackendCall::List]);
        assert_eq!(calls[0].method(), "GET");
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let backend = InMemoryInvoiceBackend::new();
        let state = backend.state.clone();
        let _ = std::thread::spawn(move || {
            let _guard = state.write().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();

        let err = backend.fail_next(1).unwrap_err();
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
        assert!(err.to_string().contains("write lock"));
        assert!(backend.calls().is_err());
        assert!(backend.invoices().is_err());
    }
}
