//! Invoice store view: the list, the open/closed editor, and list patching
//!
//! The store view owns the only copy of the invoice list. It is fetched once
//! by [`InvoiceStoreView::mount`] and afterwards patched locally from the
//! result of each completed request. Nothing is refetched after a mutation.
//!
//! Failures are absorbed here: every operation logs the error and hands it
//! back as a value, leaving the list as it was.

use crate::config::ClientConfig;
use crate::core::{
    ClientError, ClientResult, EventBus, EventEnvelope, Invoice, InvoiceBackend, StoreEvent,
};
use crate::storage::RestInvoiceBackend;
use crate::view::card::InvoiceCard;
use crate::view::editor::{InvoiceEditor, SubmitOutcome};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

/// Shown before every delete
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this invoice?";

/// Shown in place of the list when there is nothing to show
pub const EMPTY_LIST_MESSAGE: &str = "No invoice yet.";

/// Blocking, informational message to the user
///
/// The user can only acknowledge it; there is no answer to read back.
pub trait Prompt: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prompt that writes the message to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPrompt;

impl Prompt for LogPrompt {
    fn alert(&self, message: &str) {
        info!(prompt = %message, "Prompting user");
    }
}

/// The invoice list view and its editor
pub struct InvoiceStoreView {
    backend: Arc<dyn InvoiceBackend>,
    prompt: Arc<dyn Prompt>,
    events: EventBus,
    invoices: Vec<Invoice>,
    editor: Option<InvoiceEditor>,
}

impl InvoiceStoreView {
    pub fn new(backend: Arc<dyn InvoiceBackend>) -> Self {
        Self {
            backend,
            prompt: Arc::new(LogPrompt),
            events: EventBus::default(),
            invoices: Vec::new(),
            editor: None,
        }
    }

    /// Store view over the REST backend described by `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let backend = RestInvoiceBackend::new(config.clone())?;
        Ok(Self::new(Arc::new(backend)).with_event_bus(EventBus::new(config.event_capacity)))
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Receive a [`StoreEvent`] for every later change
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Fetch the collection once and adopt it as the list
    ///
    /// On any failure the list keeps its current contents and the error is
    /// logged and returned.
    #[instrument(skip(self))]
    pub async fn mount(&mut self) -> ClientResult<usize> {
        match self.backend.list().await {
            Ok(invoices) => {
                let count = invoices.len();
                info!(count, "Fetched invoices");
                self.invoices = invoices;
                self.events.publish(StoreEvent::Loaded { count });
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "Error fetching invoices");
                Err(e)
            }
        }
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn find(&self, document_id: &str) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|inv| inv.document_id == document_id)
    }

    /// One card per invoice, in list order
    pub fn cards(&self) -> Vec<InvoiceCard> {
        self.invoices.iter().map(InvoiceCard::from).collect()
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&InvoiceEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut InvoiceEditor> {
        self.editor.as_mut()
    }

    /// The invoice the open editor is bound to
    pub fn selected(&self) -> Option<&Invoice> {
        self.editor.as_ref().and_then(InvoiceEditor::selected)
    }

    /// Open a blank editor, discarding any previous selection
    pub fn open_create_form(&mut self) {
        self.editor = Some(InvoiceEditor::open(None));
        self.events
            .publish(StoreEvent::EditorOpened { document_id: None });
    }

    /// Open the editor on a copy of the listed invoice
    ///
    /// Returns `false` and changes nothing if no invoice has that id.
    pub fn open_edit_form(&mut self, document_id: &str) -> bool {
        let Some(invoice) = self.find(document_id).cloned() else {
            debug!(document_id, "No invoice to edit");
            return false;
        };

        debug!(document_id, "Invoice being edited");
        self.editor = Some(InvoiceEditor::open(Some(invoice)));
        self.events.publish(StoreEvent::EditorOpened {
            document_id: Some(document_id.to_string()),
        });
        true
    }

    /// Close the editor and clear the selection
    pub fn close_form(&mut self) {
        if self.editor.take().is_some() {
            self.events.publish(StoreEvent::EditorClosed);
        }
    }

    /// Prompt, then delete the invoice and drop it from the list
    ///
    /// The prompt only informs: the request is sent whatever the user does
    /// with it.
    #[instrument(skip(self))]
    pub async fn delete_invoice(&mut self, document_id: &str) -> ClientResult<()> {
        self.prompt.alert(DELETE_PROMPT);

        if let Err(e) = self.backend.delete(document_id).await {
            error!(error = %e, code = e.error_code(), "Error deleting invoice");
            return Err(e);
        }

        let before = self.invoices.len();
        self.invoices.retain(|inv| inv.document_id != document_id);
        if self.invoices.len() != before {
            self.events.publish(StoreEvent::Deleted {
                document_id: document_id.to_string(),
            });
        }
        Ok(())
    }

    /// Submit the open editor and fold the result into the list
    ///
    /// The editor closes only when the request succeeded. On failure it
    /// stays open with the user's input intact.
    #[instrument(skip(self))]
    pub async fn submit_editor(&mut self) -> ClientResult<SubmitOutcome> {
        let Some(editor) = self.editor.as_ref() else {
            return Err(ClientError::InvalidState(
                "no editor is open to submit".to_string(),
            ));
        };

        let outcome = match editor.submit(self.backend.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, code = e.error_code(), "Error submitting invoice");
                return Err(e);
            }
        };

        self.apply(&outcome);
        self.close_form();
        Ok(outcome)
    }

    /// Patch the list with a completed submit
    fn apply(&mut self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Created(invoice) => {
                info!(document_id = %invoice.document_id, "Invoice created");
                self.invoices.push(invoice.clone());
                self.events.publish(StoreEvent::Created {
                    document_id: invoice.document_id.clone(),
                });
            }
            SubmitOutcome::Updated {
                document_id,
                fields,
            } => {
                info!(document_id = %document_id, "Invoice updated");
                self.invoices
                    .iter_mut()
                    .filter(|inv| &inv.document_id == document_id)
                    .for_each(|inv| inv.merge_fields(fields));
                self.events.publish(StoreEvent::Updated {
                    document_id: document_id.clone(),
                });
            }
        }
    }
}
