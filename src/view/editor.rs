//! Invoice editor: field-state reducer, derived total and submission
//!
//! The editor state is a plain [`InvoiceFields`] record. Every change goes
//! through [`reduce`], a pure `state -> state` transition, so each action is
//! testable without a backend. [`InvoiceEditor`] wraps the reducer, keeps
//! `total` equal to `qty * rate` after each transition, and turns a submit
//! into a single create-or-update request.

use crate::core::invoice::finite_or_zero;
use crate::core::{ClientResult, Invoice, InvoiceBackend, InvoiceFields};
use tracing::{debug, instrument};

/// A partial field record; `None` leaves the current value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub sender_email: Option<String>,
    pub recipient_email: Option<String>,
    pub shipping_address: Option<String>,
    pub date: Option<String>,
    pub due_date: Option<String>,
    pub invoice_note: Option<String>,
    pub description: Option<String>,
    pub qty: Option<f64>,
    pub rate: Option<f64>,
    pub total: Option<f64>,
}

impl FieldPatch {
    /// A patch that sets all eleven fields at once
    pub fn full(fields: InvoiceFields) -> Self {
        Self {
            name: Some(fields.name),
            sender_email: Some(fields.sender_email),
            recipient_email: Some(fields.recipient_email),
            shipping_address: Some(fields.shipping_address),
            date: Some(fields.date),
            due_date: Some(fields.due_date),
            invoice_note: Some(fields.invoice_note),
            description: Some(fields.description),
            qty: Some(fields.qty),
            rate: Some(fields.rate),
            total: Some(fields.total),
        }
    }

    fn apply(self, mut state: InvoiceFields) -> InvoiceFields {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    state.$field = value;
                })*
            };
        }
        merge!(
            name,
            sender_email,
            recipient_email,
            shipping_address,
            date,
            due_date,
            invoice_note,
            description,
            qty,
            rate,
            total
        );
        state
    }
}

/// A new value for exactly one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    SenderEmail(String),
    RecipientEmail(String),
    ShippingAddress(String),
    Date(String),
    DueDate(String),
    InvoiceNote(String),
    Description(String),
    Qty(f64),
    Rate(f64),
    Total(f64),
}

impl FieldUpdate {
    /// Build an update from a form field name and its raw text
    ///
    /// Names are the camelCase wire names. Numbers that do not parse, or
    /// parse to NaN or infinity, become `0`. Returns `None` for unknown names.
    pub fn parse(name: &str, raw: &str) -> Option<Self> {
        let text = || raw.to_string();
        let number = || finite_or_zero(raw.trim().parse::<f64>().unwrap_or(0.0));

        let update = match name {
            "name" => FieldUpdate::Name(text()),
            "senderEmail" => FieldUpdate::SenderEmail(text()),
            "recipientEmail" => FieldUpdate::RecipientEmail(text()),
            "shippingAddress" => FieldUpdate::ShippingAddress(text()),
            "date" => FieldUpdate::Date(text()),
            "dueDate" => FieldUpdate::DueDate(text()),
            "invoiceNote" => FieldUpdate::InvoiceNote(text()),
            "description" => FieldUpdate::Description(text()),
            "qty" => FieldUpdate::Qty(number()),
            "rate" => FieldUpdate::Rate(number()),
            "total" => FieldUpdate::Total(number()),
            _ => return None,
        };
        Some(update)
    }

    fn apply(self, mut state: InvoiceFields) -> InvoiceFields {
        match self {
            FieldUpdate::Name(v) => state.name = v,
            FieldUpdate::SenderEmail(v) => state.sender_email = v,
            FieldUpdate::RecipientEmail(v) => state.recipient_email = v,
            FieldUpdate::ShippingAddress(v) => state.shipping_address = v,
            FieldUpdate::Date(v) => state.date = v,
            FieldUpdate::DueDate(v) => state.due_date = v,
            FieldUpdate::InvoiceNote(v) => state.invoice_note = v,
            FieldUpdate::Description(v) => state.description = v,
            FieldUpdate::Qty(v) => state.qty = v,
            FieldUpdate::Rate(v) => state.rate = v,
            FieldUpdate::Total(v) => state.total = v,
        }
        state
    }
}

/// Editor transitions
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Back to the blank template
    Reset,
    /// Shallow-merge the given fields
    SetFields(FieldPatch),
    /// Overwrite one field
    UpdateField(FieldUpdate),
    /// Input for a field the form does not have; leaves the state alone
    Unrecognized(String),
}

impl EditorAction {
    /// Translate a form input change into an action
    pub fn from_input(name: &str, raw: &str) -> Self {
        match FieldUpdate::parse(name, raw) {
            Some(update) => EditorAction::UpdateField(update),
            None => EditorAction::Unrecognized(name.to_string()),
        }
    }
}

/// The editor's transition function
pub fn reduce(state: InvoiceFields, action: EditorAction) -> InvoiceFields {
    match action {
        EditorAction::Reset => InvoiceFields::template(),
        EditorAction::SetFields(patch) => patch.apply(state),
        EditorAction::UpdateField(update) => update.apply(state),
        EditorAction::Unrecognized(_) => state,
    }
}

/// Result of a successful submit, to be folded into the store view's list
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend created this record
    Created(Invoice),
    /// These fields were written to the addressed invoice
    Updated {
        document_id: String,
        fields: InvoiceFields,
    },
}

/// Form state for creating or editing one invoice
///
/// Exists only while the form is open. Opened on `None` it creates; opened
/// on an invoice it edits that invoice.
#[derive(Debug, Clone)]
pub struct InvoiceEditor {
    fields: InvoiceFields,
    selected: Option<Invoice>,
}

impl InvoiceEditor {
    pub fn open(selected: Option<Invoice>) -> Self {
        let mut editor = Self {
            fields: InvoiceFields::template(),
            selected: None,
        };
        editor.select(selected);
        editor
    }

    /// Rebind to a different selection
    ///
    /// An invoice seeds all eleven fields in one transition; `None` resets.
    pub fn select(&mut self, selected: Option<Invoice>) {
        let action = match &selected {
            Some(invoice) => {
                EditorAction::SetFields(FieldPatch::full(InvoiceFields::seeded_from(invoice)))
            }
            None => EditorAction::Reset,
        };
        self.selected = selected;
        self.dispatch(action);
    }

    /// Apply one action, then bring `total` back in line with `qty * rate`
    pub fn dispatch(&mut self, action: EditorAction) {
        if let EditorAction::Unrecognized(name) = &action {
            debug!(field = %name, "Ignoring input for unknown field");
        }
        self.fields = reduce(std::mem::take(&mut self.fields), action);
        self.recompute_total();
    }

    /// Shorthand for a form input change
    pub fn input(&mut self, name: &str, raw: &str) {
        self.dispatch(EditorAction::from_input(name, raw));
    }

    /// Dispatch an update for `total` if it is stale; returns whether it was
    fn recompute_total(&mut self) -> bool {
        let total = self.fields.line_total();
        if total == self.fields.total {
            return false;
        }
        self.fields = reduce(
            std::mem::take(&mut self.fields),
            EditorAction::UpdateField(FieldUpdate::Total(total)),
        );
        // qty and rate are unchanged, so a second pass is a no-op
        true
    }

    pub fn fields(&self) -> &InvoiceFields {
        &self.fields
    }

    pub fn selected(&self) -> Option<&Invoice> {
        self.selected.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.selected.is_some()
    }

    /// Form heading
    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Invoice"
        } else {
            "Create Invoice"
        }
    }

    /// Send the form: PUT for an edit, POST for a create
    ///
    /// Exactly one request is issued. The editor itself is untouched; the
    /// caller decides whether to close it based on the result.
    #[instrument(skip(self, backend), fields(editing = self.is_editing()))]
    pub async fn submit(&self, backend: &dyn InvoiceBackend) -> ClientResult<SubmitOutcome> {
        match &self.selected {
            Some(invoice) => {
                backend.update(&invoice.document_id, &self.fields).await?;
                Ok(SubmitOutcome::Updated {
                    document_id: invoice.document_id.clone(),
                    fields: self.fields.clone(),
                })
            }
            None => {
                let created = backend.create(&self.fields).await?;
                Ok(SubmitOutcome::Created(created))
            }
        }
    }
}
