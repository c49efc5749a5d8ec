//! Read-only summary card for one invoice

use crate::core::Invoice;
use std::fmt;

/// Tax rate shown on every card; invoices carry no tax field
pub const TAX_RATE_PERCENT: f64 = 0.0;

/// What the list shows for an invoice
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceCard {
    pub document_id: String,
    pub issued: String,
    pub due: String,
    pub recipient_email: String,
    pub shipping_address: String,
    pub sender_name: String,
    pub sender_email: String,
    pub description: String,
    pub qty: f64,
    pub rate: f64,
    pub total: f64,
}

impl InvoiceCard {
    pub fn tax(&self) -> f64 {
        self.total * TAX_RATE_PERCENT / 100.0
    }

    pub fn amount_due(&self) -> f64 {
        self.total + self.tax()
    }
}

impl From<&Invoice> for InvoiceCard {
    fn from(invoice: &Invoice) -> Self {
        let fields = &invoice.fields;
        Self {
            document_id: invoice.document_id.clone(),
            issued: fields.date.clone(),
            due: fields.due_date.clone(),
            recipient_email: fields.recipient_email.clone(),
            shipping_address: fields.shipping_address.clone(),
            sender_name: fields.name.clone(),
            sender_email: fields.sender_email.clone(),
            description: fields.description.clone(),
            qty: fields.qty,
            rate: fields.rate,
            total: fields.total,
        }
    }
}

impl fmt::Display for InvoiceCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Issued: {}", self.issued)?;
        writeln!(f, "Due: {}", self.due)?;
        writeln!(f, "Billed To:")?;
        writeln!(f, "  Recipient's Email: {}", self.recipient_email)?;
        writeln!(f, "  Shipping Address: {}", self.shipping_address)?;
        writeln!(f, "From:")?;
        writeln!(f, "  Sender's Name: {}", self.sender_name)?;
        writeln!(f, "  Sender's Email: {}", self.sender_email)?;
        writeln!(
            f,
            "Item: {} | Qty {} | Rate ${:.2} | Total ${:.2}",
            self.description, self.qty, self.rate, self.total
        )?;
        writeln!(f, "Tax ({}%): {:.2}", TAX_RATE_PERCENT, self.tax())?;
        write!(f, "Amount due: ${:.2}", self.amount_due())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InvoiceFields;

    #[test]
    fn test_card_renders_summary() {
        let invoice = Invoice::new(
            "D1",
            1,
            InvoiceFields {
                name: "Ada".to_string(),
                sender_email: "ada@example.com".to_string(),
                recipient_email: "bob@example.com".to_string(),
                shipping_address: "1 Loop Road".to_string(),
                date: "2024-05-01".to_string(),
                due_date: "2024-05-31".to_string(),
                description: "Consulting".to_string(),
                qty: 3.0,
                rate: 40.0,
                total: 120.0,
                ..InvoiceFields::template()
            },
        );

        let card = InvoiceCard::from(&invoice);
        assert_eq!(card.amount_due(), 120.0);

        let text = card.to_string();
        assert!(text.contains("Issued: 2024-05-01"));
        assert!(text.contains("Recipient's Email: bob@example.com"));
        assert!(text.contains("Rate $40.00"));
        assert!(text.contains("Tax (0%): 0.00"));
        assert!(text.ends_with("Amount due: $120.00"));
    }
}
