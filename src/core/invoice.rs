//! Invoice record and its editable field set

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Text field: strings as-is, numbers and booleans as their JSON text,
/// anything else (including `null`) as empty
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Numeric field: a JSON number or a numeric string; anything else reads as zero
///
/// Forms that store raw input text leave `"qty": "3"` in the collection.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(finite_or_zero(number))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    })
}

/// The eleven user-editable invoice fields
///
/// This is both the editor state and the `data` payload sent on create and
/// update. Every field falls back to its zero value when absent, `null`, or of
/// a type it cannot be read from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFields {
    /// Sender display name
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recipient_email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub shipping_address: String,
    /// Issue date
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub invoice_note: String,
    /// Single line-item description
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub qty: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rate: f64,
    /// Derived, always `qty * rate` once the editor has settled
    #[serde(default, deserialize_with = "lenient_number")]
    pub total: f64,
}

impl InvoiceFields {
    /// The all-empty, all-zero field set a blank form starts from
    pub fn template() -> Self {
        Self::default()
    }

    /// `qty * rate`
    pub fn line_total(&self) -> f64 {
        self.qty * self.rate
    }

    /// Copy the editable fields out of an invoice, zeroing unusable numbers
    pub fn seeded_from(invoice: &Invoice) -> Self {
        let fields = &invoice.fields;
        Self {
            name: fields.name.clone(),
            sender_email: fields.sender_email.clone(),
            recipient_email: fields.recipient_email.clone(),
            shipping_address: fields.shipping_address.clone(),
            date: fields.date.clone(),
            due_date: fields.due_date.clone(),
            invoice_note: fields.invoice_note.clone(),
            description: fields.description.clone(),
            qty: finite_or_zero(fields.qty),
            rate: finite_or_zero(fields.rate),
            total: finite_or_zero(fields.total),
        }
    }
}

/// Numbers that cannot take part in `qty * rate` collapse to zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// An invoice as held by the backend collection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Backend-assigned opaque identifier, used to address updates and deletes
    #[serde(default, deserialize_with = "lenient_text")]
    pub document_id: String,

    /// Secondary numeric identifier
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,

    #[serde(flatten)]
    pub fields: InvoiceFields,
}

impl Invoice {
    pub fn new(document_id: impl Into<String>, id: i64, fields: InvoiceFields) -> Self {
        Self {
            document_id: document_id.into(),
            id,
            fields,
        }
    }

    /// Replace every editable field, keeping both identifiers
    pub fn merge_fields(&mut self, fields: &InvoiceFields) {
        self.fields = fields.clone();
    }

    /// Decode one collection item, flat or wrapped in `attributes`
    ///
    /// Wrapped items carry their identifiers beside `attributes`; those
    /// take precedence over any copy inside it.
    pub fn from_record(record: Value) -> Result<Self, String> {
        let mut outer = match record {
            Value::Object(map) => map,
            other => return Err(format!("invoice record is not an object: {}", other)),
        };

        let merged = match outer.remove("attributes") {
            None => outer,
            Some(Value::Object(mut attributes)) => {
                for key in ["id", "documentId"] {
                    if let Some(value) = outer.remove(key).filter(|v| !v.is_null()) {
                        attributes.insert(key.to_string(), value);
                    }
                }
                attributes
            }
            Some(other) => {
                return Err(format!("invoice attributes are not an object: {}", other));
            }
        };

        serde_json::from_value(Value::Object(merged)).map_err(|e| e.to_string())
    }
}

/// The `{ "data": ... }` wrapper used by every request and response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> InvoiceFields {
        InvoiceFields {
            name: "Ada".to_string(),
            sender_email: "ada@example.com".to_string(),
            recipient_email: "bob@example.com".to_string(),
            shipping_address: "1 Loop Road".to_string(),
            date: "2024-05-01".to_string(),
            due_date: "2024-05-31".to_string(),
            invoice_note: "thanks".to_string(),
            description: "Consulting".to_string(),
            qty: 3.0,
            rate: 40.0,
            total: 120.0,
        }
    }

    #[test]
    fn test_template_is_all_zero() {
        let template = InvoiceFields::template();
        assert_eq!(template.name, "");
        assert_eq!(template.qty, 0.0);
        assert_eq!(template.rate, 0.0);
        assert_eq!(template.total, 0.0);
    }

    #[test]
    fn test_fields_serialize_camel_case() {
        let json = serde_json::to_value(sample_fields()).unwrap();
        assert_eq!(json["senderEmail"], "ada@example.com");
        assert_eq!(json["dueDate"], "2024-05-31");
        assert_eq!(json["invoiceNote"], "thanks");
        assert_eq!(json.as_object().unwrap().len(), 11);
    }

    #[test]
    fn test_flat_record_with_nulls_and_extras() {
        let record = json!({
            "id": 4,
            "documentId": "abc123",
            "name": "Ada",
            "senderEmail": null,
            "qty": 2,
            "rate": 7.5,
            "createdAt": "2024-05-01T10:00:00.000Z"
        });

        let invoice = Invoice::from_record(record).unwrap();
        assert_eq!(invoice.document_id, "abc123");
        assert_eq!(invoice.id, 4);
        assert_eq!(invoice.fields.name, "Ada");
        assert_eq!(invoice.fields.sender_email, "");
        assert_eq!(invoice.fields.qty, 2.0);
        assert_eq!(invoice.fields.total, 0.0);
    }

    #[test]
    fn test_numeric_strings_and_wrong_types() {
        let record = json!({
            "id": "12",
            "documentId": "D2",
            "name": 42,
            "senderEmail": ["not", "text"],
            "qty": "3",
            "rate": " 4.5 ",
            "total": "n/a"
        });

        let invoice = Invoice::from_record(record).unwrap();
        assert_eq!(invoice.id, 12);
        assert_eq!(invoice.fields.name, "42");
        assert_eq!(invoice.fields.sender_email, "");
        assert_eq!(invoice.fields.qty, 3.0);
        assert_eq!(invoice.fields.rate, 4.5);
        assert_eq!(invoice.fields.total, 0.0);
    }

    #[test]
    fn test_wrapped_record_identifiers_win() {
        let record = json!({
            "id": 9,
            "documentId": "outer",
            "attributes": {
                "id": 1,
                "name": "Wrapped",
                "rate": 5
            }
        });

        let invoice = Invoice::from_record(record).unwrap();
        assert_eq!(invoice.id, 9);
        assert_eq!(invoice.document_id, "outer");
        assert_eq!(invoice.fields.name, "Wrapped");
        assert_eq!(invoice.fields.rate, 5.0);
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert!(Invoice::from_record(json!("nope")).is_err());
        assert!(Invoice::from_record(json!({"id": 1, "attributes": [1, 2]})).is_err());
    }

    #[test]
    fn test_merge_fields_keeps_identifiers() {
        let mut invoice = Invoice::new("D1", 1, InvoiceFields::template());
        invoice.merge_fields(&sample_fields());
        assert_eq!(invoice.document_id, "D1");
        assert_eq!(invoice.id, 1);
        assert_eq!(invoice.fields, sample_fields());
    }

    #[test]
    fn test_seeded_from_zeroes_non_finite_numbers() {
        let mut fields = sample_fields();
        fields.qty = f64::NAN;
        let invoice = Invoice::new("D1", 1, fields);
        let seeded = InvoiceFields::seeded_from(&invoice);
        assert_eq!(seeded.qty, 0.0);
        assert_eq!(seeded.rate, 40.0);
        assert_eq!(seeded.name, "Ada");
    }

    #[test]
    fn test_envelope_wraps_fields() {
        let body = serde_json::to_value(Envelope::new(&sample_fields())).unwrap();
        assert_eq!(body["data"]["name"], "Ada");
        assert_eq!(body["data"]["total"], 120.0);
    }
}
