//! REST implementation of InvoiceBackend over `reqwest`
//!
//! Speaks the `{ "data": ... }` envelope convention:
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | list      | `GET {collection}` | `{ data: [record, ...] }`, unreadable records skipped |
//! | create    | `POST {collection}` with `{ data: fields }` | `{ data: record }` |
//! | update    | `PUT {collection}/{documentId}` with `{ data: fields }` | ignored |
//! | delete    | `DELETE {collection}/{documentId}` | ignored |

use crate::config::ClientConfig;
use crate::core::error::operation;
use crate::core::{ClientError, ClientResult, Envelope, Invoice, InvoiceBackend, InvoiceFields};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Invoice backend reached over HTTP
#[derive(Debug, Clone)]
pub struct RestInvoiceBackend {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RestInvoiceBackend {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and reject non-success statuses
    async fn send(&self, op: &str, request: RequestBuilder) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(op, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(ClientError::status(op, status.as_u16(), body));
        }

        debug!(status = status.as_u16(), "Backend responded");
        Ok(response)
    }

    /// Read a success body and take its `data` member
    async fn read_data(op: &str, response: Response) -> ClientResult<Value> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(op, e.to_string()))?;

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::malformed(op, format!("body is not JSON: {}", e)))?;

        match body {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| ClientError::malformed(op, "response has no data field")),
            _ => Err(ClientError::malformed(op, "response is not a JSON object")),
        }
    }
}

#[async_trait]
impl InvoiceBackend for RestInvoiceBackend {
    #[instrument(skip(self), fields(url = %self.config.collection_url()))]
    async fn list(&self) -> ClientResult<Vec<Invoice>> {
        let request = self.http.get(self.config.collection_url());
        let response = self.send(operation::LIST, request).await?;

        let records = match Self::read_data(operation::LIST, response).await? {
            Value::Array(records) => records,
            other => {
                return Err(ClientError::malformed(
                    operation::LIST,
                    format!("data is not an array: {}", other),
                ));
            }
        };

        let invoices = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match Invoice::from_record(record) {
                Ok(invoice) => Some(invoice),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable invoice record");
                    None
                }
            })
            .collect();
        Ok(invoices)
    }

    #[instrument(skip(self, fields))]
    async fn create(&self, fields: &InvoiceFields) -> ClientResult<Invoice> {
        let request = self
            .http
            .post(self.config.collection_url())
            .json(&Envelope::new(fields));
        let response = self.send(operation::CREATE, request).await?;

        let data = Self::read_data(operation::CREATE, response).await?;
        Invoice::from_record(data).map_err(|e| ClientError::malformed(operation::CREATE, e))
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, document_id: &str, fields: &InvoiceFields) -> ClientResult<()> {
        let request = self
            .http
            .put(self.config.item_url(document_id))
            .json(&Envelope::new(fields));
        self.send(operation::UPDATE, request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, document_id: &str) -> ClientResult<()> {
        let request = self.http.delete(self.config.item_url(document_id));
        self.send(operation::DELETE, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClientConfig::default_config().with_base_url("localhost:1337");
        let err = RestInvoiceBackend::new(config).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on loopback is not expected to accept HTTP
        let config = ClientConfig::default_config().with_base_url("http://127.0.0.1:9/api");
        let backend = RestInvoiceBackend::new(config).unwrap();

        let err = backend.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(err.operation(), Some("list"));
    }
}
