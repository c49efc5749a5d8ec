//! Typed error handling for invoice backend operations
//!
//! Every failure a backend call can produce falls into one of a few
//! categories. Callers that only want to log can use the `Display` output;
//! callers that branch on the failure can match the variant.
//!
//! # Error Categories
//!
//! - [`ClientError::Transport`]: the request never produced a response
//! - [`ClientError::Status`]: the backend answered with a non-success status
//! - [`ClientError::MalformedResponse`]: the body did not have the expected shape
//! - [`ClientError::NotFound`]: an address did not match any invoice
//! - [`ClientError::Config`]: the client configuration is unusable
//! - [`ClientError::InvalidState`]: the view cannot perform the request right now
//!
//! # Example
//!
//! ```rust,ignore
//! match backend.list().await {
//!     Ok(invoices) => println!("{} invoices", invoices.len()),
//!     Err(ClientError::Status { status, .. }) if status == 404 => {
//!         println!("collection does not exist");
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use thiserror::Error;

/// Backend operation names used in error context and log fields
pub mod operation {
    pub const LIST: &str = "list";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

/// The error type for every invoice backend operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Network or client-side failure before a response arrived
    #[error("Failed to {operation} invoices: transport error: {message}")]
    Transport { operation: String, message: String },

    /// The backend responded with a non-success HTTP status
    #[error("Failed to {operation} invoices: backend returned status {status}")]
    Status {
        operation: String,
        status: u16,
        body: Option<String>,
    },

    /// The response body did not have the documented shape
    #[error("Failed to {operation} invoices: malformed response: {message}")]
    MalformedResponse { operation: String, message: String },

    /// No invoice exists under the given document id
    #[error("Invoice with documentId '{document_id}' not found")]
    NotFound { document_id: String },

    /// The client configuration cannot be used
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// The view was asked to do something its current state does not allow
    #[error("Invalid view state: {0}")]
    InvalidState(String),
}

impl ClientError {
    pub fn transport(operation: &str, message: impl Into<String>) -> Self {
        ClientError::Transport {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn status(operation: &str, status: u16, body: Option<String>) -> Self {
        ClientError::Status {
            operation: operation.to_string(),
            status,
            body,
        }
    }

    pub fn malformed(operation: &str, message: impl Into<String>) -> Self {
        ClientError::MalformedResponse {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Stable error code for programmatic handling and log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport { .. } => "TRANSPORT_ERROR",
            ClientError::Status { .. } => "HTTP_STATUS_ERROR",
            ClientError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            ClientError::NotFound { .. } => "INVOICE_NOT_FOUND",
            ClientError::Config(_) => "CONFIG_ERROR",
            ClientError::InvalidState(_) => "INVALID_STATE",
        }
    }

    /// The backend operation that failed, if the error came from one
    pub fn operation(&self) -> Option<&str> {
        match self {
            ClientError::Transport { operation, .. }
            | ClientError::Status { operation, .. }
            | ClientError::MalformedResponse { operation, .. } => Some(operation),
            ClientError::NotFound { .. }
            | ClientError::Config(_)
            | ClientError::InvalidState(_) => None,
        }
    }
}

/// A specialized Result type for invoice backend operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ClientError::status(operation::LIST, 503, None);
        assert!(err.to_string().contains("list"));
        assert!(err.to_string().contains("503"));
        assert_eq!(err.error_code(), "HTTP_STATUS_ERROR");
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            ClientError::transport(operation::CREATE, "refused"),
            ClientError::status(operation::CREATE, 500, None),
            ClientError::malformed(operation::LIST, "data is not an array"),
            ClientError::NotFound {
                document_id: "abc".to_string(),
            },
            ClientError::Config("empty base_url".to_string()),
            ClientError::InvalidState("no editor".to_string()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.error_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_operation_context() {
        let err = ClientError::malformed(operation::LIST, "data is not an array");
        assert_eq!(err.operation(), Some("list"));

        let err = ClientError::NotFound {
            document_id: "D1".to_string(),
        };
        assert_eq!(err.operation(), None);
        assert!(err.to_string().contains("D1"));
    }
}
