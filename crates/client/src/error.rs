//! Unified error handling for client operations.
//!
//! Every failure degrades to an inline message on the view that triggered it;
//! nothing here is fatal. [`ClientError::user_message`] produces that message.

use reqwest::StatusCode;
use thiserror::Error;

use fierce_core::FormError;

use crate::session::StoreError;

/// Message shown when a protected call is attempted without a token.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "No token found. Please log in.";

/// Client-level error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No token was present before a protected call; no request was sent.
    #[error("No token found. Please log in.")]
    MissingCredential,

    /// The backend answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Server-provided message, or the status text.
        message: String,
    },

    /// No usable response: connection failure, reset, or a body that could
    /// not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response carried a body that was not the expected JSON.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request path could not be joined onto the API base URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The session store failed.
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    /// The add-product form did not validate.
    #[error("{0}")]
    Form(#[from] FormError),
}

impl ClientError {
    /// The inline message a view shows for this error.
    #[must_use]
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            Self::MissingCredential => MISSING_CREDENTIAL_MESSAGE.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) | Self::Url(_) => {
                operation.transport_failure().to_string()
            }
            Self::Store(err) => err.to_string(),
            Self::Form(err) => err.to_string(),
        }
    }

    /// HTTP status when the backend rejected the call.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A user-triggered operation, used to word transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchProducts,
    FetchOrders,
    AddProduct,
    ApproveOrder,
}

impl Operation {
    /// Message shown when the operation got no usable response.
    #[must_use]
    pub const fn transport_failure(self) -> &'static str {
        match self {
            Self::FetchProducts => "Error occurred while fetching products",
            Self::FetchOrders => "Error occurred while fetching orders",
            Self::AddProduct => "Error occurred while adding product",
            Self::ApproveOrder => "Error occurred while approving order",
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use fierce_core::FormField;

    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = ClientError::MissingCredential;
        assert_eq!(err.to_string(), "No token found. Please log in.");
        assert_eq!(
            err.user_message(Operation::FetchOrders),
            "No token found. Please log in."
        );
    }

    #[test]
    fn test_api_error_surfaces_server_message() {
        let err = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Order not found".to_string(),
        };
        assert_eq!(err.user_message(Operation::ApproveOrder), "Order not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "API error (404 Not Found): Order not found");
    }

    #[test]
    fn test_decode_error_uses_operation_message() {
        let Err(source) = serde_json::from_str::<serde_json::Value>("<html>") else {
            panic!("expected a parse failure");
        };
        let err = ClientError::from(source);
        assert_eq!(
            err.user_message(Operation::FetchProducts),
            "Error occurred while fetching products"
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_form_error_message() {
        let err = ClientError::from(FormError::Required(FormField::Name));
        assert_eq!(err.user_message(Operation::AddProduct), "name is required");
    }
}
