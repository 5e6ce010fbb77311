//! Error types for the checkout backend

use warp::http::StatusCode;

/// Checkout backend errors
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// No price in the request, or a zero price
    #[error("Price is required")]
    MissingPrice,

    /// Price not a dollar amount
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Request to the provider failed
    #[error("provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    /// Token exchange returned no token
    #[error("no access token from PayPal")]
    NoAccessToken,

    /// Order creation answered with something other than 201
    #[error("PayPal order creation failed with {status}: {body}")]
    OrderRejected { status: u16, body: String },

    /// Order created without an approval link
    #[error("No approve link found")]
    NoApproveLink,

    /// Unusable startup settings
    #[error("configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// The caller's request is at fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingPrice | Self::InvalidPrice(_))
    }

    /// HTTP status reported to the caller
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message placed in the `{"error": ...}` body; provider details stay in the logs
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingPrice => "Price is required".to_string(),
            Self::InvalidPrice(_) => "Price must be a dollar amount".to_string(),
            Self::NoApproveLink => "No approve link found".to_string(),
            _ => "Failed to create PayPal order".to_string(),
        }
    }
}
