//! Error types for RealPic Core
//!
//! Provides error handling for:
//! - Lifecycle rule violations (validation and state)
//! - Collaborator failures (document store, blob store, gateway)
//! - Payments that were collected but could not be applied

use crate::payment::PaymentAttemptId;
use realpic_album::{AlbumId, Price};
use realpic_lifecycle::LifecycleError;

/// Main controller error type
#[derive(Debug, thiserror::Error)]
pub enum AlbumError {
    /// Rejected by the lifecycle rules
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Approval link could not be obtained
    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(#[from] GatewayError),

    /// No signed-in user
    #[error("authentication required")]
    AuthenticationRequired,

    /// Album vanished from the store
    #[error("album not found: {0}")]
    NotFound(AlbumId),

    /// Document store failure
    #[error("store error: {0}")]
    Store(StoreError),

    /// Photo upload failure
    #[error("upload failed: {0}")]
    Blob(#[from] BlobError),

    /// Coupon code left blank
    #[error("coupon code must not be empty")]
    MissingCouponCode,

    /// Coupon code not recognised
    #[error("invalid coupon: {0}")]
    InvalidCoupon(String),

    /// No pending payment under that attempt
    #[error("unknown payment attempt: {0}")]
    UnknownPayment(PaymentAttemptId),

    /// The charge went through but the record update did not
    #[error("payment {attempt} of ${price} completed, but update failed: {source}")]
    PaidButNotApplied {
        attempt: PaymentAttemptId,
        price: Price,
        #[source]
        source: Box<AlbumError>,
    },
}

impl AlbumError {
    /// Money moved without the record changing
    #[inline]
    #[must_use]
    pub fn is_paid_but_not_applied(&self) -> bool {
        matches!(self, Self::PaidButNotApplied { .. })
    }

    /// Rejected before any collaborator was contacted
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Lifecycle(e) => e.is_validation(),
            Self::MissingCouponCode => true,
            _ => false,
        }
    }

    /// Re-triggering the same operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GatewayUnavailable(_) | Self::Store(StoreError::Unavailable(_)) | Self::Blob(_)
        )
    }
}

impl From<StoreError> for AlbumError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Document store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record under that id
    #[error("record not found: {0}")]
    NotFound(AlbumId),

    /// Store unreachable or write rejected
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored document does not decode
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Blob store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// Upload rejected
    #[error("put {path} failed: {reason}")]
    PutFailed { path: String, reason: String },

    /// Nothing stored at that path
    #[error("no object at {0}")]
    Missing(String),
}

/// Approval gateway errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request never completed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with an error status
    #[error("checkout endpoint returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Success response without a link
    #[error("no approval link returned")]
    MissingApproveLink,
}

/// Cover image lookup errors
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    /// Request never completed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Search service answered with an error status
    #[error("image search returned {0}")]
    Status(u16),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn not_found_maps_to_album_error() {
        let err: AlbumError = StoreError::NotFound(AlbumId::new("gone")).into();
        assert!(matches!(err, AlbumError::NotFound(ref id) if id.as_str() == "gone"));
    }

    #[test]
    fn paid_but_not_applied_is_distinct() {
        let err = AlbumError::PaidButNotApplied {
            attempt: PaymentAttemptId(Ulid::nil()),
            price: Price::from_dollars(9),
            source: Box::new(StoreError::Unavailable("offline".into()).into()),
        };
        assert!(err.is_paid_but_not_applied());
        assert!(err.to_string().contains("completed, but update failed"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn validation_classification() {
        assert!(AlbumError::from(LifecycleError::EmptyName).is_validation());
        assert!(!AlbumError::AuthenticationRequired.is_validation());
        assert!(AlbumError::Store(StoreError::Unavailable("x".into())).is_retryable());
    }
}
