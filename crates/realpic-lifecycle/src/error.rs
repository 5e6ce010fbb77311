//! Lifecycle rule violations

use realpic_album::{AddressField, AlbumStatus};

/// An action was rejected by the lifecycle rules
///
/// None of these have touched a collaborator; the album is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Every photo slot is already used
    #[error("album is full ({limit} photos)")]
    CapacityExceeded { limit: u32 },

    /// Action not permitted in the album's current status
    #[error("{action} is not allowed while the album is {status}")]
    InvalidState {
        status: AlbumStatus,
        action: &'static str,
    },

    /// Package not in the catalog
    #[error("no film package with {0} photos")]
    InvalidPackage(u32),

    /// Demo upgrade requested for a limit the catalog does not price
    #[error("no defined price for a {0}-photo album")]
    UndefinedPrice(u32),

    /// Name trims to nothing
    #[error("album name must not be empty")]
    EmptyName,

    /// Delivery address incomplete
    #[error("missing address fields: {}", join_fields(.missing))]
    ValidationFailed { missing: Vec<AddressField> },

    /// No photo at that position
    #[error("photo index {index} out of range (album has {len} photos)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Demo upgrade on an album that is already real film
    #[error("album is already upgraded to real film")]
    AlreadyUpgraded,

    /// Capacity can only be bought for real film
    #[error("demo albums must be upgraded before adding film")]
    DemoRestricted,

    /// Status change outside the transition table
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition { from: AlbumStatus, to: AlbumStatus },
}

impl LifecycleError {
    /// Rejected from the request alone, before any album state was consulted
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyName | Self::ValidationFailed { .. } | Self::InvalidPackage(_)
        )
    }
}

fn join_fields(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_lists_fields() {
        let err = LifecycleError::ValidationFailed {
            missing: vec![AddressField::City, AddressField::ZipCode],
        };
        assert_eq!(err.to_string(), "missing address fields: city, zip code");
        assert!(err.is_validation());
    }

    #[test]
    fn state_errors_are_not_validation() {
        let err = LifecycleError::InvalidState {
            status: AlbumStatus::Arrived,
            action: "delete photo",
        };
        assert_eq!(err.to_string(), "delete photo is not allowed while the album is Arrived");
        assert!(!err.is_validation());
    }
}
