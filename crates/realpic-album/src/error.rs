//! Record invariant violations

use crate::status::AlbumStatus;

/// A stored album breaks one of its invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlbumInvariantError {
    /// Capacity must be positive
    #[error("photo limit must be positive")]
    ZeroLimit,

    /// More photos than slots
    #[error("{photos} photos exceed the limit of {limit}")]
    OverCapacity { photos: u32, limit: u32 },

    /// Pro implies plus
    #[error("pro mode is on while plus mode is off")]
    ProWithoutPlus,

    /// Status disagrees with the photo count
    #[error("status {status} does not match {photos}/{limit} photos")]
    StatusMismatch {
        status: AlbumStatus,
        photos: u32,
        limit: u32,
    },

    /// Shipped albums carry an address
    #[error("album is on the way without a delivery address")]
    ShippedWithoutAddress,
}
