//! RealPic Album Model
//!
//! The persisted record behind one photo-album order.
//!
//! # Core Concepts
//!
//! - [`Album`]: The record itself, owned by exactly one user
//! - [`AlbumStatus`]: Closed fulfillment status (`Active` → `ReadyToPrint` → `OnTheWay` → `Arrived`)
//! - [`FilmPackage`]: The purchasable capacity catalog (18/36/72 photos)
//! - [`Price`]: Integer-cent amounts charged through the payment gateway
//! - [`AlbumPatch`]: Whole-field merge update applied by the document store
//!
//! # Example
//!
//! ```rust,ignore
//! use realpic_album::{AlbumPatch, AlbumStatus, FilmPackage};
//!
//! let package = FilmPackage::for_photos(36).unwrap();
//! assert_eq!(package.price.to_string(), "18.00");
//!
//! let patch = AlbumPatch::new().with_status(AlbumStatus::ReadyToPrint);
//! album.apply(&patch);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod address;
mod album;
mod error;
mod flags;
mod ids;
mod package;
mod patch;
mod price;
mod status;

// Re-exports
pub use address::{AddressField, DeliveryAddress};
pub use album::{Album, NewAlbum, DEFAULT_DELIVERY_MODE};
pub use error::AlbumInvariantError;
pub use ids::{AlbumId, OrderNumber, UserId};
pub use package::{FilmPackage, FILM_PACKAGES};
pub use patch::{AlbumPatch, PhotosUpdate};
pub use price::{Price, PriceParseError};
pub use status::{AlbumStatus, StatusParseError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn record_survives_store_encoding() {
        let mut album = NewAlbum::new(
            UserId::new("user-1"),
            "Lisbon",
            FilmPackage::for_photos(18).unwrap().photos,
        )
        .with_cover_image("https://covers.example/lisbon.jpg")
        .into_album(AlbumId::new("album-1"), Utc::now());

        album.apply(&AlbumPatch::new().append_photo("https://blobs.example/1.jpg"));

        let encoded = serde_json::to_value(&album).unwrap();
        assert_eq!(encoded["status"], "Active");
        assert_eq!(encoded["userId"], "user-1");
        assert_eq!(encoded["demoMode"], "no");

        let decoded: Album = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, album);
        assert!(decoded.check_invariants().is_ok());
    }
}
