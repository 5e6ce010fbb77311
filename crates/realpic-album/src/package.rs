//! Film package catalog

use crate::price::Price;
use serde::{Deserialize, Serialize};

/// A purchasable photo-capacity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilmPackage {
    /// Photo slots the package adds (or starts an album with)
    pub photos: u32,
    /// Charge for the package
    pub price: Price,
}

/// The fixed catalog
pub const FILM_PACKAGES: [FilmPackage; 3] = [
    FilmPackage {
        photos: 18,
        price: Price::from_dollars(9),
    },
    FilmPackage {
        photos: 36,
        price: Price::from_dollars(18),
    },
    FilmPackage {
        photos: 72,
        price: Price::from_dollars(27),
    },
];

impl FilmPackage {
    /// Catalog entry with exactly `photos` slots
    #[inline]
    #[must_use]
    pub fn for_photos(photos: u32) -> Option<Self> {
        FILM_PACKAGES.into_iter().find(|p| p.photos == photos)
    }

    /// Price of a catalog entry matching an album's current photo limit
    ///
    /// Used to price the demo upgrade; limits outside the catalog have no price.
    #[inline]
    #[must_use]
    pub fn price_for_limit(photo_limit: u32) -> Option<Price> {
        Self::for_photos(photo_limit).map(|p| p.price)
    }

    /// Short label shown in the purchase list
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} photos", self.photos)
    }
}
