//! Partial updates merged into a stored album

use crate::address::DeliveryAddress;
use crate::status::AlbumStatus;
use serde::{Deserialize, Serialize};

/// Array update on the `photos` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotosUpdate {
    /// Add the URL unless already present
    Append(String),
    /// Drop every occurrence of the URL
    Remove(String),
}

/// Whole-field merge update
///
/// `None` leaves the stored field untouched. Immutable fields (`id`,
/// `owner_id`, `order_number`, `created_at`) have no slot here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumPatch {
    pub name: Option<String>,
    pub cover_image: Option<String>,
    pub status: Option<AlbumStatus>,
    pub photos: Option<PhotosUpdate>,
    pub photo_limit: Option<u32>,
    pub demo_mode: Option<bool>,
    pub pro_mode: Option<bool>,
    pub plus_mode: Option<bool>,
    pub address: Option<DeliveryAddress>,
}

impl AlbumPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing to write
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: AlbumStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[inline]
    #[must_use]
    pub fn append_photo(mut self, url: impl Into<String>) -> Self {
        self.photos = Some(PhotosUpdate::Append(url.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn remove_photo(mut self, url: impl Into<String>) -> Self {
        self.photos = Some(PhotosUpdate::Remove(url.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_photo_limit(mut self, limit: u32) -> Self {
        self.photo_limit = Some(limit);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_demo_mode(mut self, demo: bool) -> Self {
        self.demo_mode = Some(demo);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_pro_mode(mut self, pro: bool) -> Self {
        self.pro_mode = Some(pro);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_plus_mode(mut self, plus: bool) -> Self {
        self.plus_mode = Some(plus);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_address(mut self, address: DeliveryAddress) -> Self {
        self.address = Some(address);
        self
    }
}
