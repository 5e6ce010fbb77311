//! The album record

use crate::address::DeliveryAddress;
use crate::error::AlbumInvariantError;
use crate::flags::{on_off, yes_no};
use crate::ids::{AlbumId, OrderNumber, UserId};
use crate::patch::{AlbumPatch, PhotosUpdate};
use crate::status::AlbumStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery text shown for shipped albums without an operator-set mode
pub const DEFAULT_DELIVERY_MODE: &str = "on the way";

/// One photo-album order
///
/// Field names follow the document store's schema (`userId`, `ordernum`,
/// `promode`, `plusmode`, `deliverymode`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Store-assigned identifier, immutable
    pub id: AlbumId,
    /// Owning user, immutable
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    /// Display name
    pub name: String,
    /// Representative thumbnail URL
    pub cover_image: String,
    /// Fulfillment status
    pub status: AlbumStatus,
    /// Photo URLs in capture order
    #[serde(default)]
    pub photos: Vec<String>,
    /// Photo capacity, never decreases
    pub photo_limit: u32,
    /// Created free of charge in restricted mode
    #[serde(with = "yes_no", default)]
    pub demo_mode: bool,
    /// Deletion feature purchased
    #[serde(rename = "promode", with = "on_off", default)]
    pub pro_mode: bool,
    /// Library-upload feature purchased
    #[serde(rename = "plusmode", with = "on_off", default)]
    pub plus_mode: bool,
    /// Set once when the album ships
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<DeliveryAddress>,
    /// Operator-maintained delivery progress text
    #[serde(rename = "deliverymode", default, skip_serializing_if = "Option::is_none")]
    pub delivery_mode: Option<String>,
    /// External order reference, immutable
    #[serde(rename = "ordernum")]
    pub order_number: OrderNumber,
    /// Creation time, immutable
    pub created_at: DateTime<Utc>,
}

impl Album {
    /// Number of photos taken
    #[inline]
    #[must_use]
    pub fn photo_count(&self) -> u32 {
        u32::try_from(self.photos.len()).unwrap_or(u32::MAX)
    }

    /// Every slot is filled
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.photo_count() >= self.photo_limit
    }

    /// Free slots left
    #[inline]
    #[must_use]
    pub fn remaining_slots(&self) -> u32 {
        self.photo_limit.saturating_sub(self.photo_count())
    }

    /// Delivery text for shipped albums
    #[must_use]
    pub fn delivery_mode_or_default(&self) -> &str {
        self.delivery_mode.as_deref().unwrap_or(DEFAULT_DELIVERY_MODE)
    }

    /// Merge a partial update into this record, the way the document store does
    pub fn apply(&mut self, patch: &AlbumPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(cover) = &patch.cover_image {
            self.cover_image.clone_from(cover);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        match &patch.photos {
            Some(PhotosUpdate::Append(url)) => {
                if !self.photos.contains(url) {
                    self.photos.push(url.clone());
                }
            }
            Some(PhotosUpdate::Remove(url)) => self.photos.retain(|p| p != url),
            None => {}
        }
        if let Some(limit) = patch.photo_limit {
            self.photo_limit = limit;
        }
        if let Some(demo) = patch.demo_mode {
            self.demo_mode = demo;
        }
        if let Some(pro) = patch.pro_mode {
            self.pro_mode = pro;
        }
        if let Some(plus) = patch.plus_mode {
            self.plus_mode = plus;
        }
        if let Some(address) = &patch.address {
            self.address = Some(address.clone());
        }
    }

    /// Check the record-level invariants
    ///
    /// # Errors
    /// The first violated invariant.
    pub fn check_invariants(&self) -> Result<(), AlbumInvariantError> {
        if self.photo_limit == 0 {
            return Err(AlbumInvariantError::ZeroLimit);
        }
        if self.photo_count() > self.photo_limit {
            return Err(AlbumInvariantError::OverCapacity {
                photos: self.photo_count(),
                limit: self.photo_limit,
            });
        }
        if self.pro_mode && !self.plus_mode {
            return Err(AlbumInvariantError::ProWithoutPlus);
        }
        if !self.status.is_locked() {
            let expected = if self.is_full() {
                AlbumStatus::ReadyToPrint
            } else {
                AlbumStatus::Active
            };
            if self.status != expected {
                return Err(AlbumInvariantError::StatusMismatch {
                    status: self.status,
                    photos: self.photo_count(),
                    limit: self.photo_limit,
                });
            }
        }
        if self.status == AlbumStatus::OnTheWay && self.address.is_none() {
            return Err(AlbumInvariantError::ShippedWithoutAddress);
        }
        Ok(())
    }
}

/// Fields for a record about to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlbum {
    pub owner_id: UserId,
    pub name: String,
    pub cover_image: String,
    pub photo_limit: u32,
    pub demo_mode: bool,
}

impl NewAlbum {
    /// Draft with flags off and no cover
    #[inline]
    #[must_use]
    pub fn new(owner_id: UserId, name: impl Into<String>, photo_limit: u32) -> Self {
        Self {
            owner_id,
            name: name.into(),
            cover_image: String::new(),
            photo_limit,
            demo_mode: false,
        }
    }

    /// With cover thumbnail
    #[inline]
    #[must_use]
    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = cover_image.into();
        self
    }

    /// Mark as a free demo album
    #[inline]
    #[must_use]
    pub fn demo(mut self) -> Self {
        self.demo_mode = true;
        self
    }

    /// Materialize the record once the store has assigned an id
    #[must_use]
    pub fn into_album(self, id: AlbumId, created_at: DateTime<Utc>) -> Album {
        Album {
            id,
            owner_id: self.owner_id,
            name: self.name,
            cover_image: self.cover_image,
            status: AlbumStatus::Active,
            photos: Vec::new(),
            photo_limit: self.photo_limit,
            demo_mode: self.demo_mode,
            pro_mode: false,
            plus_mode: false,
            address: None,
            delivery_mode: None,
            order_number: OrderNumber::at(created_at),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn album(limit: u32) -> Album {
        NewAlbum::new(UserId::new("u"), "Trip", limit).into_album(AlbumId::new("a"), Utc::now())
    }

    #[test]
    fn new_album_starts_active_and_empty() {
        let album = album(18);
        assert_eq!(album.status, AlbumStatus::Active);
        assert!(album.photos.is_empty());
        assert!(!album.demo_mode && !album.pro_mode && !album.plus_mode);
        assert!(album.order_number.as_str().starts_with("ORD"));
        assert!(album.check_invariants().is_ok());
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut album = album(2);
        let before = album.clone();
        album.apply(&AlbumPatch::new());
        assert_eq!(album, before);

        album.apply(&AlbumPatch::new().append_photo("p1").with_name("Renamed"));
        assert_eq!(album.photos, vec!["p1".to_string()]);
        assert_eq!(album.name, "Renamed");
        assert_eq!(album.photo_limit, 2);
    }

    #[test]
    fn append_is_set_union() {
        let mut album = album(3);
        album.apply(&AlbumPatch::new().append_photo("p1"));
        album.apply(&AlbumPatch::new().append_photo("p1"));
        assert_eq!(album.photo_count(), 1);

        album.apply(&AlbumPatch::new().remove_photo("p1"));
        assert!(album.photos.is_empty());
    }

    #[test]
    fn invariants_catch_status_mismatch() {
        let mut album = album(1);
        album.photos.push("p1".into());
        assert!(matches!(
            album.check_invariants(),
            Err(AlbumInvariantError::StatusMismatch { .. })
        ));

        album.status = AlbumStatus::ReadyToPrint;
        assert!(album.check_invariants().is_ok());
    }

    #[test]
    fn invariants_catch_pro_without_plus() {
        let mut album = album(18);
        album.pro_mode = true;
        assert_eq!(album.check_invariants(), Err(AlbumInvariantError::ProWithoutPlus));
    }

    #[test]
    fn decodes_legacy_record() {
        let json = serde_json::json!({
            "id": "a1",
            "userId": "u1",
            "name": "Beach",
            "coverImage": "https://via.placeholder.com/150",
            "status": "On the Way",
            "photos": ["p1", "p2"],
            "photoLimit": 2,
            "demoMode": "no",
            "promode": "on",
            "plusmode": "on",
            "address": {
                "recipientName": "Ana",
                "phoneNumber": "1",
                "country": "PT",
                "city": "Lisbon",
                "street": "Rua 1",
                "zipCode": "1100"
            },
            "deliverymode": "in transit",
            "ordernum": "ORD1",
            "createdAt": "2024-05-01T10:00:00Z"
        });
        let album: Album = serde_json::from_value(json).unwrap();
        assert_eq!(album.status, AlbumStatus::OnTheWay);
        assert!(album.pro_mode && album.plus_mode);
        assert_eq!(album.delivery_mode_or_default(), "in transit");
        assert!(album.check_invariants().is_ok());
    }
}
