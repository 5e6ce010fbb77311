//! Album creation: paid film, free demo film and coupon redemption

use crate::controller::AlbumController;
use crate::error::AlbumError;
use crate::payment::{Checkout, PaymentPurpose};
use realpic_album::{Album, FilmPackage, NewAlbum};
use realpic_lifecycle::LifecycleError;

fn album_name(name: &str) -> Result<String, AlbumError> {
    let name = name.trim();
    if name.is_empty() {
        Err(LifecycleError::EmptyName.into())
    } else {
        Ok(name.to_string())
    }
}

fn package(photos: u32) -> Result<FilmPackage, AlbumError> {
    FilmPackage::for_photos(photos).ok_or_else(|| LifecycleError::InvalidPackage(photos).into())
}

impl AlbumController {
    /// Buy a film package; the album is created once the payment is approved
    pub async fn purchase_album(&self, photos: u32, name: &str) -> Result<Checkout, AlbumError> {
        let name = album_name(name)?;
        let package = package(photos)?;
        let user = self.require_user()?;
        tracing::debug!("Purchase of {} requested by {}", package.label(), user.id);

        let draft = NewAlbum::new(user.id, name, package.photos);
        self.begin_checkout(package.price, PaymentPurpose::NewAlbum { draft })
            .await
    }

    /// Create a free demo album of the package's size
    pub async fn create_demo_album(&self, photos: u32, name: &str) -> Result<Album, AlbumError> {
        let name = album_name(name)?;
        let package = package(photos)?;
        let user = self.require_user()?;

        self.create_album(NewAlbum::new(user.id, name, package.photos).demo())
            .await
    }

    /// Exchange a single-use coupon for a free album
    pub async fn redeem_coupon(&self, code: &str, name: &str) -> Result<Album, AlbumError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AlbumError::MissingCouponCode);
        }
        let name = album_name(name)?;
        let user = self.require_user()?;

        let coupons = &self.collaborators().coupons;
        if !coupons.exists(code).await? {
            tracing::warn!("Coupon {:?} rejected", code);
            return Err(AlbumError::InvalidCoupon(code.to_string()));
        }

        let limit = self.config().coupon_photo_limit;
        let album = self.create_album(NewAlbum::new(user.id, name, limit)).await?;
        coupons.delete(code).await?;
        tracing::info!("Coupon {:?} redeemed for album {}", code, album.id);
        Ok(album)
    }

    pub(crate) async fn create_album(&self, draft: NewAlbum) -> Result<Album, AlbumError> {
        let cover = self.cover_for(&draft.name).await;
        let albums = &self.collaborators().albums;

        let id = albums.create(draft.with_cover_image(cover)).await?;
        let album = albums.get(&id).await?;
        tracing::info!(
            "Album {} created ({} photos, order {})",
            album.id,
            album.photo_limit,
            album.order_number
        );
        Ok(album)
    }
}
