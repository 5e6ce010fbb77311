//! Testing utilities for RealPic workspace
//!
//! Shared fixtures: album builders, a scripted approval gateway and a
//! controller wired to in-memory collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use realpic_album::{Album, AlbumId, AlbumStatus, DeliveryAddress, NewAlbum, Price, UserId};
use realpic_core::{
    AlbumController, AlbumError, ApprovalGateway, Checkout, Collaborators, ControllerConfig,
    FixedCovers, GatewayError, MemoryAlbumStore, MemoryBlobStore, MemoryCouponStore,
    PaymentOutcome, StaticAuthenticator,
};
use std::sync::Arc;

/// Owner of harness albums
pub const TEST_USER: &str = "user-1";

/// Cover returned by the harness image search
pub const TEST_COVER: &str = "https://images.example/cover.jpg";

/// Album record with sensible defaults: 18 slots, no photos, owned by [`TEST_USER`]
#[derive(Debug, Clone)]
pub struct AlbumBuilder {
    album: Album,
}

impl AlbumBuilder {
    pub fn new(id: &str) -> Self {
        let album = NewAlbum::new(UserId::new(TEST_USER), "Weekend", 18)
            .with_cover_image(TEST_COVER)
            .into_album(AlbumId::new(id), Utc::now());
        Self { album }
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.album.owner_id = UserId::new(owner);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.album.name = name.to_string();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.album.photo_limit = limit;
        self
    }

    /// `count` photos, with the status they imply
    pub fn photos(mut self, count: usize) -> Self {
        self.album.photos = (0..count)
            .map(|i| format!("https://blobs.example/{}/{i}", self.album.id))
            .collect();
        self.album.status = if self.album.is_full() {
            AlbumStatus::ReadyToPrint
        } else {
            AlbumStatus::Active
        };
        self
    }

    /// Fill every slot
    pub fn full(self) -> Self {
        let limit = self.album.photo_limit as usize;
        self.photos(limit)
    }

    pub fn status(mut self, status: AlbumStatus) -> Self {
        self.album.status = status;
        self
    }

    /// Shipped to [`sample_address`]
    pub fn shipped(mut self) -> Self {
        self.album.status = AlbumStatus::OnTheWay;
        self.album.address = Some(sample_address());
        self
    }

    pub fn demo(mut self) -> Self {
        self.album.demo_mode = true;
        self
    }

    pub fn plus(mut self) -> Self {
        self.album.plus_mode = true;
        self
    }

    /// Pro mode, which implies plus
    pub fn pro(mut self) -> Self {
        self.album.pro_mode = true;
        self.album.plus_mode = true;
        self
    }

    pub fn build(self) -> Album {
        self.album
    }
}

/// A complete delivery address
pub fn sample_address() -> DeliveryAddress {
    DeliveryAddress {
        recipient_name: "Ana Lima".to_string(),
        phone_number: "+1 555 0100".to_string(),
        country: "USA".to_string(),
        city: "Portland".to_string(),
        street: "12 Alder St".to_string(),
        zip_code: "97205".to_string(),
    }
}

/// Approval gateway that records every price and answers from a script
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    charges: Mutex<Vec<Price>>,
    failing: Mutex<bool>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with an error while set
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Prices an approval link was issued for, in order
    pub fn charges(&self) -> Vec<Price> {
        self.charges.lock().clone()
    }
}

#[async_trait]
impl ApprovalGateway for ScriptedGateway {
    async fn request_approval(&self, price: Price) -> Result<String, GatewayError> {
        if *self.failing.lock() {
            return Err(GatewayError::Rejected {
                status: 500,
                message: "Failed to create PayPal order".to_string(),
            });
        }
        let mut charges = self.charges.lock();
        charges.push(price);
        Ok(format!(
            "https://www.sandbox.paypal.com/checkoutnow?token=EC-{}",
            charges.len()
        ))
    }
}

/// Controller over in-memory collaborators, signed in as [`TEST_USER`]
pub struct Harness {
    pub controller: AlbumController,
    pub albums: Arc<MemoryAlbumStore>,
    pub coupons: Arc<MemoryCouponStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub auth: Arc<StaticAuthenticator>,
    pub gateway: Arc<ScriptedGateway>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_coupons(std::iter::empty::<&str>())
    }

    pub fn with_coupons<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let albums = Arc::new(MemoryAlbumStore::new());
        let coupons = Arc::new(MemoryCouponStore::with_codes(codes));
        let blobs = Arc::new(MemoryBlobStore::new());
        let auth = Arc::new(StaticAuthenticator::signed_in(TEST_USER, "Test User"));
        let gateway = Arc::new(ScriptedGateway::new());

        let collaborators = Collaborators {
            albums: albums.clone(),
            coupons: coupons.clone(),
            blobs: blobs.clone(),
            auth: auth.clone(),
            covers: Arc::new(FixedCovers::new(TEST_COVER)),
            gateway: gateway.clone(),
        };

        Self {
            controller: AlbumController::new(ControllerConfig::new(), collaborators),
            albums,
            coupons,
            blobs,
            auth,
            gateway,
        }
    }

    /// Store `album` and return its id
    pub fn seed(&self, album: Album) -> AlbumId {
        let id = album.id.clone();
        self.albums.insert(album);
        id
    }

    /// Stored record; panics if it is gone
    pub fn album(&self, id: &AlbumId) -> Album {
        self.albums.record(id).expect("album should exist")
    }

    pub fn success_url(&self) -> String {
        format!("{}?token=EC-1&PayerID=TESTPAYER", self.controller.config().success_prefix)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}?token=EC-1", self.controller.config().cancel_prefix)
    }

    /// Land the checkout on the success page
    pub async fn approve(&self, checkout: &Checkout) -> Result<PaymentOutcome, AlbumError> {
        self.controller
            .on_navigation(checkout.attempt, &self.success_url())
            .await
    }

    /// Land the checkout on the cancel page
    pub async fn cancel(&self, checkout: &Checkout) -> Result<PaymentOutcome, AlbumError> {
        self.controller
            .on_navigation(checkout.attempt, &self.cancel_url())
            .await
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
