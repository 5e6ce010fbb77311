//! RealPic Core - Album Lifecycle Controller
//!
//! Runs the album state machine against remote collaborators:
//! - Executes user actions on albums, writing photos, limits and flags
//! - Gates paid actions behind a redirect-based checkout
//! - Creates albums from purchases, demo requests and coupons
//! - Projects the user's albums into live per-status buckets
//!
//! # Core Concepts
//!
//! - [`AlbumController`]: The only writer of status-relevant album fields
//! - [`Collaborators`]: Document store, blob store, coupons, identity, covers, gateway
//! - [`PaymentLedger`]: Outstanding checkouts and the intent each one pays for
//! - [`Projection`]: Status buckets recomputed from every store snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use realpic_core::{AlbumController, ControllerConfig, Outcome, PaymentOutcome};
//!
//! # async fn example(controller: AlbumController, album_id: realpic_album::AlbumId) -> Result<(), realpic_core::AlbumError> {
//! if let Outcome::AwaitingPayment(checkout) = controller.toggle_plus_mode(&album_id, None).await? {
//!     // Show checkout.approval_url, then report each page the view lands on
//!     let outcome = controller
//!         .on_navigation(checkout.attempt, "http://localhost:3002/success.html?token=EC-1")
//!         .await?;
//!     assert!(matches!(outcome, PaymentOutcome::Applied(_)));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod collaborators;
pub mod config;
pub mod controller;
pub mod covers;
pub mod error;
pub mod memory;
pub mod payment;
pub mod projection;
mod purchase;

// Re-exports for convenience
pub use collaborators::{
    AlbumStore, Authenticator, BlobStore, Collaborators, CouponStore, CoverImageSource,
    SnapshotStream, UserProfile,
};
pub use config::ControllerConfig;
pub use controller::{AlbumController, Outcome, PaymentOutcome};
pub use covers::{CachedCovers, UnsplashCovers};
pub use error::{AlbumError, BlobError, CoverError, GatewayError, StoreError};
pub use memory::{
    FixedCovers, MemoryAlbumStore, MemoryBlobStore, MemoryCouponStore, StaticAuthenticator,
};
pub use payment::{
    ApprovalGateway, Checkout, HttpApprovalGateway, PaymentAttemptId, PaymentLedger,
    PaymentPurpose, PaymentSignal, PendingPayment, RedirectMatcher, Termination,
};
pub use projection::{AlbumBuckets, Projection, ProjectionHandle};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with RealPic Core
    pub use crate::{
        AlbumController, AlbumError, Collaborators, ControllerConfig, Outcome, PaymentOutcome,
        Projection,
    };
    pub use realpic_album::{Album, AlbumId, AlbumStatus, DeliveryAddress, Price};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use async_trait::async_trait;
    use realpic_album::{AlbumStatus, Price};
    use std::sync::Arc;

    struct EchoGateway;

    #[async_trait]
    impl ApprovalGateway for EchoGateway {
        async fn request_approval(&self, price: Price) -> Result<String, GatewayError> {
            Ok(format!("https://provider.example/approve?amount={price}"))
        }
    }

    fn controller(albums: Arc<MemoryAlbumStore>) -> AlbumController {
        let collaborators = Collaborators {
            albums,
            coupons: Arc::new(MemoryCouponStore::with_codes(["WELCOME"])),
            blobs: Arc::new(MemoryBlobStore::new()),
            auth: Arc::new(StaticAuthenticator::signed_in("u1", "Ana")),
            covers: Arc::new(FixedCovers::new("https://images.example/cover.jpg")),
            gateway: Arc::new(EchoGateway),
        };
        AlbumController::new(ControllerConfig::new(), collaborators)
    }

    #[tokio::test]
    async fn purchase_then_fill_album() {
        let store = Arc::new(MemoryAlbumStore::new());
        let controller = controller(Arc::clone(&store));

        let checkout = controller.purchase_album(18, "Summer").await.unwrap();
        assert_eq!(checkout.price, Price::from_dollars(9));
        assert_eq!(checkout.approval_url, "https://provider.example/approve?amount=9.00");
        assert_eq!(controller.pending_payments().len(), 1);

        let success = format!("{}?token=EC-9", controller.config().success_prefix);
        let PaymentOutcome::Applied(album) = controller
            .on_navigation(checkout.attempt, &success)
            .await
            .unwrap()
        else {
            panic!("expected the album to be created");
        };
        assert_eq!(album.photo_limit, 18);
        assert!(!album.demo_mode);
        assert_eq!(album.cover_image, "https://images.example/cover.jpg");
        assert!(controller.pending_payments().is_empty());

        for _ in 0..18 {
            controller.add_photo(&album.id, Some(vec![0xFF])).await.unwrap();
        }
        let stored = store.record(&album.id).unwrap();
        assert_eq!(stored.status, AlbumStatus::ReadyToPrint);
        assert!(stored.check_invariants().is_ok());
    }

    #[tokio::test]
    async fn coupon_redemption_consumes_code() {
        let store = Arc::new(MemoryAlbumStore::new());
        let controller = controller(store);

        let album = controller.redeem_coupon(" WELCOME ", "Gift").await.unwrap();
        assert_eq!(album.photo_limit, 6);
        assert!(!album.demo_mode);

        let err = controller.redeem_coupon("WELCOME", "Again").await.unwrap_err();
        assert!(matches!(err, AlbumError::InvalidCoupon(_)));
        assert!(matches!(
            controller.redeem_coupon("  ", "Gift").await.unwrap_err(),
            AlbumError::MissingCouponCode
        ));
    }
}
