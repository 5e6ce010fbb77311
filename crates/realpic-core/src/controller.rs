//! Album Lifecycle Controller
//!
//! Carries out the decisions of [`realpic_lifecycle::decide`] against the
//! collaborators:
//! - Free actions (upload, removal, rename) are written immediately
//! - Paid actions open a checkout and wait for the redirect signal
//! - An approved checkout settles its intent; a cancelled one writes nothing
//!
//! Photo changes write the photo list first and then re-read the record to
//! write the status its photo count implies.

use crate::collaborators::{Collaborators, UserProfile};
use crate::config::ControllerConfig;
use crate::error::AlbumError;
use crate::payment::{
    Checkout, Closing, PaymentAttemptId, PaymentLedger, PaymentPurpose, PaymentSignal,
    PendingPayment, RedirectMatcher, Termination,
};
use crate::projection::Projection;
use realpic_album::{Album, AlbumId, AlbumPatch, DeliveryAddress, Price};
use realpic_lifecycle::{
    decide, recompute_status, settle, validate_transition, Action, Decision, GalleryAccess,
    PaymentIntent,
};
use ulid::Ulid;

/// Result of an album operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Record written; the album as it now stands
    Updated(Album),
    /// A payment must be approved first
    AwaitingPayment(Checkout),
    /// Gallery view of the album
    Gallery {
        access: GalleryAccess,
        photos: Vec<String>,
    },
    /// Upload allowed but the user picked nothing
    NoPhotoSelected,
}

/// Result of reporting checkout navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Not a callback page; keep waiting
    InProgress,
    /// Approved and written; the affected album
    Applied(Album),
    /// Cancelled; nothing written
    Cancelled,
    /// The attempt already ended
    AlreadySettled,
}

/// Sole writer of album status, limits and flags
#[derive(Debug)]
pub struct AlbumController {
    /// Configuration
    config: ControllerConfig,
    /// Remote services
    collaborators: Collaborators,
    /// Outstanding checkouts
    ledger: PaymentLedger,
    /// Callback URL matching
    redirects: RedirectMatcher,
}

impl AlbumController {
    /// Create controller
    #[must_use]
    pub fn new(config: ControllerConfig, collaborators: Collaborators) -> Self {
        Self {
            redirects: config.redirect_matcher(),
            config,
            collaborators,
            ledger: PaymentLedger::new(),
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Live status buckets for the signed-in user
    #[must_use]
    pub fn projection(&self) -> Projection {
        Projection::new(&self.collaborators)
    }

    /// Capture a photo into the next free slot
    ///
    /// `photo` is `None` when the user dismissed the camera.
    pub async fn add_photo(
        &self,
        album_id: &AlbumId,
        photo: Option<Vec<u8>>,
    ) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::AddPhoto, photo).await
    }

    /// Remove the photo at `index`
    pub async fn delete_photo(&self, album_id: &AlbumId, index: usize) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::DeletePhoto { index }, None).await
    }

    /// Buy the catalog package with `photos` slots
    pub async fn request_capacity_upgrade(
        &self,
        album_id: &AlbumId,
        photos: u32,
    ) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::RequestCapacityUpgrade { photos }, None)
            .await
    }

    /// Turn a demo album into real film
    pub async fn request_demo_upgrade(&self, album_id: &AlbumId) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::RequestDemoUpgrade, None).await
    }

    /// Buy plus mode, or upload `photo` from the library once it is on
    pub async fn toggle_plus_mode(
        &self,
        album_id: &AlbumId,
        photo: Option<Vec<u8>>,
    ) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::TogglePlusMode, photo).await
    }

    /// Buy pro mode, or open the gallery once it is on
    pub async fn request_pro_mode(&self, album_id: &AlbumId) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::RequestProMode, None).await
    }

    /// Pay for printing and ship to `address`
    pub async fn submit_delivery_address(
        &self,
        album_id: &AlbumId,
        address: DeliveryAddress,
    ) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::SubmitDeliveryAddress { address }, None)
            .await
    }

    /// Rename and pick a matching cover
    pub async fn rename_album(&self, album_id: &AlbumId, name: &str) -> Result<Outcome, AlbumError> {
        self.run(
            album_id,
            Action::RenameAlbum {
                name: name.to_string(),
            },
            None,
        )
        .await
    }

    /// Photos and what the gallery allows
    pub async fn open_gallery(&self, album_id: &AlbumId) -> Result<Outcome, AlbumError> {
        self.run(album_id, Action::OpenGallery, None).await
    }

    /// Report a page the checkout view navigated to
    ///
    /// The first callback match closes the attempt. Approval applies its
    /// intent; a failure at that point is [`AlbumError::PaidButNotApplied`].
    pub async fn on_navigation(
        &self,
        attempt: PaymentAttemptId,
        url: &str,
    ) -> Result<PaymentOutcome, AlbumError> {
        let Some(signal) = self.redirects.classify(url) else {
            return if self.ledger.get(attempt).is_some() {
                Ok(PaymentOutcome::InProgress)
            } else if self.ledger.termination(attempt).is_some() {
                Ok(PaymentOutcome::AlreadySettled)
            } else {
                Err(AlbumError::UnknownPayment(attempt))
            };
        };

        let termination = match signal {
            PaymentSignal::Approved => Termination::Approved,
            PaymentSignal::Cancelled => Termination::Cancelled,
        };
        let pending = match self.ledger.close(attempt, termination) {
            Closing::Closed(pending) => pending,
            Closing::AlreadyClosed(previous) => {
                tracing::debug!("Ignoring {:?} for payment {} (already {:?})", signal, attempt, previous);
                return Ok(PaymentOutcome::AlreadySettled);
            }
            Closing::Unknown => return Err(AlbumError::UnknownPayment(attempt)),
        };

        match signal {
            PaymentSignal::Cancelled => {
                tracing::info!("Payment {} cancelled", attempt);
                Ok(PaymentOutcome::Cancelled)
            }
            PaymentSignal::Approved => {
                tracing::info!("Payment {} of ${} approved", attempt, pending.price);
                match self.apply_payment(&pending).await {
                    Ok(album) => Ok(PaymentOutcome::Applied(album)),
                    Err(source) => {
                        tracing::error!(
                            "Payment {} of ${} completed, but update failed: {}",
                            attempt,
                            pending.price,
                            source
                        );
                        Err(AlbumError::PaidButNotApplied {
                            attempt,
                            price: pending.price,
                            source: Box::new(source),
                        })
                    }
                }
            }
        }
    }

    /// The user closed the checkout without reaching a callback
    ///
    /// Discards the attempt; no signal is raised and nothing is written.
    pub fn abandon_payment(&self, attempt: PaymentAttemptId) -> Result<(), AlbumError> {
        match self.ledger.close(attempt, Termination::Abandoned) {
            Closing::Closed(pending) => {
                tracing::info!("Payment {} of ${} abandoned", attempt, pending.price);
                Ok(())
            }
            Closing::AlreadyClosed(_) => Ok(()),
            Closing::Unknown => Err(AlbumError::UnknownPayment(attempt)),
        }
    }

    /// Checkouts that have not reached a callback, oldest first
    #[must_use]
    pub fn pending_payments(&self) -> Vec<PendingPayment> {
        self.ledger.pending()
    }

    pub(crate) fn require_user(&self) -> Result<UserProfile, AlbumError> {
        self.collaborators
            .auth
            .current_user()
            .ok_or(AlbumError::AuthenticationRequired)
    }

    pub(crate) fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    async fn run(
        &self,
        album_id: &AlbumId,
        action: Action,
        photo: Option<Vec<u8>>,
    ) -> Result<Outcome, AlbumError> {
        tracing::debug!("{} requested for album {}", action.name(), album_id);

        action.precheck()?;
        let user = self.require_user()?;
        let album = self.collaborators.albums.get(album_id).await?;
        if album.owner_id != user.id {
            return Err(AlbumError::NotFound(album_id.clone()));
        }

        match decide(&album, &action, &self.config.fees)? {
            Decision::Upload => match photo {
                Some(bytes) => self.upload(&album, bytes).await.map(Outcome::Updated),
                None => Ok(Outcome::NoPhotoSelected),
            },
            Decision::RemovePhoto { url } => {
                self.collaborators
                    .albums
                    .update(&album.id, AlbumPatch::new().remove_photo(url))
                    .await?;
                tracing::info!("Photo removed from album {}", album.id);
                self.refresh_status(&album.id).await.map(Outcome::Updated)
            }
            Decision::Rename { name } => {
                let cover = self.cover_for(&name).await;
                let patch = AlbumPatch::new().with_name(name).with_cover_image(cover);
                self.collaborators.albums.update(&album.id, patch.clone()).await?;
                tracing::info!("Album {} renamed", album.id);
                let mut album = album;
                album.apply(&patch);
                Ok(Outcome::Updated(album))
            }
            Decision::OpenGallery(access) => Ok(Outcome::Gallery {
                access,
                photos: album.photos,
            }),
            Decision::Charge(charge) => {
                let purpose = PaymentPurpose::Album {
                    album_id: album.id,
                    intent: charge.intent,
                };
                self.begin_checkout(charge.price, purpose)
                    .await
                    .map(Outcome::AwaitingPayment)
            }
        }
    }

    /// Request an approval link and record the attempt
    pub(crate) async fn begin_checkout(
        &self,
        price: Price,
        purpose: PaymentPurpose,
    ) -> Result<Checkout, AlbumError> {
        let approval_url = self
            .collaborators
            .gateway
            .request_approval(price)
            .await
            .map_err(|e| {
                tracing::warn!("Approval link for ${} unavailable: {}", price, e);
                e
            })?;

        let pending = self.ledger.open(price, purpose, approval_url);
        tracing::info!("Payment {} of ${} awaiting approval", pending.attempt, price);

        Ok(Checkout {
            attempt: pending.attempt,
            price,
            approval_url: pending.approval_url,
        })
    }

    async fn apply_payment(&self, pending: &PendingPayment) -> Result<Album, AlbumError> {
        match &pending.purpose {
            PaymentPurpose::Album { album_id, intent } => self.settle_album(album_id, intent).await,
            PaymentPurpose::NewAlbum { draft } => self.create_album(draft.clone()).await,
        }
    }

    async fn settle_album(&self, album_id: &AlbumId, intent: &PaymentIntent) -> Result<Album, AlbumError> {
        let mut album = self.collaborators.albums.get(album_id).await?;
        let settlement = settle(&album, intent)?;
        self.collaborators
            .albums
            .update(album_id, settlement.patch.clone())
            .await?;
        tracing::info!("Applied {} to album {}", intent.name(), album_id);

        if settlement.recompute_status {
            self.refresh_status(album_id).await
        } else {
            album.apply(&settlement.patch);
            Ok(album)
        }
    }

    async fn upload(&self, album: &Album, bytes: Vec<u8>) -> Result<Album, AlbumError> {
        let path = format!("albums/{}/{}", album.id, Ulid::new());
        let blobs = &self.collaborators.blobs;

        blobs
            .put(&path, bytes)
            .await
            .map_err(|e| {
                tracing::warn!("Upload to {} failed: {}", path, e);
                e
            })?;
        let url = blobs.download_url(&path).await?;

        self.collaborators
            .albums
            .update(&album.id, AlbumPatch::new().append_photo(url))
            .await?;
        tracing::info!("Photo added to album {}", album.id);

        self.refresh_status(&album.id).await
    }

    /// Re-read the record and write the status its photo count implies
    async fn refresh_status(&self, album_id: &AlbumId) -> Result<Album, AlbumError> {
        let mut album = self.collaborators.albums.get(album_id).await?;
        let next = recompute_status(album.status, album.photo_count(), album.photo_limit);
        if next != album.status {
            validate_transition(album.status, next)?;
            tracing::info!("Album {} is now {}", album_id, next);
        }

        let patch = AlbumPatch::new().with_status(next);
        self.collaborators.albums.update(album_id, patch.clone()).await?;
        album.apply(&patch);
        Ok(album)
    }

    /// Cover for `query`, or the placeholder when the search comes up empty
    pub(crate) async fn cover_for(&self, query: &str) -> String {
        match self.collaborators.covers.search(query).await {
            Ok(Some(url)) => url,
            Ok(None) => self.config.placeholder_cover.clone(),
            Err(e) => {
                tracing::warn!("Cover lookup for {:?} failed: {}", query, e);
                self.config.placeholder_cover.clone()
            }
        }
    }
}
