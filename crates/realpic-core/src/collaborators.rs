//! External collaborators consumed by the controller
//!
//! Each is a narrow async trait so the remote services (document store,
//! object storage, identity provider, image search) can be swapped for the
//! in-memory versions in [`crate::memory`].

use crate::error::{BlobError, CoverError, StoreError};
use async_trait::async_trait;
use futures::stream::BoxStream;
use realpic_album::{Album, AlbumId, AlbumPatch, NewAlbum, UserId};
use std::sync::Arc;

/// Stream of full snapshots of one user's albums
pub type SnapshotStream = BoxStream<'static, Vec<Album>>;

/// Album document collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// Insert a new record, returning its assigned id
    async fn create(&self, draft: NewAlbum) -> Result<AlbumId, StoreError>;

    /// Read one record
    async fn get(&self, id: &AlbumId) -> Result<Album, StoreError>;

    /// Merge `patch` into the stored record
    async fn update(&self, id: &AlbumId, patch: AlbumPatch) -> Result<(), StoreError>;

    /// Remove a record
    async fn delete(&self, id: &AlbumId) -> Result<(), StoreError>;

    /// Current and future snapshots of the albums owned by `owner`
    ///
    /// Dropping the stream ends the subscription.
    async fn subscribe(&self, owner: &UserId) -> Result<SnapshotStream, StoreError>;
}

/// Single-use coupon codes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Code is currently redeemable
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Consume the code
    async fn delete(&self, code: &str) -> Result<(), StoreError>;
}

/// Binary object storage for photo uploads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<(), BlobError>;

    /// Public URL of the object at `path`
    async fn download_url(&self, path: &str) -> Result<String, BlobError>;
}

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
}

/// Identity provider
#[cfg_attr(test, mockall::automock)]
pub trait Authenticator: Send + Sync {
    /// The signed-in user, if any
    fn current_user(&self) -> Option<UserProfile>;
}

/// Image search used to pick a cover thumbnail
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoverImageSource: Send + Sync {
    /// URL of the first image matching `query`, if any
    async fn search(&self, query: &str) -> Result<Option<String>, CoverError>;
}

/// Everything the controller talks to
#[derive(Clone)]
pub struct Collaborators {
    pub albums: Arc<dyn AlbumStore>,
    pub coupons: Arc<dyn CouponStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: Arc<dyn Authenticator>,
    pub covers: Arc<dyn CoverImageSource>,
    pub gateway: Arc<dyn crate::payment::ApprovalGateway>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
