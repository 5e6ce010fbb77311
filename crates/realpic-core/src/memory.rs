//! In-memory collaborators
//!
//! Process-local versions of the remote services, for tests and offline use.
//! [`MemoryAlbumStore`] notifies subscribers on every write through a
//! version counter; a burst of writes may reach a slow subscriber as one
//! snapshot.

use crate::collaborators::{
    AlbumStore, Authenticator, BlobStore, CouponStore, CoverImageSource, SnapshotStream, UserProfile,
};
use crate::error::{BlobError, CoverError, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use parking_lot::RwLock;
use realpic_album::{Album, AlbumId, AlbumPatch, NewAlbum, UserId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use ulid::Ulid;

type Records = Arc<RwLock<IndexMap<AlbumId, Album>>>;

/// Album collection kept in insertion order
#[derive(Debug)]
pub struct MemoryAlbumStore {
    records: Records,
    version: watch::Sender<u64>,
    unavailable: AtomicBool,
}

impl Default for MemoryAlbumStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAlbumStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
            version: watch::channel(0).0,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Put a record in place as-is
    pub fn insert(&self, album: Album) {
        self.records.write().insert(album.id.clone(), album);
        self.bump();
    }

    /// Copy of a record
    #[must_use]
    pub fn record(&self, id: &AlbumId) -> Option<Album> {
        self.records.read().get(id).cloned()
    }

    /// Number of stored records, across all owners
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Reject writes (create, update, delete) while set
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    fn owned_by(records: &Records, owner: &UserId) -> Vec<Album> {
        records
            .read()
            .values()
            .filter(|a| &a.owner_id == owner)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AlbumStore for MemoryAlbumStore {
    async fn create(&self, draft: NewAlbum) -> Result<AlbumId, StoreError> {
        self.check_writable()?;
        let id = AlbumId::new(Ulid::new().to_string());
        let album = draft.into_album(id.clone(), Utc::now());
        self.records.write().insert(id.clone(), album);
        self.bump();
        Ok(id)
    }

    async fn get(&self, id: &AlbumId) -> Result<Album, StoreError> {
        self.record(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn update(&self, id: &AlbumId, patch: AlbumPatch) -> Result<(), StoreError> {
        self.check_writable()?;
        {
            let mut records = self.records.write();
            let album = records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            album.apply(&patch);
        }
        self.bump();
        Ok(())
    }

    async fn delete(&self, id: &AlbumId) -> Result<(), StoreError> {
        self.check_writable()?;
        self.records
            .write()
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.bump();
        Ok(())
    }

    async fn subscribe(&self, owner: &UserId) -> Result<SnapshotStream, StoreError> {
        let records = Arc::clone(&self.records);
        let owner = owner.clone();
        let mut changes = self.version.subscribe();
        changes.borrow_and_update();

        let snapshots = stream::unfold((changes, true), move |(mut changes, first)| {
            let records = Arc::clone(&records);
            let owner = owner.clone();
            async move {
                if !first {
                    changes.changed().await.ok()?;
                    changes.borrow_and_update();
                }
                let snapshot = Self::owned_by(&records, &owner);
                Some((snapshot, (changes, false)))
            }
        });
        Ok(snapshots.boxed())
    }
}

/// Redeemable coupon codes
#[derive(Debug, Default)]
pub struct MemoryCouponStore {
    codes: DashSet<String>,
}

impl MemoryCouponStore {
    #[must_use]
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }
}

#[async_trait]
impl CouponStore for MemoryCouponStore {
    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.codes.contains(code))
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.codes.remove(code);
        Ok(())
    }
}

/// Objects served from `memory://{path}`
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes
    #[must_use]
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.get(path).map(|b| b.clone())
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<(), BlobError> {
        self.objects.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, BlobError> {
        if self.objects.contains_key(path) {
            Ok(format!("memory://{path}"))
        } else {
            Err(BlobError::Missing(path.to_string()))
        }
    }
}

/// Authenticator whose user is set by hand
#[derive(Debug, Default)]
pub struct StaticAuthenticator {
    user: RwLock<Option<UserProfile>>,
}

impl StaticAuthenticator {
    /// Signed in as `id`
    #[must_use]
    pub fn signed_in(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user: RwLock::new(Some(UserProfile {
                id: UserId::new(id),
                display_name: display_name.into(),
            })),
        }
    }

    /// Nobody signed in
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl Authenticator for StaticAuthenticator {
    fn current_user(&self) -> Option<UserProfile> {
        self.user.read().clone()
    }
}

/// Cover source answering every query with the same result
#[derive(Debug, Clone, Default)]
pub struct FixedCovers {
    url: Option<String>,
}

impl FixedCovers {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// Never finds anything
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoverImageSource for FixedCovers {
    async fn search(&self, _query: &str) -> Result<Option<String>, CoverError> {
        Ok(self.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realpic_album::AlbumStatus;
    use std::time::Duration;

    #[tokio::test]
    async fn update_merges_and_missing_is_not_found() {
        let store = MemoryAlbumStore::new();
        let id = store
            .create(NewAlbum::new(UserId::new("u"), "Trip", 18))
            .await
            .unwrap();

        store
            .update(&id, AlbumPatch::new().append_photo("p0").with_name("Beach"))
            .await
            .unwrap();
        let album = store.get(&id).await.unwrap();
        assert_eq!(album.photos, vec!["p0".to_string()]);
        assert_eq!(album.name, "Beach");
        assert_eq!(album.status, AlbumStatus::Active);
        assert!(album.order_number.as_str().starts_with("ORD"));

        let missing = AlbumId::new("missing");
        assert_eq!(
            store.update(&missing, AlbumPatch::new()).await,
            Err(StoreError::NotFound(missing.clone()))
        );
    }

    #[tokio::test]
    async fn unavailable_store_rejects_writes() {
        let store = MemoryAlbumStore::new();
        store.set_unavailable(true);
        let err = store
            .create(NewAlbum::new(UserId::new("u"), "Trip", 18))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn subscription_emits_current_then_changes_for_owner() {
        let store = MemoryAlbumStore::new();
        let mine = UserId::new("me");
        store
            .create(NewAlbum::new(mine.clone(), "First", 18))
            .await
            .unwrap();

        let mut snapshots = store.subscribe(&mine).await.unwrap();
        assert_eq!(snapshots.next().await.unwrap().len(), 1);

        store
            .create(NewAlbum::new(UserId::new("other"), "Theirs", 18))
            .await
            .unwrap();
        store
            .create(NewAlbum::new(mine.clone(), "Second", 36))
            .await
            .unwrap();

        let next = tokio::time::timeout(Duration::from_secs(1), snapshots.next())
            .await
            .unwrap()
            .unwrap();
        let names: Vec<_> = next.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn blob_urls_require_stored_object() {
        let blobs = MemoryBlobStore::new();
        assert!(blobs.download_url("albums/a/1").await.is_err());
        blobs.put("albums/a/1", vec![7]).await.unwrap();
        assert_eq!(blobs.download_url("albums/a/1").await.unwrap(), "memory://albums/a/1");
    }

    #[tokio::test]
    async fn coupons_are_single_use() {
        let coupons = MemoryCouponStore::with_codes(["FREE6"]);
        assert!(coupons.exists("FREE6").await.unwrap());
        coupons.delete("FREE6").await.unwrap();
        assert!(!coupons.exists("FREE6").await.unwrap());
    }
}
