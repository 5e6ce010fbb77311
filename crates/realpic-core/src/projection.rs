//! Real-time Projection
//!
//! Live per-status view of the signed-in user's albums. Each store snapshot
//! is re-partitioned in full; buckets keep the snapshot's order. Emissions
//! are eventually consistent with in-flight controller writes.

use crate::collaborators::{AlbumStore, Authenticator, Collaborators};
use crate::error::AlbumError;
use futures::stream::{BoxStream, StreamExt};
use realpic_album::{Album, AlbumStatus};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Albums grouped by status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumBuckets {
    pub active: Vec<Album>,
    pub ready_to_print: Vec<Album>,
    pub on_the_way: Vec<Album>,
    pub arrived: Vec<Album>,
}

impl AlbumBuckets {
    /// Split a snapshot by status
    #[must_use]
    pub fn partition(albums: impl IntoIterator<Item = Album>) -> Self {
        let mut buckets = Self::default();
        for album in albums {
            buckets.bucket_mut(album.status).push(album);
        }
        buckets
    }

    /// Albums with `status`
    #[inline]
    #[must_use]
    pub fn bucket(&self, status: AlbumStatus) -> &[Album] {
        match status {
            AlbumStatus::Active => &self.active,
            AlbumStatus::ReadyToPrint => &self.ready_to_print,
            AlbumStatus::OnTheWay => &self.on_the_way,
            AlbumStatus::Arrived => &self.arrived,
        }
    }

    fn bucket_mut(&mut self, status: AlbumStatus) -> &mut Vec<Album> {
        match status {
            AlbumStatus::Active => &mut self.active,
            AlbumStatus::ReadyToPrint => &mut self.ready_to_print,
            AlbumStatus::OnTheWay => &mut self.on_the_way,
            AlbumStatus::Arrived => &mut self.arrived,
        }
    }

    /// Total albums across buckets
    #[must_use]
    pub fn len(&self) -> usize {
        AlbumStatus::ALL.iter().map(|s| self.bucket(*s).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Subscribes to the signed-in user's albums
#[derive(Clone)]
pub struct Projection {
    albums: Arc<dyn AlbumStore>,
    auth: Arc<dyn Authenticator>,
}

impl Projection {
    #[must_use]
    pub fn new(collaborators: &Collaborators) -> Self {
        Self {
            albums: Arc::clone(&collaborators.albums),
            auth: Arc::clone(&collaborators.auth),
        }
    }

    /// Lazy sequence of bucket sets, one per store snapshot
    ///
    /// Dropping the stream unsubscribes.
    pub async fn subscribe(&self) -> Result<BoxStream<'static, AlbumBuckets>, AlbumError> {
        let user = self
            .auth
            .current_user()
            .ok_or(AlbumError::AuthenticationRequired)?;
        let snapshots = self.albums.subscribe(&user.id).await?;
        tracing::debug!("Projection subscribed for {}", user.id);
        Ok(snapshots.map(AlbumBuckets::partition).boxed())
    }

    /// Drive the subscription on a background task, keeping only the latest buckets
    pub async fn spawn(&self) -> Result<ProjectionHandle, AlbumError> {
        let mut stream = self.subscribe().await?;
        let (sender, receiver) = watch::channel(AlbumBuckets::default());

        let task = tokio::spawn(async move {
            while let Some(buckets) = stream.next().await {
                if sender.send(buckets).is_err() {
                    break;
                }
            }
        });

        Ok(ProjectionHandle { receiver, task })
    }
}

impl std::fmt::Debug for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection").finish_non_exhaustive()
    }
}

/// Background projection; dropping it stops the task and releases the subscription
#[derive(Debug)]
pub struct ProjectionHandle {
    receiver: watch::Receiver<AlbumBuckets>,
    task: JoinHandle<()>,
}

impl ProjectionHandle {
    /// Latest buckets
    #[must_use]
    pub fn current(&self) -> AlbumBuckets {
        self.receiver.borrow().clone()
    }

    /// Wait for the next update; `None` once the subscription has ended
    pub async fn changed(&mut self) -> Option<AlbumBuckets> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

impl Drop for ProjectionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use realpic_album::{AlbumId, NewAlbum, UserId};

    fn album(id: &str, status: AlbumStatus) -> Album {
        let mut album = NewAlbum::new(UserId::new("u"), id, 18).into_album(AlbumId::new(id), Utc::now());
        album.status = status;
        album
    }

    #[test]
    fn partition_keeps_snapshot_order() {
        let buckets = AlbumBuckets::partition(vec![
            album("a", AlbumStatus::Active),
            album("b", AlbumStatus::OnTheWay),
            album("c", AlbumStatus::Active),
            album("d", AlbumStatus::Arrived),
        ]);

        let active: Vec<_> = buckets.active.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(active, vec!["a", "c"]);
        assert!(buckets.bucket(AlbumStatus::ReadyToPrint).is_empty());
        assert_eq!(buckets.bucket(AlbumStatus::OnTheWay).len(), 1);
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn empty_snapshot() {
        assert!(AlbumBuckets::partition(Vec::new()).is_empty());
    }
}
