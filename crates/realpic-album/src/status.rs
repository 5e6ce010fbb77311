//! Fulfillment status of an album

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Album fulfillment status
///
/// Stored under the display strings the mobile client has always written
/// (`"Ready to Print"`, `"On the Way"`), so existing records decode unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlbumStatus {
    /// Accepting photos
    #[serde(rename = "Active")]
    Active,
    /// Every slot filled, awaiting a delivery address
    #[serde(rename = "Ready to Print")]
    ReadyToPrint,
    /// Paid for printing and shipped
    #[serde(rename = "On the Way")]
    OnTheWay,
    /// Delivered
    #[serde(rename = "Arrived")]
    Arrived,
}

impl AlbumStatus {
    /// All statuses in fulfillment order
    pub const ALL: [AlbumStatus; 4] = [
        AlbumStatus::Active,
        AlbumStatus::ReadyToPrint,
        AlbumStatus::OnTheWay,
        AlbumStatus::Arrived,
    ];

    /// Stored display string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumStatus::Active => "Active",
            AlbumStatus::ReadyToPrint => "Ready to Print",
            AlbumStatus::OnTheWay => "On the Way",
            AlbumStatus::Arrived => "Arrived",
        }
    }

    /// Locked for fulfillment: photo count no longer drives the status
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, AlbumStatus::OnTheWay | AlbumStatus::Arrived)
    }

    /// Photos and paid features can still change
    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !self.is_locked()
    }
}

impl Display for AlbumStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown album status: {0}")]
pub struct StatusParseError(pub String);

impl FromStr for AlbumStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlbumStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_display_string() {
        for status in AlbumStatus::ALL {
            assert_eq!(status.as_str().parse::<AlbumStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<AlbumStatus>().is_err());
    }

    #[test]
    fn status_serializes_to_stored_string() {
        let json = serde_json::to_string(&AlbumStatus::ReadyToPrint).unwrap();
        assert_eq!(json, "\"Ready to Print\"");
    }

    #[test]
    fn only_fulfillment_statuses_are_locked() {
        assert!(!AlbumStatus::Active.is_locked());
        assert!(!AlbumStatus::ReadyToPrint.is_locked());
        assert!(AlbumStatus::OnTheWay.is_locked());
        assert!(AlbumStatus::Arrived.is_locked());
    }
}
