//! Status transition table and photo-count recomputation

use crate::error::LifecycleError;
use realpic_album::AlbumStatus;

/// Statuses reachable from `from` in one step
///
/// `OnTheWay -> Arrived` is driven by the fulfillment operator; nothing
/// leaves `Arrived`.
#[must_use]
pub fn allowed_transitions(from: AlbumStatus) -> &'static [AlbumStatus] {
    match from {
        AlbumStatus::Active => &[AlbumStatus::ReadyToPrint],
        AlbumStatus::ReadyToPrint => &[AlbumStatus::Active, AlbumStatus::OnTheWay],
        AlbumStatus::OnTheWay => &[AlbumStatus::Arrived],
        AlbumStatus::Arrived => &[],
    }
}

/// Validates a status change.
///
/// # Errors
/// `IllegalTransition` when `to` is not reachable from `from`.
pub fn validate_transition(from: AlbumStatus, to: AlbumStatus) -> Result<(), LifecycleError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition { from, to })
    }
}

/// Status implied by the photo count
///
/// Full albums are `ReadyToPrint`, others `Active`. Fulfillment-locked
/// statuses are returned unchanged.
#[must_use]
pub fn recompute_status(current: AlbumStatus, photos: u32, limit: u32) -> AlbumStatus {
    if current.is_locked() {
        current
    } else if photos >= limit {
        AlbumStatus::ReadyToPrint
    } else {
        AlbumStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrived_is_terminal() {
        assert!(allowed_transitions(AlbumStatus::Arrived).is_empty());
        for to in AlbumStatus::ALL {
            assert!(validate_transition(AlbumStatus::Arrived, to).is_err());
        }
    }

    #[test]
    fn ready_to_print_can_fall_back_or_ship() {
        assert!(validate_transition(AlbumStatus::ReadyToPrint, AlbumStatus::Active).is_ok());
        assert!(validate_transition(AlbumStatus::ReadyToPrint, AlbumStatus::OnTheWay).is_ok());
        assert!(validate_transition(AlbumStatus::Active, AlbumStatus::OnTheWay).is_err());
    }

    #[test]
    fn table_lists_each_step() {
        assert_eq!(allowed_transitions(AlbumStatus::Active), &[AlbumStatus::ReadyToPrint]);
        assert_eq!(allowed_transitions(AlbumStatus::OnTheWay), &[AlbumStatus::Arrived]);
    }

    #[test]
    fn recompute_follows_photo_count() {
        assert_eq!(recompute_status(AlbumStatus::Active, 18, 18), AlbumStatus::ReadyToPrint);
        assert_eq!(recompute_status(AlbumStatus::ReadyToPrint, 17, 18), AlbumStatus::Active);
        assert_eq!(recompute_status(AlbumStatus::ReadyToPrint, 18, 54), AlbumStatus::Active);
        assert_eq!(recompute_status(AlbumStatus::OnTheWay, 3, 18), AlbumStatus::OnTheWay);
    }
}
