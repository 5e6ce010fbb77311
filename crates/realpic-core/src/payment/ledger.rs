//! Pending-payment ledger
//!
//! Every outstanding checkout is recorded with its price and the effect to
//! apply on approval, keyed by attempt. An interrupted session can list the
//! entries to detect attempts that never reached a callback.

use super::PaymentAttemptId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use realpic_album::{AlbumId, NewAlbum, Price};
use realpic_lifecycle::PaymentIntent;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What an approved payment pays for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPurpose {
    /// A paid mutation of an existing album
    Album {
        album_id: AlbumId,
        intent: PaymentIntent,
    },
    /// A new album from the purchase flow
    NewAlbum { draft: NewAlbum },
}

/// An outstanding payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub attempt: PaymentAttemptId,
    pub price: Price,
    pub purpose: PaymentPurpose,
    pub approval_url: String,
    pub started_at: DateTime<Utc>,
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    Approved,
    Cancelled,
    /// Checkout closed by the user without reaching a callback
    Abandoned,
}

/// Result of closing an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Closing {
    /// This call closed it
    Closed(PendingPayment),
    /// Closed earlier
    AlreadyClosed(Termination),
    /// Never opened here
    Unknown,
}

/// Closed attempts remembered for late callbacks
pub const DEFAULT_CLOSED_RETENTION: usize = 256;

#[derive(Debug, Clone)]
enum Slot {
    Open(PendingPayment),
    Closed(Termination),
}

/// Outstanding and finished payment attempts
///
/// An attempt lives in one slot that flips from open to closed under the
/// map's shard lock. Only the most recent closed attempts are kept; older
/// ones are forgotten and report as unknown.
#[derive(Debug)]
pub struct PaymentLedger {
    attempts: DashMap<PaymentAttemptId, Slot>,
    /// Closed attempts, oldest first
    closed: Mutex<VecDeque<PaymentAttemptId>>,
    retention: usize,
}

impl Default for PaymentLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentLedger {
    /// Create empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_CLOSED_RETENTION)
    }

    /// Create empty ledger remembering at most `retention` closed attempts
    #[must_use]
    pub fn with_retention(retention: usize) -> Self {
        Self {
            attempts: DashMap::new(),
            closed: Mutex::new(VecDeque::new()),
            retention: retention.max(1),
        }
    }

    /// Record a new attempt
    pub fn open(&self, price: Price, purpose: PaymentPurpose, approval_url: String) -> PendingPayment {
        let pending = PendingPayment {
            attempt: PaymentAttemptId::new(),
            price,
            purpose,
            approval_url,
            started_at: Utc::now(),
        };
        self.attempts
            .insert(pending.attempt, Slot::Open(pending.clone()));
        pending
    }

    /// Close an attempt with `termination`
    ///
    /// Concurrent callers for the same attempt see exactly one `Closed`; the
    /// others see `AlreadyClosed`.
    pub fn close(&self, attempt: PaymentAttemptId, termination: Termination) -> Closing {
        let previous = {
            let Some(mut slot) = self.attempts.get_mut(&attempt) else {
                return Closing::Unknown;
            };
            if let Slot::Closed(earlier) = *slot {
                return Closing::AlreadyClosed(earlier);
            }
            std::mem::replace(&mut *slot, Slot::Closed(termination))
        };

        match previous {
            Slot::Open(pending) => {
                self.retire(attempt);
                Closing::Closed(pending)
            }
            Slot::Closed(earlier) => Closing::AlreadyClosed(earlier),
        }
    }

    fn retire(&self, attempt: PaymentAttemptId) {
        let mut closed = self.closed.lock();
        closed.push_back(attempt);
        while closed.len() > self.retention {
            if let Some(oldest) = closed.pop_front() {
                self.attempts.remove(&oldest);
                tracing::debug!("Forgot closed payment attempt {}", oldest);
            }
        }
    }

    /// Look up an open attempt
    #[must_use]
    pub fn get(&self, attempt: PaymentAttemptId) -> Option<PendingPayment> {
        self.attempts.get(&attempt).and_then(|slot| match &*slot {
            Slot::Open(pending) => Some(pending.clone()),
            Slot::Closed(_) => None,
        })
    }

    /// Open attempts, oldest first
    #[must_use]
    pub fn pending(&self) -> Vec<PendingPayment> {
        let mut open: Vec<_> = self
            .attempts
            .iter()
            .filter_map(|slot| match slot.value() {
                Slot::Open(pending) => Some(pending.clone()),
                Slot::Closed(_) => None,
            })
            .collect();
        open.sort_by_key(|p| p.attempt);
        open
    }

    /// How a closed attempt ended
    #[must_use]
    pub fn termination(&self, attempt: PaymentAttemptId) -> Option<Termination> {
        self.attempts.get(&attempt).and_then(|slot| match *slot {
            Slot::Closed(termination) => Some(termination),
            Slot::Open(_) => None,
        })
    }

    /// Number of open attempts
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Open(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn purpose() -> PaymentPurpose {
        PaymentPurpose::Album {
            album_id: AlbumId::new("a"),
            intent: PaymentIntent::PlusMode,
        }
    }

    #[test]
    fn close_is_at_most_once() {
        let ledger = PaymentLedger::new();
        let pending = ledger.open(Price::from_cents(99), purpose(), "https://approve".into());

        assert!(matches!(
            ledger.close(pending.attempt, Termination::Approved),
            Closing::Closed(_)
        ));
        assert_eq!(
            ledger.close(pending.attempt, Termination::Cancelled),
            Closing::AlreadyClosed(Termination::Approved)
        );
        assert_eq!(ledger.pending_count(), 0);
    }

    #[test]
    fn unknown_attempt() {
        let ledger = PaymentLedger::new();
        assert_eq!(
            ledger.close(PaymentAttemptId::new(), Termination::Cancelled),
            Closing::Unknown
        );
    }

    #[test]
    fn pending_lists_open_attempts_in_order() {
        let ledger = PaymentLedger::new();
        let first = ledger.open(Price::from_dollars(9), purpose(), "u1".into());
        let second = ledger.open(Price::from_dollars(18), purpose(), "u2".into());
        ledger.close(first.attempt, Termination::Abandoned);

        let open = ledger.pending();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].attempt, second.attempt);
        assert_eq!(ledger.termination(first.attempt), Some(Termination::Abandoned));
    }

    #[tokio::test]
    async fn concurrent_close_yields_single_winner() {
        let ledger = Arc::new(PaymentLedger::new());
        let pending = ledger.open(Price::from_dollars(9), purpose(), "u".into());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                matches!(ledger.close(pending.attempt, Termination::Approved), Closing::Closed(_))
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[test]
    fn racing_closers_never_see_unknown() {
        let ledger = PaymentLedger::new();
        for _ in 0..50 {
            let pending = ledger.open(Price::from_dollars(9), purpose(), "u".into());
            let results: Vec<Closing> = std::thread::scope(|scope| {
                let closers: Vec<_> = [Termination::Approved, Termination::Cancelled]
                    .into_iter()
                    .cycle()
                    .take(6)
                    .map(|termination| {
                        let ledger = &ledger;
                        scope.spawn(move || ledger.close(pending.attempt, termination))
                    })
                    .collect();
                closers.into_iter().map(|c| c.join().unwrap()).collect()
            });

            let closed = results
                .iter()
                .filter(|r| matches!(r, Closing::Closed(_)))
                .count();
            assert_eq!(closed, 1);
            assert!(results.iter().all(|r| !matches!(r, Closing::Unknown)));
        }
    }

    #[test]
    fn old_closed_attempts_are_forgotten() {
        let ledger = PaymentLedger::with_retention(2);
        let attempts: Vec<_> = (0..3)
            .map(|_| ledger.open(Price::from_cents(99), purpose(), "u".into()).attempt)
            .collect();
        for attempt in &attempts {
            ledger.close(*attempt, Termination::Cancelled);
        }

        assert_eq!(ledger.close(attempts[0], Termination::Approved), Closing::Unknown);
        assert_eq!(
            ledger.close(attempts[2], Termination::Approved),
            Closing::AlreadyClosed(Termination::Cancelled)
        );
        assert_eq!(ledger.termination(attempts[1]), Some(Termination::Cancelled));
    }
}
