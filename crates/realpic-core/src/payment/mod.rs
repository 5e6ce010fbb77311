//! Payment Gateway Adapter
//!
//! Bridges a price to a payment outcome:
//! - [`ApprovalGateway`]: obtains a provider approval link for a price
//! - [`RedirectMatcher`]: turns checkout navigation into a [`PaymentSignal`]
//! - [`PaymentLedger`]: remembers what each outstanding attempt will do on approval
//!
//! Each attempt raises at most one terminal signal; once closed in the
//! ledger, further navigation for it is ignored.

mod gateway;
mod ledger;
mod redirect;

pub use gateway::{ApprovalGateway, HttpApprovalGateway};
pub use ledger::{
    Closing, PaymentLedger, PaymentPurpose, PendingPayment, Termination, DEFAULT_CLOSED_RETENTION,
};
pub use redirect::{PaymentSignal, RedirectMatcher};

#[cfg(test)]
pub use gateway::MockApprovalGateway;

use realpic_album::Price;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique payment attempt identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaymentAttemptId(pub Ulid);

impl PaymentAttemptId {
    /// Generate new attempt ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for PaymentAttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentAttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment waiting for the user in the provider's checkout flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    /// Attempt to report navigation against
    pub attempt: PaymentAttemptId,
    /// Amount being charged
    pub price: Price,
    /// Provider page the user must visit
    pub approval_url: String,
}
