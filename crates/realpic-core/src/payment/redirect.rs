//! Callback URL matching for the redirect-based checkout flow

use serde::{Deserialize, Serialize};

/// Terminal outcome of a checkout, as signalled by the provider's redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentSignal {
    /// The provider returned to the success page
    Approved,
    /// The provider returned to the cancel page
    Cancelled,
}

/// Matches checkout navigation against the success and cancel callback prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectMatcher {
    success_prefix: String,
    cancel_prefix: String,
}

impl RedirectMatcher {
    /// Matcher for the two callback prefixes
    #[inline]
    #[must_use]
    pub fn new(success_prefix: impl Into<String>, cancel_prefix: impl Into<String>) -> Self {
        Self {
            success_prefix: success_prefix.into(),
            cancel_prefix: cancel_prefix.into(),
        }
    }

    /// Signal raised by navigating to `url`, if any
    ///
    /// Intermediate provider pages match neither prefix and yield `None`.
    #[must_use]
    pub fn classify(&self, url: &str) -> Option<PaymentSignal> {
        if url.starts_with(&self.success_prefix) {
            Some(PaymentSignal::Approved)
        } else if url.starts_with(&self.cancel_prefix) {
            Some(PaymentSignal::Cancelled)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> RedirectMatcher {
        RedirectMatcher::new(
            "https://pay.example/success.html",
            "https://pay.example/cancel.html",
        )
    }

    #[test]
    fn classifies_callbacks_by_prefix() {
        let m = matcher();
        assert_eq!(
            m.classify("https://pay.example/success.html?token=EC-1&PayerID=X"),
            Some(PaymentSignal::Approved)
        );
        assert_eq!(
            m.classify("https://pay.example/cancel.html?token=EC-1"),
            Some(PaymentSignal::Cancelled)
        );
    }

    #[test]
    fn ignores_provider_pages() {
        let m = matcher();
        assert_eq!(m.classify("https://www.sandbox.paypal.com/checkoutnow?token=EC-1"), None);
        assert_eq!(m.classify("https://pay.example/"), None);
    }
}
