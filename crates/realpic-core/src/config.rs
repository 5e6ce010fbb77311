//! Controller configuration

use crate::payment::RedirectMatcher;
use realpic_lifecycle::FeeSchedule;
use serde::{Deserialize, Serialize};

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Checkout backend `create-order` URL
    pub checkout_endpoint: String,
    /// Navigation starting with this approves the payment
    pub success_prefix: String,
    /// Navigation starting with this cancels the payment
    pub cancel_prefix: String,
    /// Cover used when image search finds nothing
    pub placeholder_cover: String,
    /// Slots in an album created from a coupon
    pub coupon_photo_limit: u32,
    /// Feature and printing prices
    pub fees: FeeSchedule,
}

impl ControllerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML; omitted keys keep their defaults
    ///
    /// # Errors
    /// Malformed TOML or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Derive endpoint and both callback prefixes from the checkout backend's base URL
    #[must_use]
    pub fn with_checkout_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.checkout_endpoint = format!("{base}/create-order");
        self.success_prefix = format!("{base}/success.html");
        self.cancel_prefix = format!("{base}/cancel.html");
        self
    }

    /// With placeholder cover
    #[inline]
    #[must_use]
    pub fn with_placeholder_cover(mut self, url: impl Into<String>) -> Self {
        self.placeholder_cover = url.into();
        self
    }

    /// With coupon album size
    #[inline]
    #[must_use]
    pub fn with_coupon_photo_limit(mut self, limit: u32) -> Self {
        self.coupon_photo_limit = limit;
        self
    }

    /// With fees
    #[inline]
    #[must_use]
    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Matcher for the configured callback prefixes
    #[must_use]
    pub fn redirect_matcher(&self) -> RedirectMatcher {
        RedirectMatcher::new(&self.success_prefix, &self.cancel_prefix)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            checkout_endpoint: String::new(),
            success_prefix: String::new(),
            cancel_prefix: String::new(),
            placeholder_cover: "https://via.placeholder.com/150".to_string(),
            coupon_photo_limit: 6,
            fees: FeeSchedule::default(),
        }
        .with_checkout_base("http://localhost:3002")
    }
}
