//! Command-line and environment configuration

use crate::error::CheckoutError;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// PayPal sandbox REST API
pub const SANDBOX_API: &str = "https://api-m.sandbox.paypal.com";

/// Checkout backend configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "realpic-checkout", version, about = "Creates PayPal orders for RealPic purchases")]
pub struct CheckoutConfig {
    /// PayPal REST client id
    #[arg(long, env = "PAYPAL_CLIENT_ID", hide_env_values = true)]
    pub client_id: String,

    /// PayPal REST client secret
    #[arg(long, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// PayPal API base URL
    #[arg(long, env = "PAYPAL_API", default_value = SANDBOX_API)]
    pub api_base: String,

    /// Public URL of this service; callback pages are served under it
    #[arg(long, env = "REALPIC_PUBLIC_URL", default_value = "http://localhost:3002")]
    pub public_url: String,

    /// Listen address
    #[arg(long, env = "REALPIC_CHECKOUT_BIND", default_value = "0.0.0.0:3002")]
    pub bind: SocketAddr,

    /// Extra static files
    #[arg(long, default_value = "public")]
    pub static_dir: PathBuf,

    /// Log as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl CheckoutConfig {
    /// Where PayPal sends the buyer after approval
    #[must_use]
    pub fn return_url(&self) -> String {
        format!("{}/success.html", self.public_url.trim_end_matches('/'))
    }

    /// Where PayPal sends the buyer after cancelling
    #[must_use]
    pub fn cancel_url(&self) -> String {
        format!("{}/cancel.html", self.public_url.trim_end_matches('/'))
    }

    /// Reject blank credentials
    ///
    /// # Errors
    /// [`CheckoutError::Config`] naming the blank setting.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(CheckoutError::Config(
                "PayPal credentials missing (PAYPAL_CLIENT_ID / PAYPAL_CLIENT_SECRET)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CheckoutConfig, clap::Error> {
        CheckoutConfig::try_parse_from(std::iter::once("realpic-checkout").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_follow_sandbox_setup() {
        let config = parse(&["--client-id", "id", "--client-secret", "secret"]).unwrap();
        assert_eq!(config.api_base, SANDBOX_API);
        assert_eq!(config.bind.port(), 3002);
        assert_eq!(config.return_url(), "http://localhost:3002/success.html");
        assert_eq!(config.cancel_url(), "http://localhost:3002/cancel.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn callback_urls_follow_public_url() {
        let config = parse(&[
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--public-url",
            "https://pay.realpic.app/",
        ])
        .unwrap();
        assert_eq!(config.return_url(), "https://pay.realpic.app/success.html");
    }

    #[test]
    fn blank_credentials_are_rejected() {
        let config = parse(&["--client-id", " ", "--client-secret", "secret"]).unwrap();
        assert!(matches!(config.validate(), Err(CheckoutError::Config(_))));
    }
}
