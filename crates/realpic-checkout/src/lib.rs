//! RealPic Checkout Backend
//!
//! Turns a price into a PayPal approval link for the mobile app.
//!
//! # Core Concepts
//!
//! - [`CheckoutConfig`]: Credentials, provider URL and public callback base
//! - [`PayPalClient`]: Client-credentials token exchange plus order creation
//! - [`routes`]: `POST /create-order` and the `success.html` / `cancel.html` pages
//!
//! # Example
//!
//! ```rust,ignore
//! use clap::Parser;
//! use realpic_checkout::{routes, CheckoutConfig, PayPalClient};
//! use std::sync::Arc;
//!
//! let config = CheckoutConfig::parse();
//! let provider = Arc::new(PayPalClient::new(&config));
//! warp::serve(routes(provider, config.static_dir.clone())).run(config.bind).await;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod pages;
pub mod paypal;
pub mod routes;

pub use config::{CheckoutConfig, SANDBOX_API};
pub use error::CheckoutError;
pub use paypal::{OrderProvider, PayPalClient};
pub use routes::{price_from_body, routes};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
