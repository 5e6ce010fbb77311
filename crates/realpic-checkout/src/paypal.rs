//! PayPal REST client
//!
//! Two calls per order:
//! 1. `POST /v1/oauth2/token` with client credentials for a bearer token
//! 2. `POST /v2/checkout/orders` for a USD capture order; `201` carries the
//!    `approve` link

use crate::config::CheckoutConfig;
use crate::error::CheckoutError;
use async_trait::async_trait;
use realpic_album::Price;
use serde::{Deserialize, Serialize};

/// Creates an order and returns the buyer's approval link
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderProvider: Send + Sync {
    async fn approval_link(&self, price: Price) -> Result<String, CheckoutError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Serialize)]
struct OrderRequest<'a> {
    intent: &'static str,
    purchase_units: [PurchaseUnit; 1],
    application_context: ApplicationContext<'a>,
}

#[derive(Serialize)]
struct PurchaseUnit {
    amount: Amount,
}

#[derive(Serialize)]
struct Amount {
    currency_code: &'static str,
    value: String,
}

#[derive(Serialize)]
struct ApplicationContext<'a> {
    return_url: &'a str,
    cancel_url: &'a str,
}

#[derive(Deserialize)]
struct OrderResponse {
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Deserialize)]
struct Link {
    href: String,
    rel: String,
}

/// PayPal Orders v2 client
#[derive(Debug, Clone)]
pub struct PayPalClient {
    http: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: String,
    return_url: String,
    cancel_url: String,
}

impl PayPalClient {
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            return_url: config.return_url(),
            cancel_url: config.cancel_url(),
        }
    }

    async fn access_token(&self) -> Result<String, CheckoutError> {
        let response: TokenResponse = self
            .http
            .post(format!("{}/v1/oauth2/token", self.api_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .json()
            .await?;

        response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(CheckoutError::NoAccessToken)
    }

    async fn create_order(&self, token: &str, price: Price) -> Result<OrderResponse, CheckoutError> {
        let request = OrderRequest {
            intent: "CAPTURE",
            purchase_units: [PurchaseUnit {
                amount: Amount {
                    currency_code: "USD",
                    value: price.to_string(),
                },
            }],
            application_context: ApplicationContext {
                return_url: &self.return_url,
                cancel_url: &self.cancel_url,
            },
        };

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.api_base))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::CREATED {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CheckoutError::OrderRejected { status, body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl OrderProvider for PayPalClient {
    async fn approval_link(&self, price: Price) -> Result<String, CheckoutError> {
        let token = self.access_token().await?;
        let order = self.create_order(&token, price).await?;
        order
            .links
            .into_iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href)
            .ok_or(CheckoutError::NoApproveLink)
    }
}
