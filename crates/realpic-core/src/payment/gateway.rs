//! Approval link requests against the checkout backend

use crate::error::GatewayError;
use async_trait::async_trait;
use realpic_album::Price;
use serde::{Deserialize, Serialize};

/// Obtains a provider approval link for a price
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApprovalGateway: Send + Sync {
    /// Create an order for `price` and return the URL the user must approve it at
    async fn request_approval(&self, price: Price) -> Result<String, GatewayError>;
}

#[derive(Serialize)]
struct CreateOrderRequest {
    price: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    approve_link: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `POST {endpoint} {"price": "9.00"}` → `{"approveLink": "..."}`
#[derive(Debug, Clone)]
pub struct HttpApprovalGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpApprovalGateway {
    /// Gateway posting to the checkout backend's `create-order` URL
    #[inline]
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// With a preconfigured HTTP client
    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ApprovalGateway for HttpApprovalGateway {
    async fn request_approval(&self, price: Price) -> Result<String, GatewayError> {
        tracing::debug!("Requesting approval link for ${}", price);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&CreateOrderRequest {
                price: price.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| status.to_string());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreateOrderResponse = response.json().await?;
        body.approve_link
            .filter(|link| !link.is_empty())
            .ok_or(GatewayError::MissingApproveLink)
    }
}
