//! HTTP routes
//!
//! - `POST /create-order {"price": "9.00"}` → `{"approveLink": "..."}`
//! - `GET /success.html`, `GET /cancel.html`: callback pages
//! - anything else under the static directory

use crate::error::CheckoutError;
use crate::pages::{CANCEL_HTML, SUCCESS_HTML};
use crate::paypal::OrderProvider;
use realpic_album::Price;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Read the price from a request body
///
/// Accepts a JSON string or number. Absent, null, empty and zero count as
/// missing.
///
/// # Errors
/// `MissingPrice` or `InvalidPrice`.
pub fn price_from_body(body: &Value) -> Result<Price, CheckoutError> {
    let raw = match body.get("price") {
        None | Some(Value::Null) => return Err(CheckoutError::MissingPrice),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(CheckoutError::InvalidPrice(other.to_string())),
    };
    if raw.is_empty() {
        return Err(CheckoutError::MissingPrice);
    }

    let price: Price = raw
        .parse()
        .map_err(|_| CheckoutError::InvalidPrice(raw.clone()))?;
    if price.cents() == 0 {
        return Err(CheckoutError::MissingPrice);
    }
    Ok(price)
}

async fn create_order(
    body: Value,
    provider: Arc<dyn OrderProvider>,
) -> Result<impl Reply, Infallible> {
    let result = match price_from_body(&body) {
        Ok(price) => {
            tracing::debug!("Creating order for ${}", price);
            provider.approval_link(price).await
        }
        Err(e) => Err(e),
    };

    let reply = match result {
        Ok(link) => {
            tracing::info!("Order created");
            warp::reply::with_status(warp::reply::json(&json!({ "approveLink": link })), StatusCode::OK)
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!("Rejected order request: {}", e);
            } else {
                tracing::error!("Error creating order: {}", e);
            }
            warp::reply::with_status(
                warp::reply::json(&json!({ "error": e.public_message() })),
                e.status(),
            )
        }
    };
    Ok(reply)
}

/// All routes, with permissive CORS
pub fn routes(
    provider: Arc<dyn OrderProvider>,
    static_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_provider = warp::any().map(move || Arc::clone(&provider));

    let create = warp::post()
        .and(warp::path("create-order"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_provider)
        .and_then(create_order);

    let success = warp::get()
        .and(warp::path("success.html"))
        .and(warp::path::end())
        .map(|| warp::reply::html(SUCCESS_HTML));

    let cancel = warp::get()
        .and(warp::path("cancel.html"))
        .and(warp::path::end())
        .map(|| warp::reply::html(CANCEL_HTML));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    create
        .or(success)
        .or(cancel)
        .or(warp::fs::dir(static_dir))
        .with(cors)
        .with(warp::trace::request())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paypal::MockOrderProvider;
    use pretty_assertions::assert_eq;

    const APPROVE: &str = "https://www.sandbox.paypal.com/checkoutnow?token=5O190127TN364715T";

    fn app(
        provider: MockOrderProvider,
    ) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        routes(Arc::new(provider), PathBuf::from("does-not-exist"))
    }

    fn body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn price_parsing() {
        assert_eq!(price_from_body(&json!({ "price": "9.00" })).unwrap(), Price::from_dollars(9));
        assert_eq!(price_from_body(&json!({ "price": 2.99 })).unwrap(), Price::from_cents(299));
        assert_eq!(price_from_body(&json!({ "price": 18 })).unwrap(), Price::from_dollars(18));
        assert!(matches!(price_from_body(&json!({})), Err(CheckoutError::MissingPrice)));
        assert!(matches!(price_from_body(&json!({ "price": "" })), Err(CheckoutError::MissingPrice)));
        assert!(matches!(price_from_body(&json!({ "price": 0 })), Err(CheckoutError::MissingPrice)));
        assert!(matches!(
            price_from_body(&json!({ "price": "nine" })),
            Err(CheckoutError::InvalidPrice(_))
        ));
        assert!(matches!(
            price_from_body(&json!({ "price": true })),
            Err(CheckoutError::InvalidPrice(_))
        ));
    }

    #[tokio::test]
    async fn create_order_returns_approve_link() {
        let mut provider = MockOrderProvider::new();
        provider
            .expect_approval_link()
            .withf(|price| *price == Price::from_dollars(18))
            .times(1)
            .returning(|_| Ok(APPROVE.to_string()));

        let response = warp::test::request()
            .method("POST")
            .path("/create-order")
            .json(&json!({ "price": "18.00" }))
            .reply(&app(provider))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(&response), json!({ "approveLink": APPROVE }));
    }

    #[tokio::test]
    async fn missing_price_is_bad_request() {
        let mut provider = MockOrderProvider::new();
        provider.expect_approval_link().never();

        let response = warp::test::request()
            .method("POST")
            .path("/create-order")
            .json(&json!({}))
            .reply(&app(provider))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response), json!({ "error": "Price is required" }));
    }

    #[tokio::test]
    async fn provider_failures_are_server_errors() {
        let mut provider = MockOrderProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_approval_link()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(CheckoutError::NoAccessToken));
        provider
            .expect_approval_link()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(CheckoutError::NoApproveLink));
        let app = app(provider);

        let first = warp::test::request()
            .method("POST")
            .path("/create-order")
            .json(&json!({ "price": 9 }))
            .reply(&app)
            .await;
        assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&first), json!({ "error": "Failed to create PayPal order" }));

        let second = warp::test::request()
            .method("POST")
            .path("/create-order")
            .json(&json!({ "price": 9 }))
            .reply(&app)
            .await;
        assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&second), json!({ "error": "No approve link found" }));
    }

    #[tokio::test]
    async fn callback_pages_are_served() {
        let app = app(MockOrderProvider::new());

        let success = warp::test::request()
            .path("/success.html?token=EC-1&PayerID=X")
            .reply(&app)
            .await;
        assert_eq!(success.status(), StatusCode::OK);
        assert!(String::from_utf8_lossy(success.body()).contains("Payment complete"));

        let cancel = warp::test::request().path("/cancel.html").reply(&app).await;
        assert!(String::from_utf8_lossy(cancel.body()).contains("Payment cancelled"));
    }
}
