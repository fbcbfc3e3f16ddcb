//! Order backend client implementation

use crate::{
    error::BackendError,
    types::{CancelRequest, CreateOrderRequest, CreatedOrder, ErrorBody, OrderRecord, Product},
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The backend operations the kiosk consumes
///
/// Implemented over HTTP by [`HttpBackend`] and by scripted doubles in tests.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// `GET /api/products`
    ///
    /// # Errors
    ///
    /// Network, status, or decoding failures.
    async fn list_products(&self) -> Result<Vec<Product>, BackendError>;

    /// `POST /api/orders`
    ///
    /// # Errors
    ///
    /// [`BackendError::Conflict`] when the customer already holds an active
    /// order; any other failure otherwise.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder, BackendError>;

    /// `GET /api/orders/:id`
    ///
    /// # Errors
    ///
    /// [`BackendError::NotFound`] for any non-success status.
    async fn get_order(&self, order_id: &str) -> Result<OrderRecord, BackendError>;

    /// `GET /api/orders`
    ///
    /// # Errors
    ///
    /// Network, status, or decoding failures.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, BackendError>;

    /// `POST /api/orders/:id/cancel`
    ///
    /// # Errors
    ///
    /// [`BackendError::Api`] carrying the backend's `error` message.
    async fn cancel_order(&self, order_id: &str, reason: &str) -> Result<(), BackendError>;
}

/// HTTP implementation of [`OrderBackend`]
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:8000`)
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::RequestFailed`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::ResponseParseFailed(e.to_string()))
    }

    async fn error_body(response: Response) -> ErrorBody {
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str(&body).unwrap_or_default()
    }

    async fn api_error(response: Response) -> BackendError {
        let status = response.status().as_u16();
        let body = Self::error_body(response).await;
        BackendError::Api {
            status,
            message: body.error,
        }
    }
}

#[async_trait]
impl OrderBackend for HttpBackend {
    #[tracing::instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let response = self
            .client
            .get(self.url("/products"))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, request), fields(items = request.items.len()))]
    async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder, BackendError> {
        let response = self
            .client
            .post(self.url("/orders"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        if response.status().is_success() {
            return Self::decode(response).await;
        }

        let status = response.status().as_u16();
        let body = Self::error_body(response).await;
        match body.existing_order_id {
            Some(existing_order_id) => {
                tracing::info!(%existing_order_id, "Backend reported an active order");
                Err(BackendError::Conflict {
                    existing_order_id,
                    message: body
                        .error
                        .unwrap_or_else(|| "You already have an active order".to_string()),
                })
            },
            None => Err(BackendError::Api {
                status,
                message: body.error,
            }),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_order(&self, order_id: &str) -> Result<OrderRecord, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/orders/{order_id}")))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Self::decode(response).await,
            status => {
                tracing::debug!(status = status.as_u16(), "Order lookup failed");
                Err(BackendError::NotFound(order_id.to_string()))
            },
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, BackendError> {
        let response = self
            .client
            .get(self.url("/orders"))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_order(&self, order_id: &str, reason: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(&format!("/orders/{order_id}/cancel")))
            .json(&CancelRequest { reason })
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(order_id.to_string())),
            status if status.is_success() => Ok(()),
            _ => Err(Self::api_error(response).await),
        }
    }
}
