//! Smart marketplace HTTP client implementation

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use smart_core::{DeleteAck, Document, InsertAck, UpdateAck};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, SmartClientError};
use crate::types::{CreateUserOutcome, ErrorResponse};

/// Encode a caller-supplied id as exactly one path segment.
///
/// Bid `product` values are free strings, so `/`, `?`, `#` and `%` all occur.
fn path_segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Smart marketplace REST API client
#[derive(Debug, Clone)]
pub struct SmartClient {
    client: Client,
    base_url: Url,
}

impl SmartClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server (e.g., "http://localhost:3000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Create a new client that sends an `Authorization` header with every request.
    pub fn with_bearer_token(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let header_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| SmartClientError::ParseError(format!("Invalid auth token: {}", e)))?;
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // =========================================================================
    // Liveness
    // =========================================================================

    /// GET / - liveness text
    #[instrument(skip(self))]
    pub async fn root(&self) -> Result<String> {
        let url = self.base_url.join("/")?;
        self.text(self.client.get(url)).await
    }

    /// GET /health - store round trip
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<String> {
        let url = self.base_url.join("/health")?;
        self.text(self.client.get(url)).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a user; returns whether it was inserted or already existed
    #[instrument(skip(self, user))]
    pub async fn create_user<T: Serialize + ?Sized>(&self, user: &T) -> Result<CreateUserOutcome> {
        let url = self.base_url.join("/users")?;
        self.send(self.client.post(url).json(user)).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products, optionally filtered by seller email
    #[instrument(skip(self))]
    pub async fn list_products(&self, email: Option<&str>) -> Result<Vec<Document>> {
        let url = self.base_url.join("/products")?;
        debug!("Listing products from {}", url);
        self.send(with_email(self.client.get(url), email)).await
    }

    /// Newest products (at most 9)
    #[instrument(skip(self))]
    pub async fn latest_products(&self) -> Result<Vec<Document>> {
        let url = self.base_url.join("/latest-products")?;
        self.send(self.client.get(url)).await
    }

    /// Fetch one product; `None` when no product has this id
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<Option<Document>> {
        let url = self.base_url.join(&format!("/products/{}", path_segment(id)))?;
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self, product))]
    pub async fn create_product<T: Serialize + ?Sized>(&self, product: &T) -> Result<InsertAck> {
        let url = self.base_url.join("/products")?;
        self.send(self.client.post(url).json(product)).await
    }

    /// Update `name` and `price` of a product
    #[instrument(skip(self, update))]
    pub async fn update_product<T: Serialize + ?Sized>(
        &self,
        id: &str,
        update: &T,
    ) -> Result<UpdateAck> {
        let url = self.base_url.join(&format!("/products/{}", path_segment(id)))?;
        self.send(self.client.patch(url).json(update)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<DeleteAck> {
        let url = self.base_url.join(&format!("/products/{}", path_segment(id)))?;
        self.send(self.client.delete(url)).await
    }

    // =========================================================================
    // Bids
    // =========================================================================

    /// List bids, optionally filtered by buyer email
    #[instrument(skip(self))]
    pub async fn list_bids(&self, email: Option<&str>) -> Result<Vec<Document>> {
        let url = self.base_url.join("/bids")?;
        self.send(with_email(self.client.get(url), email)).await
    }

    /// Bids on one product, highest `bid_price` first
    #[instrument(skip(self))]
    pub async fn list_product_bids(&self, product_id: &str) -> Result<Vec<Document>> {
        let url = self
            .base_url
            .join(&format!("/products/bids/{}", path_segment(product_id)))?;
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self, bid))]
    pub async fn create_bid<T: Serialize + ?Sized>(&self, bid: &T) -> Result<InsertAck> {
        let url = self.base_url.join("/bids")?;
        self.send(self.client.post(url).json(bid)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_bid(&self, id: &str) -> Result<DeleteAck> {
        let url = self.base_url.join(&format!("/bids/{}", path_segment(id)))?;
        self.send(self.client.delete(url)).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn text(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| SmartClientError::ParseError(e.to_string()))
        } else {
            Err(self.extract_error_from_status(response, status).await)
        }
    }

    /// Extract error from failed response
    async fn extract_error(&self, response: reqwest::Response) -> SmartClientError {
        let status = response.status();
        self.extract_error_from_status(response, status).await
    }

    async fn extract_error_from_status(
        &self,
        response: reqwest::Response,
        status: StatusCode,
    ) -> SmartClientError {
        // Try to parse error response body
        let message = match response.json::<ErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => format!("HTTP {}", status),
        };

        match status {
            StatusCode::BAD_REQUEST => SmartClientError::BadRequest(message),
            StatusCode::UNAUTHORIZED => SmartClientError::Unauthorized(message),
            _ => SmartClientError::server_error(status.as_u16(), message),
        }
    }
}

fn with_email(request: RequestBuilder, email: Option<&str>) -> RequestBuilder {
    match email {
        Some(email) => request.query(&[("email", email)]),
        None => request,
    }
}
