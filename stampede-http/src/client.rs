//! Typed client for the order-approval service

use crate::errors::HttpError;
use crate::types::{
    Order, OrderRequest, OrderStatus, Partner, PartnerRequest, StatusTransition,
};
use reqwest::{Client, StatusCode};
use stampede_config::HttpConfig;
use tracing::debug;

/// Client seam for the service under test.
///
/// The scenario engine only talks to this trait, so tests can substitute an
/// in-process implementation.
#[async_trait::async_trait]
pub trait OrderApi: Send + Sync {
    /// Create a partner, returning its persisted state (201 expected)
    async fn create_partner(&self, request: &PartnerRequest) -> Result<Partner, HttpError>;

    /// Create a pending order (201 expected)
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, HttpError>;

    /// Attempt a status transition; non-2xx responses are returned as data
    async fn update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<StatusTransition, HttpError>;

    /// List a partner's orders filtered by status
    async fn list_orders(
        &self,
        partner_id: i64,
        status: OrderStatus,
    ) -> Result<Vec<Order>, HttpError>;

    /// Fetch current partner state
    async fn get_partner(&self, partner_id: i64) -> Result<Partner, HttpError>;
}

/// reqwest-backed [`OrderApi`] implementation
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the harness HTTP configuration
    pub fn new(base_url: impl Into<String>, config: &HttpConfig) -> Result<Self, HttpError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(HttpError::InvalidUrl("base URL cannot be empty".to_string()));
        }

        debug!(
            "Creating ApiClient for {} with {}s timeout",
            base_url,
            config.timeout.as_secs()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Decode an expected-status JSON response, mapping anything else to
    /// [`HttpError::UnexpectedStatus`]
    async fn expect_json<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        expected: StatusCode,
        response: reqwest::Response,
    ) -> Result<T, HttpError> {
        let status = response.status();
        if status != expected {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::UnexpectedStatus {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl OrderApi for ApiClient {
    async fn create_partner(&self, request: &PartnerRequest) -> Result<Partner, HttpError> {
        debug!("POST partners: {}", request.name);
        let response = self
            .client
            .post(self.endpoint("partners"))
            .json(request)
            .send()
            .await?;
        Self::expect_json("create_partner", StatusCode::CREATED, response).await
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, HttpError> {
        let response = self
            .client
            .post(self.endpoint("orders"))
            .json(request)
            .send()
            .await?;
        Self::expect_json("create_order", StatusCode::CREATED, response).await
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<StatusTransition, HttpError> {
        let response = self
            .client
            .patch(self.endpoint(&format!("orders/{}/status", order_id)))
            .query(&[("newStatus", new_status.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        debug!("PATCH orders/{}/status -> {}", order_id, status);
        Ok(StatusTransition { status, body })
    }

    async fn list_orders(
        &self,
        partner_id: i64,
        status: OrderStatus,
    ) -> Result<Vec<Order>, HttpError> {
        let response = self
            .client
            .get(self.endpoint("orders"))
            .query(&[
                ("partnerId", partner_id.to_string().as_str()),
                ("status", status.as_str()),
            ])
            .send()
            .await?;
        Self::expect_json("list_orders", StatusCode::OK, response).await
    }

    async fn get_partner(&self, partner_id: i64) -> Result<Partner, HttpError> {
        let response = self
            .client
            .get(self.endpoint(&format!("partners/{}", partner_id)))
            .send()
            .await?;
        Self::expect_json("get_partner", StatusCode::OK, response).await
    }
}
