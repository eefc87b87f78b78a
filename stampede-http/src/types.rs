//! Wire types for the order-approval service
//!
//! Field names are camelCase and status values carry the service's own
//! vocabulary, so these types serialize byte-compatibly with its API.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as the service spells it on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "APROVADO")]
    Approved,
    #[serde(rename = "EM_PROCESSAMENTO")]
    InProcessing,
    #[serde(rename = "ENVIADO")]
    Shipped,
    #[serde(rename = "ENTREGUE")]
    Delivered,
    #[serde(rename = "CANCELADO")]
    Cancelled,
}

impl OrderStatus {
    /// Wire spelling, used in `newStatus`/`status` query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDENTE",
            OrderStatus::Approved => "APROVADO",
            OrderStatus::InProcessing => "EM_PROCESSAMENTO",
            OrderStatus::Shipped => "ENVIADO",
            OrderStatus::Delivered => "ENTREGUE",
            OrderStatus::Cancelled => "CANCELADO",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for partner creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequest {
    pub name: String,
    pub credit_limit: f64,
    pub current_credit: f64,
}

/// Partner state as returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub credit_limit: f64,
    pub current_credit: f64,
}

/// One line item of an order creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Request body for order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub partner_id: i64,
    pub items: Vec<OrderItemRequest>,
}

/// Order state as returned by the service
///
/// Only the fields the harness reads; the service sends more.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub total_value: Option<f64>,
}

/// Error body the service attaches to business-rule rejections
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Result of a status-transition request, successful or not.
///
/// Non-2xx responses are data here, not errors: the worker classifies them.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub status: u16,
    pub body: String,
}

impl StatusTransition {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
