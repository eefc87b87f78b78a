//! In-process mock of the order-approval service
//!
//! Serves the five endpoints the harness drives, with the same wire shapes
//! as the real service (camelCase fields, Portuguese status vocabulary and
//! rejection messages). Approval check-and-debit happens atomically under
//! one mutex, mirroring the service's pessimistic partner lock;
//! `lost_update_mode` deliberately drops every other debit so the harness's
//! reconciliation oracle has a real race to catch.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Fault-injection switches for the mock
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Partner creation returns 500
    pub fail_partner_creation: bool,
    /// Every order creation returns 500
    pub fail_all_orders: bool,
    /// Every second order creation returns 500
    pub fail_every_other_order: bool,
    /// Approve orders but skip every second debit (simulated lost update)
    pub lost_update_mode: bool,
}

#[derive(Debug, Clone)]
struct PartnerRecord {
    id: i64,
    name: String,
    credit_limit: f64,
    current_credit: f64,
}

#[derive(Debug, Clone)]
struct OrderRecord {
    id: i64,
    partner_id: i64,
    status: String,
    total_value: f64,
}

#[derive(Default)]
struct ServiceState {
    partners: HashMap<i64, PartnerRecord>,
    orders: HashMap<i64, OrderRecord>,
    next_id: i64,
    order_creation_calls: u64,
    approvals: u64,
}

/// Handle to the running mock: shared state plus request counters
#[derive(Clone)]
pub struct MockService {
    behavior: Arc<MockBehavior>,
    state: Arc<Mutex<ServiceState>>,
    patch_calls: Arc<AtomicU64>,
}

impl MockService {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            state: Arc::new(Mutex::new(ServiceState::default())),
            patch_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of PATCH status requests the mock has seen
    pub fn patch_calls(&self) -> u64 {
        self.patch_calls.load(Ordering::SeqCst)
    }

    /// Number of POST /orders requests the mock has seen
    pub fn order_creation_calls(&self) -> u64 {
        self.state.lock().unwrap().order_creation_calls
    }

    /// Current credit of a partner, if it exists
    pub fn partner_credit(&self, partner_id: i64) -> Option<f64> {
        self.state
            .lock()
            .unwrap()
            .partners
            .get(&partner_id)
            .map(|p| p.current_credit)
    }

    /// Count of orders currently in APROVADO state
    pub fn approved_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .orders
            .values()
            .filter(|o| o.status == "APROVADO")
            .count()
    }
}

fn partner_json(partner: &PartnerRecord) -> Value {
    json!({
        "id": partner.id,
        "name": partner.name,
        "creditLimit": partner.credit_limit,
        "currentCredit": partner.current_credit,
    })
}

fn order_json(order: &OrderRecord) -> Value {
    json!({
        "id": order.id,
        "partnerId": order.partner_id,
        "status": order.status,
        "totalValue": order.total_value,
    })
}

fn error_json(message: String) -> Value {
    json!({
        "timestamp": "2024-01-01T00:00:00",
        "message": message,
        "details": "uri=/mock",
    })
}

async fn create_partner(
    State(service): State<MockService>,
    Json(body): Json<Value>,
) -> Response {
    if service.behavior.fail_partner_creation {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_json("partner store unavailable".to_string())),
        )
            .into_response();
    }

    let mut state = service.state.lock().unwrap();
    state.next_id += 1;
    let partner = PartnerRecord {
        id: state.next_id,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        credit_limit: body["creditLimit"].as_f64().unwrap_or_default(),
        current_credit: body["currentCredit"].as_f64().unwrap_or_default(),
    };
    let response = partner_json(&partner);
    state.partners.insert(partner.id, partner);

    (StatusCode::CREATED, Json(response)).into_response()
}

async fn get_partner(State(service): State<MockService>, Path(id): Path<i64>) -> Response {
    let state = service.state.lock().unwrap();
    match state.partners.get(&id) {
        Some(partner) => (StatusCode::OK, Json(partner_json(partner))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(error_json(format!("Parceiro não encontrado com ID: {}", id))),
        )
            .into_response(),
    }
}

async fn create_order(State(service): State<MockService>, Json(body): Json<Value>) -> Response {
    let mut state = service.state.lock().unwrap();
    state.order_creation_calls += 1;

    if service.behavior.fail_all_orders
        || (service.behavior.fail_every_other_order && state.order_creation_calls % 2 == 0)
    {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_json("order store unavailable".to_string())),
        )
            .into_response();
    }

    let partner_id = body["partnerId"].as_i64().unwrap_or_default();
    if !state.partners.contains_key(&partner_id) {
        return (
            StatusCode::NOT_FOUND,
            Json(error_json(format!(
                "Parceiro não encontrado com ID: {}",
                partner_id
            ))),
        )
            .into_response();
    }

    let total_value = body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    item["quantity"].as_f64().unwrap_or_default()
                        * item["unitPrice"].as_f64().unwrap_or_default()
                })
                .sum()
        })
        .unwrap_or(0.0);

    state.next_id += 1;
    let order = OrderRecord {
        id: state.next_id,
        partner_id,
        status: "PENDENTE".to_string(),
        total_value,
    };
    let response = order_json(&order);
    state.orders.insert(order.id, order);

    (StatusCode::CREATED, Json(response)).into_response()
}

async fn patch_order_status(
    State(service): State<MockService>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    service.patch_calls.fetch_add(1, Ordering::SeqCst);

    let new_status = params.get("newStatus").cloned().unwrap_or_default();
    if new_status != "APROVADO" {
        return (
            StatusCode::BAD_REQUEST,
            Json(error_json(format!(
                "Transição de status não suportada: {}",
                new_status
            ))),
        )
            .into_response();
    }

    // Check-and-debit under a single lock, like the service's pessimistic
    // partner lock
    let mut state = service.state.lock().unwrap();

    let (partner_id, total_value, status) = match state.orders.get(&id) {
        Some(order) => (order.partner_id, order.total_value, order.status.clone()),
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(error_json(format!("Pedido não encontrado com ID: {}", id))),
            )
                .into_response();
        }
    };

    if status != "PENDENTE" {
        return (
            StatusCode::BAD_REQUEST,
            Json(error_json(format!(
                "Não é possível aprovar um pedido com status {}",
                status
            ))),
        )
            .into_response();
    }

    let current_credit = state
        .partners
        .get(&partner_id)
        .map(|p| p.current_credit)
        .unwrap_or_default();
    if current_credit < total_value {
        return (
            StatusCode::BAD_REQUEST,
            Json(error_json(format!(
                "Parceiro ID {} não tem crédito suficiente para aprovar este pedido. Crédito disponível: {}, Valor do pedido: {}",
                partner_id, current_credit, total_value
            ))),
        )
            .into_response();
    }

    state.approvals += 1;
    let skip_debit = service.behavior.lost_update_mode && state.approvals % 2 == 0;
    if !skip_debit {
        if let Some(partner) = state.partners.get_mut(&partner_id) {
            partner.current_credit -= total_value;
        }
    }

    let order = state
        .orders
        .get_mut(&id)
        .expect("order existence checked above");
    order.status = "APROVADO".to_string();
    let response = order_json(order);

    (StatusCode::OK, Json(response)).into_response()
}

async fn list_orders(
    State(service): State<MockService>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let partner_id: Option<i64> = params.get("partnerId").and_then(|v| v.parse().ok());
    let status = params.get("status").cloned();

    let state = service.state.lock().unwrap();
    let orders: Vec<Value> = state
        .orders
        .values()
        .filter(|order| partner_id.map_or(true, |id| order.partner_id == id))
        .filter(|order| status.as_deref().map_or(true, |s| order.status == s))
        .map(order_json)
        .collect();

    (StatusCode::OK, Json(Value::Array(orders))).into_response()
}

/// Start the mock on an ephemeral port; returns its base URL and handle
pub async fn start_mock_service(behavior: MockBehavior) -> (String, MockService) {
    let service = MockService::new(behavior);

    let app = Router::new()
        .route("/api/partners", post(create_partner))
        .route("/api/partners/{id}", get(get_partner))
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/{id}/status", patch(patch_order_status))
        .with_state(service.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), service)
}

/// Install a quiet tracing subscriber once per test binary
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .without_time()
        .try_init();
}
