//! Seed phase: build the shared contention state
//!
//! Runs once, single-threaded, before any worker starts. Creates one
//! credit-limited partner and a batch of pending orders against it, and
//! returns the immutable snapshot every worker shares.

use crate::error::ScenarioError;
use stampede_config::ScenarioConfig;
use stampede_http::{OrderApi, OrderItemRequest, OrderRequest, PartnerRequest};
use tracing::{info, warn};
use uuid::Uuid;

/// Immutable snapshot of the seeded state, shared read-only by all workers
#[derive(Debug, Clone)]
pub struct SeedSnapshot {
    /// Identity of the contended partner
    pub partner_id: i64,
    /// Partner credit at the moment seeding finished, per the service
    pub initial_credit: f64,
    /// Identities of the successfully created orders, in creation order
    pub order_ids: Vec<i64>,
    /// Unit value of every seeded order
    pub order_unit_value: f64,
}

impl SeedSnapshot {
    /// Order targeted by an iteration index, if the index is in range.
    ///
    /// Iteration `i` always maps to position `i`, so distinct indices can
    /// never target the same order.
    pub fn order_at(&self, index: u64) -> Option<i64> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.order_ids.get(i).copied())
    }

    pub fn len(&self) -> usize {
        self.order_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order_ids.is_empty()
    }
}

/// Create the contended partner and its pending orders.
///
/// Partner creation failure is fatal. Individual order creation failures are
/// logged and skipped; only creating zero orders is fatal. The returned
/// snapshot contains exactly the orders that exist on the service.
pub async fn seed<A: OrderApi + ?Sized>(
    api: &A,
    scenario: &ScenarioConfig,
) -> Result<SeedSnapshot, ScenarioError> {
    info!("Seed phase: creating contended partner and order batch");

    let partner_request = PartnerRequest {
        name: format!("partner-contention-{}", Uuid::new_v4().simple()),
        credit_limit: scenario.initial_credit,
        current_credit: scenario.initial_credit,
    };
    let partner = api
        .create_partner(&partner_request)
        .await
        .map_err(ScenarioError::PartnerCreation)?;
    info!(
        partner_id = partner.id,
        initial_credit = partner.current_credit,
        "Seed phase: partner created"
    );

    let mut order_ids = Vec::with_capacity(scenario.order_count);
    for seq in 0..scenario.order_count {
        let request = OrderRequest {
            partner_id: partner.id,
            items: vec![OrderItemRequest {
                product: "contention-product".to_string(),
                quantity: 1,
                unit_price: scenario.order_unit_value,
            }],
        };

        match api.create_order(&request).await {
            Ok(order) => order_ids.push(order.id),
            Err(err) => warn!(seq, error = %err, "Seed phase: order creation failed, skipping"),
        }
    }

    if order_ids.is_empty() {
        return Err(ScenarioError::NoOrdersSeeded);
    }

    info!(
        orders = order_ids.len(),
        requested = scenario.order_count,
        unit_value = scenario.order_unit_value,
        "Seed phase: complete"
    );

    Ok(SeedSnapshot {
        partner_id: partner.id,
        initial_credit: partner.current_credit,
        order_ids,
        order_unit_value: scenario.order_unit_value,
    })
}
