//! HTTP client functionality for Stampede
//!
//! This crate provides a typed client for the partner/order approval service
//! the harness drives. The [`OrderApi`] trait is the seam the scenario engine
//! depends on; [`ApiClient`] is its reqwest-backed implementation.

pub mod client;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{ApiClient, OrderApi};
pub use errors::HttpError;
pub use types::{
    ApiErrorBody, Order, OrderItemRequest, OrderRequest, OrderStatus, Partner, PartnerRequest,
    StatusTransition,
};
