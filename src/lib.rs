//! Compras Gateway - API gateway for the shopping-list microservices
//!
//! This library provides the core functionality for the gateway process:
//! service registry with background health polling, per-service circuit
//! breaking, and reverse proxying to the user/item/list/media services.

pub mod api;
pub mod breaker;
pub mod cli;
pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod registry;
