//! Client core for the Health Chains dashboard: gateway access, wallet-signed
//! consent workflow, race-safe list views and identifier rendering.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod constant;
pub mod display;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use utils::errors::{DashboardError, Result};
