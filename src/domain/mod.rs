//! Core domain types and logic.

pub mod trade;
pub mod normalize;
pub mod analytics;
pub mod stats;
pub mod calculations;
pub mod filter;
pub mod validation;
pub mod config_validation;
pub mod error;
