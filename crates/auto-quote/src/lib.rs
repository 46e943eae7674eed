//! Financing quotes and vehicle matching for car shoppers.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
