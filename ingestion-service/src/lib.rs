//! Ingestion Service - bank payout file ingestion and reconciliation engine.

pub mod config;
pub mod ingestion;
pub mod models;
pub mod services;
