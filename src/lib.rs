//! Agricultural guidance from weather observations and forecasts.
//!
//! The pipeline derives field metrics ([`metrics`]), reduces the 3-hourly
//! forecast to daily summaries ([`forecast`]), classifies the current climate
//! ([`climate`]), produces recommendations with a deterministic fallback
//! ([`recommendation`]) and composes alerts ([`alerts`]). [`service`] exposes
//! it as an MCP server.

pub mod alerts;
pub mod client;
pub mod climate;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod formatters;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod recommendation;
pub mod service;
