//! HTTP host for the capacity scenario calculator
//!
//! Thin service layer over `planner-lib`: keeps the infrastructure
//! snapshot behind a read/write lock, exposes the snapshot and
//! comparison endpoints, and wires in health probes, Prometheus
//! metrics and structured logging.

pub mod api;
pub mod config;
pub mod health;
pub mod observability;
