//! Chart-ready sensor telemetry for the marketplace backend.
//!
//! Readings are fetched from the marketplace REST API, decoded once per
//! record, bucketed by time window and mapped onto a fixed drawing surface.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
