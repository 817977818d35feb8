// Application layer - Chart use cases and the ports they depend on
pub mod aggregation;
pub mod axis;
pub mod chart_service;
pub mod error;
pub mod panel;
pub mod path_builder;
pub mod scale;
pub mod sensor_repository;
pub mod token_store;
