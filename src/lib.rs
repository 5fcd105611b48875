pub mod api;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod metrics;
pub mod store;
pub mod utils;
