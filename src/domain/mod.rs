pub mod aggregate;
pub mod allocation;
pub mod analysis;
pub mod catalog;
pub mod config_validation;
pub mod error;
pub mod metrics;
pub mod returns;
pub mod risk;
pub mod stats;
