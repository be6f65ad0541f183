pub mod chart;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod geo;
pub mod munge;
