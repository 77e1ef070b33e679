pub mod config;
pub mod gateways;
pub mod hendelse;
pub mod logging;
pub mod repositories;
