//! External API integrations

pub mod gateway;

pub use gateway::GatewayClient;
