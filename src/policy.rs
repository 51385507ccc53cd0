pub mod actor;
pub mod config;
pub mod gates;

pub use actor::Actor;
pub use config::PosConfig;
pub use gates::{GateResult, PolicyEngine};
