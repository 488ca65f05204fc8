//! Identity federation orchestration.

pub mod exchanger;

pub use exchanger::{
    engine_available, EngineLoginExchange, FederateError, FederationExchanger, FederationOutcome,
};
