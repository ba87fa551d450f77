/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public task backend adapter surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod gateway;
pub mod http;
pub mod types;

pub use gateway::TaskGateway;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    DEFAULT_BASE_URL,
    ErrorKind,
    GatewayError,
    Operation,
    Result,
    TaskClient,
};

// Re-export all types
pub use types::*;
