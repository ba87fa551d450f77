/*
[INPUT]:  HTTP client configuration and task endpoints
[OUTPUT]: HTTP responses and typed task results
[POS]:    HTTP layer - REST communication with the task backend
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod tasks;

pub use client::{ClientConfig, DEFAULT_BASE_URL, TaskClient};
pub use error::{ErrorKind, GatewayError, Operation, Result};
