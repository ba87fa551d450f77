/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskdeck-adapter tests

use serde_json::{Value, json};
use taskdeck_adapter::TaskClient;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> TaskClient {
    TaskClient::with_base_url(&server.uri()).expect("client init")
}

/// Backend JSON for a task with one execution per output
pub fn task_json(id: &str, name: &str, outputs: &[&str]) -> Value {
    let executions: Vec<Value> = outputs
        .iter()
        .enumerate()
        .map(|(idx, output)| {
            json!({
                "startTime": format!("2025-10-19T10:0{idx}:00"),
                "endTime": format!("2025-10-19T10:0{idx}:30"),
                "output": output,
            })
        })
        .collect();
    json!({
        "id": id,
        "name": name,
        "owner": "Jane Doe",
        "command": "df -h /mnt/data",
        "taskExecutions": executions,
    })
}
