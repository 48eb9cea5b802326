use karakeep_api::{ClientConfig, KarakeepClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "ak1_test_key";

/// A client against the given mock server, with throttling and retries
/// disabled.
pub fn test_client(mock_server: &MockServer) -> KarakeepClient {
    let mut config = ClientConfig::new(mock_server.uri(), TEST_API_KEY);
    config.request_throttling = 0;
    config.max_retries = 0;
    KarakeepClient::new(&config).unwrap()
}

/// A minimal link bookmark as returned by the bookmark endpoints.
pub fn bookmark_json(id: &str, url: &str, archived: bool) -> Value {
    json!({
        "id": id,
        "createdAt": "2024-05-01T10:00:00.000Z",
        "modifiedAt": null,
        "title": format!("Title of {id}"),
        "archived": archived,
        "favourited": false,
        "taggingStatus": "success",
        "tags": [],
        "content": {
            "type": "link",
            "url": url,
        },
        "assets": [],
    })
}
