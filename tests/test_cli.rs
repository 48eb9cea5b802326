mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::tempdir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_stats() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u_1",
            "name": "Test User",
            "email": "test@example.com",
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/me/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numBookmarks": 42,
            "numHighlights": 7,
        })))
        .mount(&mock_server)
        .await;

    let temp_dir = tempdir().unwrap();
    let settings = json!({
        "base_url": null,
        "request_timeout": 60000,
        "request_throttling": 0,
        "max_retries": 0,
        "page_size": 100,
    });
    fs::write(
        temp_dir.path().join("settings.json"),
        settings.to_string(),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("karakeep").unwrap();
    cmd.env("KARAKEEP_HOME", temp_dir.path());
    cmd.env("KARAKEEP_API_KEY", common::TEST_API_KEY);
    cmd.env("KARAKEEP_BASE_URL", mock_server.uri());
    cmd.env("NO_COLOR", "1");
    cmd.arg("stats");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Bookmarks: 42"))
        .stdout(predicate::str::contains("Highlights: 7"))
        .stdout(predicate::str::contains("Test User"));
}

#[tokio::test]
async fn test_stats_missing_api_key() {
    let temp_dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("karakeep").unwrap();
    cmd.env("KARAKEEP_HOME", temp_dir.path());
    cmd.env_remove("KARAKEEP_API_KEY");
    cmd.env("KARAKEEP_BASE_URL", "https://karakeep.example.com");
    cmd.arg("stats");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}
