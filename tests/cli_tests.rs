//! Runs the compiled binary and checks what reaches the terminal on failure

use std::process::Output;
use tempfile::tempdir;
use tokio::process::Command;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn run_binary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fixture_forecast"))
        .args(args)
        .env_clear()
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_config_error_printed_once() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    tokio::fs::write(&config_path, "api_key = \"k\"\ntimezone = \"Mars/Olympus\"\n")
        .await
        .unwrap();

    let output = run_binary(&["--config", &config_path.to_string_lossy()]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert_eq!(stderr.matches("Mars/Olympus").count(), 1, "stderr: {stderr}");
    assert!(!stderr.contains("Config("), "stderr: {stderr}");
}

#[tokio::test]
async fn test_report_failure_printed_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let log_path = dir.path().join("forecast.log");
    let config = format!(
        "api_key = \"k\"\napi_base_url = \"{}\"\nretry_attempts = 0\n",
        server.uri()
    );
    tokio::fs::write(&config_path, config).await.unwrap();

    let output = run_binary(&[
        "--config",
        &config_path.to_string_lossy(),
        "--log-file",
        &log_path.to_string_lossy(),
        "--date",
        "2024-05-01",
        "--quiet",
    ])
    .await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert_eq!(
        stderr.matches("returned an error").count(),
        1,
        "stderr: {stderr}"
    );
    assert!(!stderr.contains("ApiServerError"), "stderr: {stderr}");
}
