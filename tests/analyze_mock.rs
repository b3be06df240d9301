use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SALES_CSV: &str = "\
region,amount
west,100
east,250
west,75
";

const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn mock_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            {
                "content": {
                    "parts": [
                        {
                            "text": text
                        }
                    ],
                    "role": "model"
                },
                "finishReason": "STOP"
            }
        ]
    })
}

#[tokio::test]
async fn test_analyze_prints_insights_and_writes_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_response("Sales look strong.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("sales.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();
    let report_path = dir.path().join("report.pdf");

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", mock_server.uri())
        .args([
            "analyze",
            csv_path.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
        ])
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sales look strong."))
        .stdout(predicate::str::contains("Chat ended."))
        .stdout(predicate::str::contains("Report saved to"));

    let bytes = fs::read(&report_path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("(InsightPulse Report) Tj"));
}

#[tokio::test]
async fn test_analyze_chat_answers_and_skips_blank_lines() {
    let mock_server = MockServer::start().await;

    // One insight call plus one chat call; blank lines must not reach the
    // server.
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("The west region.")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("sales.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", mock_server.uri())
        .args(["analyze", csv_path.to_str().unwrap(), "--no-report"])
        .write_stdin("\n\nWhich region leads?\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gemini: The west region."));
}

#[tokio::test]
async fn test_analyze_survives_server_error_with_placeholder_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("sales.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();
    let report_path = dir.path().join("report.pdf");

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", mock_server.uri())
        .args([
            "analyze",
            csv_path.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
        ])
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not generate insights:"));

    let text = String::from_utf8_lossy(&fs::read(&report_path).unwrap()).into_owned();
    assert!(text.contains("insight summary unavailable"));
}

#[tokio::test]
async fn test_analyze_model_override_hits_overridden_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("Insights.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("sales.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", mock_server.uri())
        .args([
            "analyze",
            csv_path.to_str().unwrap(),
            "--model",
            "gemini-2.0-flash",
            "--no-report",
        ])
        .write_stdin(":q\n")
        .assert()
        .success();
}

#[tokio::test]
async fn test_bare_file_argument_defaults_to_analyze() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_response("Insights.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("sales.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", mock_server.uri())
        .args([csv_path.to_str().unwrap(), "--no-report"])
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Insights."));
}

#[test]
fn test_analyze_requires_api_key() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("sales.csv");
    fs::write(&csv_path, SALES_CSV).unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .env_remove("GEMINI_API_KEY")
        .args(["analyze", csv_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}
