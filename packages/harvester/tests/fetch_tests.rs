//! Edition fetch behavior against a local mock server.

use chrono::NaiveDate;
use gazette_harvester::edition::fetch_edition_text_from;
use gazette_harvester::error::HarvesterError;
use gazette_harvester::http::{create_client, download_bytes};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 16).expect("valid date")
}

#[tokio::test]
async fn test_missing_edition_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/do/2025/03_Mar/16.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/do/2025/03_Mar/16.pdf", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        fetch_edition_text_from(&client, &url, test_date())
    })
    .await
    .expect("task completed");

    assert!(matches!(result, Ok(None)), "404 should map to absent edition");
}

#[tokio::test]
async fn test_unreadable_pdf_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/do/2025/03_Mar/16.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not a pdf at all".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/do/2025/03_Mar/16.pdf", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        fetch_edition_text_from(&client, &url, test_date())
    })
    .await
    .expect("task completed");

    assert!(
        matches!(result, Ok(None)),
        "corrupt PDF should map to absent edition"
    );
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = format!("{}/do/2025/03_Mar/16.pdf", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        download_bytes(&client, &url)
    })
    .await
    .expect("task completed");

    assert!(matches!(
        result,
        Err(HarvesterError::RetriesExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_successful_download_returns_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/do/2025/03_Mar/16.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 payload".to_vec()))
        .mount(&server)
        .await;

    let url = format!("{}/do/2025/03_Mar/16.pdf", server.uri());
    let result = tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        download_bytes(&client, &url)
    })
    .await
    .expect("task completed");

    assert_eq!(result.expect("download succeeded"), b"%PDF-1.4 payload");
}
