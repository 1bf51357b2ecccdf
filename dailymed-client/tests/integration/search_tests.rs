//! Integration tests for drug name search against a mocked DailyMed API.

mod common;

use common::{create_retrying_test_client, create_test_client, spl_page_body};
use dailymed_client::DailyMedError;
use rstest::rstest;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[traced_test]
async fn test_search_returns_setids_in_service_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .and(query_param("drug_name", "ibuprofen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(spl_page_body(&["a1", "a2", "a3"], None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let setids = client.resolve_setids("ibuprofen", 3).await.unwrap();

    assert_eq!(setids, vec!["a1", "a2", "a3"]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[tokio::test]
async fn test_search_truncates_to_limit(#[case] limit: usize) {
    let mock_server = MockServer::start().await;

    // The service may return more entries than requested; the client keeps
    // only the first `limit`.
    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(spl_page_body(&["a1", "a2", "a3", "a4"], None)),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let setids = client.resolve_setids("ibuprofen", limit).await.unwrap();

    assert_eq!(setids.len(), limit);
    assert_eq!(setids[0], "a1");
}

#[tokio::test]
async fn test_search_follows_pagination_until_limit() {
    let mock_server = MockServer::start().await;

    let next_url = format!(
        "{}/services/v2/spls.json?drug_name=ibuprofen&pagesize=4&page=2",
        mock_server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(spl_page_body(&["a1", "a2"], Some(&next_url))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(spl_page_body(&["a3", "a4"], None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let setids = client.resolve_setids("ibuprofen", 4).await.unwrap();

    assert_eq!(setids, vec!["a1", "a2", "a3", "a4"]);
}

#[tokio::test]
async fn test_search_stops_at_last_page_below_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(spl_page_body(&["a1", "a2"], None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let setids = client.resolve_setids("ibuprofen", 10).await.unwrap();

    assert_eq!(setids, vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_search_with_no_matches_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .and(query_param("drug_name", "unknownxyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(spl_page_body(&[], None)))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let setids = client.resolve_setids("unknownxyz", 3).await.unwrap();

    assert!(setids.is_empty());
}

#[tokio::test]
async fn test_search_skips_entries_without_setid() {
    let mock_server = MockServer::start().await;

    let body = r#"{
        "metadata": {"total_elements": 2, "next_page_url": null},
        "data": [
            {"setid": "", "title": "BROKEN ENTRY"},
            {"setid": "a1", "title": "LABEL a1"}
        ]
    }"#;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let setids = client.resolve_setids("ibuprofen", 3).await.unwrap();

    assert_eq!(setids, vec!["a1"]);
}

#[tokio::test]
#[traced_test]
async fn test_search_non_success_status_is_lookup_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let err = client.resolve_setids("ibuprofen", 3).await.unwrap_err();

    assert!(matches!(err, DailyMedError::LookupError { .. }));
    assert_eq!(err.kind(), "LookupError");
}

#[tokio::test]
async fn test_search_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let err = client.resolve_setids("ibuprofen", 3).await.unwrap_err();

    assert!(matches!(err, DailyMedError::ParseError(_)));
    assert_eq!(err.kind(), "ParseError");
}

#[tokio::test]
async fn test_search_retries_transient_server_errors() {
    let mock_server = MockServer::start().await;

    // Two 503 responses, then a healthy page.
    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(spl_page_body(&["a1"], None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_retrying_test_client(&mock_server.uri());

    let setids = client.resolve_setids("ibuprofen", 1).await.unwrap();

    assert_eq!(setids, vec!["a1"]);
}

#[tokio::test]
async fn test_search_gives_up_when_server_errors_persist() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/v2/spls.json"))
        .respond_with(ResponseTemplate::new(500))
        // Initial attempt plus three retries.
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = create_retrying_test_client(&mock_server.uri());

    let err = client.resolve_setids("ibuprofen", 1).await.unwrap_err();

    assert_eq!(err.kind(), "LookupError");
}
