//! Common test utilities for mocked DailyMed API tests

use dailymed_client::{ClientConfig, DailyMedClient, RetryConfig};
use std::time::Duration;

/// Build the JSON body of one `spls.json` page.
#[allow(dead_code)]
pub fn spl_page_body(setids: &[&str], next_page_url: Option<&str>) -> String {
    let data: Vec<String> = setids
        .iter()
        .map(|id| {
            format!(
                r#"{{"spl_version":2,"published_date":"Feb 02, 2021","title":"LABEL {id}","setid":"{id}"}}"#
            )
        })
        .collect();
    let next = match next_page_url {
        Some(url) => format!(r#""{url}""#),
        None => "null".to_string(),
    };

    format!(
        r#"{{
            "metadata": {{
                "total_elements": {},
                "elements_per_page": 100,
                "current_page": 1,
                "next_page_url": {}
            }},
            "data": [{}]
        }}"#,
        setids.len(),
        next,
        data.join(",")
    )
}

/// Client pointing at the mock server with retries disabled, so tests can
/// assert on the first response.
pub fn create_test_client(base_url: &str) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_retry_config(RetryConfig::disabled());
    DailyMedClient::with_config(config)
}

/// Client pointing at the mock server with a fast retry policy.
#[allow(dead_code)]
pub fn create_retrying_test_client(base_url: &str) -> DailyMedClient {
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_retry_config(RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        });
    DailyMedClient::with_config(config)
}
