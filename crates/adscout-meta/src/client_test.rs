use adscout_core::ActiveStatus;

use super::*;

fn test_client(endpoint: &str) -> MetaClient {
    MetaClient::with_endpoint("test-token", 30, "adscout-test/0.1", endpoint)
        .expect("client construction should not fail")
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[test]
fn blank_token_is_rejected_before_any_request() {
    let result = MetaClient::with_endpoint("  ", 30, "ua", "http://127.0.0.1:1/ads_archive");
    assert!(matches!(result, Err(MetaError::MissingAccessToken)));
}

#[test]
fn invalid_endpoint_is_rejected() {
    let result = MetaClient::with_endpoint("token", 30, "ua", "not a url");
    assert!(matches!(result, Err(MetaError::InvalidUrl { .. })));
}

#[test]
fn search_url_carries_every_parameter() {
    let client = test_client("https://graph.facebook.com/v23.0/ads_archive");
    let query = AdQuery {
        countries: vec!["BE".to_owned(), "NL".to_owned()],
        terms: Some("dumbbell".to_owned()),
        status: ActiveStatus::All,
        ..AdQuery::default()
    };
    let url = client.build_search_url(&query);

    assert_eq!(url.path(), "/v23.0/ads_archive");
    assert_eq!(query_value(&url, "access_token").as_deref(), Some("test-token"));
    assert_eq!(query_value(&url, "limit").as_deref(), Some("100"));
    assert_eq!(
        query_value(&url, "ad_reached_countries").as_deref(),
        Some(r#"["BE","NL"]"#)
    );
    assert_eq!(query_value(&url, "ad_type").as_deref(), Some("ALL"));
    assert_eq!(query_value(&url, "ad_active_status").as_deref(), Some("ALL"));
    assert_eq!(query_value(&url, "search_terms").as_deref(), Some("dumbbell"));
    assert_eq!(
        query_value(&url, "search_type").as_deref(),
        Some("KEYWORD_UNORDERED")
    );

    let fields = query_value(&url, "fields").expect("fields param");
    assert!(fields.starts_with("id,page_id,page_name,"));
    assert!(fields.ends_with("languages,publisher_platforms"));
}

#[test]
fn search_url_sends_empty_terms_when_absent() {
    let client = test_client("https://graph.facebook.com/v23.0/ads_archive");
    let url = client.build_search_url(&AdQuery::default());
    assert_eq!(query_value(&url, "search_terms").as_deref(), Some(""));
    assert_eq!(query_value(&url, "ad_active_status").as_deref(), Some("ACTIVE"));
    assert_eq!(query_value(&url, "ad_reached_countries").as_deref(), Some("[]"));
}

#[test]
fn page_size_override_is_applied() {
    let client = test_client("https://graph.facebook.com/v23.0/ads_archive").with_page_size(25);
    let url = client.build_search_url(&AdQuery::default());
    assert_eq!(query_value(&url, "limit").as_deref(), Some("25"));
}

#[test]
fn error_bodies_are_truncated_to_300_chars() {
    let long = "é".repeat(500);
    let truncated = truncate_body(&long);
    assert_eq!(truncated.chars().count(), 300);
    assert_eq!(truncate_body("short"), "short");
}
