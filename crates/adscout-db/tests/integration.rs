//! Offline unit tests for adscout-db pool configuration and row types.
//! These tests do not require a database connection.

use adscout_core::AppConfig;
use adscout_db::{ExportRow, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "sqlite://ads.db".to_string(),
        log_level: "info".to_string(),
        meta_access_token: None,
        meta_api_version: "v23.0".to_string(),
        meta_api_base_url: "https://graph.facebook.com".to_string(),
        http_timeout_secs: 60,
        user_agent: "ua".to_string(),
        page_size: 100,
        max_attempts: 5,
        retry_base_secs: 1,
        retry_max_delay_secs: 30,
        db_max_connections: 42,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn export_row_decodes_platform_list() {
    let row = ExportRow {
        ad_id: "1".to_string(),
        page_name: None,
        ad_delivery_start_time: None,
        ad_delivery_stop_time: None,
        publisher_platforms_json: r#"["facebook","messenger"]"#.to_string(),
        title: None,
        body: None,
        score: None,
        ad_snapshot_url: None,
    };

    assert_eq!(row.publisher_platforms(), vec!["facebook", "messenger"]);
}
