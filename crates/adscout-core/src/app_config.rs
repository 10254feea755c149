#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub meta_access_token: Option<String>,
    pub meta_api_version: String,
    pub meta_api_base_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub page_size: u32,
    pub max_attempts: u32,
    pub retry_base_secs: u64,
    pub retry_max_delay_secs: u64,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Full URL of the `ads_archive` endpoint for the configured API version.
    #[must_use]
    pub fn ads_archive_url(&self) -> String {
        format!(
            "{}/{}/ads_archive",
            self.meta_api_base_url.trim_end_matches('/'),
            self.meta_api_version.trim_matches('/')
        )
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("log_level", &self.log_level)
            .field(
                "meta_access_token",
                &self.meta_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("meta_api_version", &self.meta_api_version)
            .field("meta_api_base_url", &self.meta_api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("max_attempts", &self.max_attempts)
            .field("retry_base_secs", &self.retry_base_secs)
            .field("retry_max_delay_secs", &self.retry_max_delay_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
