use thiserror::Error;

/// Errors returned by the Ad Library client.
#[derive(Debug, Error)]
pub enum MetaError {
    /// No access token was configured; raised before any request is made.
    #[error("missing Ad Library access token; set META_ACCESS_TOKEN")]
    MissingAccessToken,

    /// The API answered with a 4xx/5xx status. `body` holds at most the
    /// first 300 characters of the response text.
    #[error("Ad Library API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A base or continuation URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
