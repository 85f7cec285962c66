use thiserror::Error;

pub const EMPTY_QUERY_ALERT: &str = "Please enter a product name";
pub const TRANSPORT_ALERT: &str = "An error occurred while fetching data. Please try again later.";

/// Why a search request could not produce a usable response.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcomes the panel surfaces to the user as an alert.
///
/// `Display` is the user-facing text; the transport detail stays reachable
/// through `source()` for diagnostics.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("{}", EMPTY_QUERY_ALERT)]
    EmptyQuery,

    #[error("Error: {0}")]
    Application(String),

    #[error("{}", TRANSPORT_ALERT)]
    Transport(#[source] SearchError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unknown api variant '{0}' (expected search, products or keyword-data)")]
    UnknownApi(String),

    #[error("invalid listen address '{addr}': {source}")]
    InvalidListenAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}
