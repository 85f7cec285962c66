use std::fmt;
use std::future::Future;
use std::str::FromStr;

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue};

use crate::data_models::{SearchQuery, SearchResponse};
use crate::error::{ConfigError, SearchError};

/// Performs the single read request behind a search.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// The endpoint flavours the backend exposes for product lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVariant {
    /// `{error}`, `{message}` or `{products, best_product}`.
    Search,
    /// Bare array of products.
    Products,
    /// Bare array keyed on the scrape keyword, or `{message}`/`{error}`.
    KeywordData,
}

impl ApiVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVariant::Search => "search",
            ApiVariant::Products => "products",
            ApiVariant::KeywordData => "keyword-data",
        }
    }

    pub fn default_path(&self) -> &'static str {
        match self {
            ApiVariant::Search => "/api/search/",
            ApiVariant::Products => "/api/products/",
            ApiVariant::KeywordData => "/api/get_keyword_data/",
        }
    }

    pub fn query_param(&self) -> &'static str {
        match self {
            ApiVariant::Search => "query",
            ApiVariant::Products => "search",
            ApiVariant::KeywordData => "keyword",
        }
    }
}

impl FromStr for ApiVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(ApiVariant::Search),
            "products" => Ok(ApiVariant::Products),
            "keyword-data" | "keyword_data" => Ok(ApiVariant::KeywordData),
            other => Err(ConfigError::UnknownApi(other.to_string())),
        }
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    variant: ApiVariant,
    path: String,
}

impl Endpoint {
    pub fn new(base_url: &str, variant: ApiVariant) -> Result<Endpoint, ConfigError> {
        let base = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Endpoint {
            base,
            variant,
            path: variant.default_path().to_string(),
        })
    }

    pub fn with_path(mut self, path: &str) -> Endpoint {
        self.path = path.to_string();
        self
    }

    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full request URL for `query`, with the query form-encoded.
    pub fn url_for(&self, query: &SearchQuery) -> Url {
        let mut url = self.base.clone();
        url.set_path(&self.path);
        url.query_pairs_mut()
            .clear()
            .append_pair(self.variant.query_param(), query.as_str());
        url
    }
}

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpBackend {
    pub fn new(client: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }
}

impl SearchBackend for HttpBackend {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let url = self.endpoint.url_for(query);
        tracing::info!(%url, "searching products");

        let res = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        // the backend reports `{message}` with 404 and `{error}` with 4xx/5xx,
        // so the body is decoded whatever the status
        let status = res.status();
        let body = res.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "search response received");

        SearchResponse::from_slice(&body)
    }
}

#[test]
fn test_url_for_encodes_query() {
    let endpoint = Endpoint::new("http://127.0.0.1:8000", ApiVariant::Search).unwrap();
    let query = SearchQuery::parse(" red shoes & socks ").unwrap();
    assert_eq!(
        endpoint.url_for(&query).as_str(),
        "http://127.0.0.1:8000/api/search/?query=red+shoes+%26+socks"
    );

    let endpoint = Endpoint::new("http://shop.local/", ApiVariant::Products).unwrap();
    let query = SearchQuery::parse("gpu").unwrap();
    assert_eq!(
        endpoint.url_for(&query).as_str(),
        "http://shop.local/api/products/?search=gpu"
    );

    let endpoint = Endpoint::new("http://shop.local", ApiVariant::KeywordData)
        .unwrap()
        .with_path("/product_hunt/api/get_keyword_data/");
    assert_eq!(
        endpoint.url_for(&query).as_str(),
        "http://shop.local/product_hunt/api/get_keyword_data/?keyword=gpu"
    );
}

#[test]
fn test_api_variant_parse() {
    assert_eq!("search".parse::<ApiVariant>().unwrap(), ApiVariant::Search);
    assert_eq!(" Products ".parse::<ApiVariant>().unwrap(), ApiVariant::Products);
    assert_eq!(
        "keyword_data".parse::<ApiVariant>().unwrap(),
        ApiVariant::KeywordData
    );
    assert!("soap".parse::<ApiVariant>().is_err());
    assert!(Endpoint::new("not a url", ApiVariant::Search).is_err());
}
