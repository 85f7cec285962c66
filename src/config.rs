use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;

use crate::client::{ApiVariant, Endpoint};
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        base_url: get_env_or_default("PRODUCT_HUNT_BASE_URL", DEFAULT_BASE_URL),
        api: get_env_or_default("PRODUCT_HUNT_API", ApiVariant::Search.as_str()),
        api_path: env::var("PRODUCT_HUNT_API_PATH").ok(),
        listen_addr: get_env_or_default("PRODUCT_HUNT_LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api: String,
    pub api_path: Option<String>,
    pub listen_addr: String,
}

impl Config {
    /// Resolve the backend endpoint this configuration points at.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let variant: ApiVariant = self.api.parse()?;
        let endpoint = Endpoint::new(&self.base_url, variant)?;
        Ok(match &self.api_path {
            Some(path) if !path.trim().is_empty() => endpoint.with_path(path.trim()),
            _ => endpoint,
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr {
                addr: self.listen_addr.clone(),
                source,
            })
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[test]
fn test_endpoint_from_config() {
    let config = Config {
        base_url: "http://shop.local:8000".to_string(),
        api: "products".to_string(),
        api_path: None,
        listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
    };
    let endpoint = config.endpoint().unwrap();
    assert_eq!(endpoint.variant(), ApiVariant::Products);
    assert_eq!(endpoint.path(), "/api/products/");

    let overridden = Config {
        api_path: Some("/product_hunt/api/search/".to_string()),
        api: "search".to_string(),
        ..config.clone()
    };
    assert_eq!(
        overridden.endpoint().unwrap().path(),
        "/product_hunt/api/search/"
    );

    let unknown = Config {
        api: "graphql".to_string(),
        ..config.clone()
    };
    assert!(matches!(
        unknown.endpoint(),
        Err(ConfigError::UnknownApi(name)) if name == "graphql"
    ));

    let bad_addr = Config {
        listen_addr: "not-an-addr".to_string(),
        ..config
    };
    assert!(bad_addr.listen_addr().is_err());
}
