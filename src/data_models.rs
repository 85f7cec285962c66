use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// Text shown in place of product rows when a search comes back empty.
pub const NO_RESULTS_MESSAGE: &str = "No products found";

/// A user query, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` when the input is blank after trimming.
    pub fn parse(raw: &str) -> Option<SearchQuery> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(SearchQuery(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field the backend may send as either a JSON number or a string.
/// Numbers keep their textual form, so `10` renders as `10` and `0.8` as `0.8`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Number(n) => write!(f, "{n}"),
            DisplayValue::Text(s) => f.write_str(s),
        }
    }
}

/// Source website of a listing: nested `{name, url}`, a bare name, or the
/// foreign key the backend's model serializer emits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Website {
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Plain(String),
    Id(u64),
}

impl fmt::Display for Website {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Website::Named { name, .. } => f.write_str(name),
            Website::Plain(name) => f.write_str(name),
            Website::Id(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductResult {
    pub name: String,
    pub website: Website,
    pub price: DisplayValue,
    #[serde(alias = "review_count", alias = "reviewCount")]
    pub reviews: DisplayValue,
    #[serde(alias = "sentimentScore")]
    pub sentiment_score: DisplayValue,
}

impl ProductResult {
    /// The five display columns, in table order.
    pub fn columns(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.website.to_string(),
            self.price.to_string(),
            self.reviews.to_string(),
            self.sentiment_score.to_string(),
        ]
    }
}

/// Every response shape the search endpoints produce.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum SearchResponse {
    Error(String),
    Message(String),
    Products {
        products: Vec<ProductResult>,
        best_product: Option<ProductResult>,
    },
    List(Vec<ProductResult>),
}

impl SearchResponse {
    pub fn from_slice(body: &[u8]) -> Result<SearchResponse, SearchError> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    products: Option<Vec<ProductResult>>,
    #[serde(default)]
    best_product: Option<ProductResult>,
}

impl TryFrom<Value> for SearchResponse {
    type Error = serde_json::Error;

    // branch on the JSON kind first: a derived struct would also accept an
    // array positionally
    fn try_from(value: Value) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = match value {
            Value::Array(_) => return Ok(SearchResponse::List(serde_json::from_value(value)?)),
            Value::Object(_) => serde_json::from_value(value)?,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a JSON object or array, found {other}"
                )));
            }
        };

        // empty strings are treated as absent, matching the page script's checks
        if let Some(error) = envelope.error.filter(|e| !e.is_empty()) {
            return Ok(SearchResponse::Error(error));
        }
        if let Some(message) = envelope.message.filter(|m| !m.is_empty()) {
            return Ok(SearchResponse::Message(message));
        }
        match envelope.products {
            Some(products) => Ok(SearchResponse::Products {
                products,
                best_product: envelope.best_product,
            }),
            None => Err(serde_json::Error::custom(
                "expected one of `error`, `message` or `products`",
            )),
        }
    }
}

#[test]
fn test_search_query_trims() {
    assert_eq!(SearchQuery::parse("  shoes \n").unwrap().as_str(), "shoes");
    assert!(SearchQuery::parse("").is_none());
    assert!(SearchQuery::parse(" \t\n ").is_none());
}

#[test]
fn test_display_value_keeps_number_text() {
    let values: Vec<DisplayValue> = serde_json::from_str(r#"[10, 0.8, "$ 19.99", -3]"#).unwrap();
    let shown: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    assert_eq!(shown, vec!["10", "0.8", "$ 19.99", "-3"]);
}
