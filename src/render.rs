use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};
use html5ever::{LocalName, Namespace, QualName};

use crate::data_models::ProductResult;
use crate::panel::{ResultSet, UiState};

pub const COLUMN_HEADERS: [&str; 5] = ["Product", "Website", "Price", "Reviews", "Sentiment Score"];
pub const LOADING_TEXT: &str = "Loading...";

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Product([String; 5]),
    /// Spans all columns; used when nothing matched.
    Placeholder(String),
}

/// The best product's five fields, labelled for the highlight block.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub fields: [(&'static str, String); 5],
}

impl Highlight {
    pub fn new(product: &ProductResult) -> Highlight {
        let [name, website, price, reviews, sentiment] = product.columns();
        Highlight {
            fields: [
                ("Product", name),
                ("Website", website),
                ("Price", price),
                ("Reviews", reviews),
                ("Sentiment Score", sentiment),
            ],
        }
    }
}

/// Everything the panel shows for one state. At most one of the loading
/// indicator, the results table and the error message is present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelView {
    pub loading: bool,
    pub rows: Vec<Row>,
    pub highlight: Option<Highlight>,
    pub error: Option<String>,
}

pub fn render(state: &UiState) -> PanelView {
    match state {
        UiState::Idle => PanelView::default(),
        UiState::Loading { .. } => PanelView {
            loading: true,
            ..PanelView::default()
        },
        UiState::ResultsShown(ResultSet::Empty { message }) => PanelView {
            rows: vec![Row::Placeholder(message.clone())],
            ..PanelView::default()
        },
        UiState::ResultsShown(ResultSet::Products {
            products,
            best_product,
        }) => PanelView {
            rows: products.iter().map(|p| Row::Product(p.columns())).collect(),
            highlight: best_product.as_ref().map(Highlight::new),
            ..PanelView::default()
        },
        UiState::ErrorShown { message } => PanelView {
            error: Some(message.clone()),
            ..PanelView::default()
        },
    }
}

impl PanelView {
    pub fn shows_table(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn to_html(&self) -> String {
        to_html_string(self)
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.loading {
            out.push_str(LOADING_TEXT);
            out.push('\n');
        }
        if let Some(error) = &self.error {
            out.push_str(error);
            out.push('\n');
        }
        if self.shows_table() {
            out.push_str(&COLUMN_HEADERS.join(" | "));
            out.push('\n');
            for row in &self.rows {
                match row {
                    Row::Product(cells) => out.push_str(&cells.join(" | ")),
                    Row::Placeholder(message) => out.push_str(message),
                }
                out.push('\n');
            }
        }
        if let Some(highlight) = &self.highlight {
            out.push_str("\nBest Product\n");
            for (label, value) in &highlight.fields {
                out.push_str(&format!("{label}: {value}\n"));
            }
        }
        out
    }
}

/// Serialize any html5ever-serializable value into a string.
pub fn to_html_string<T: Serialize>(node: &T) -> String {
    let mut buf = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..SerializeOpts::default()
    };
    if let Err(e) = serialize(&mut buf, node, opts) {
        tracing::warn!(error = %e, "failed to serialize html");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NS), LocalName::from(local))
}

fn attr_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(local))
}

/// Writes `<tag attrs...>`, the children emitted by `body`, then `</tag>`.
/// Text handed to the serializer is escaped by it.
pub fn element<S, F>(s: &mut S, tag: &str, attrs: &[(&str, &str)], body: F) -> io::Result<()>
where
    S: Serializer,
    F: FnOnce(&mut S) -> io::Result<()>,
{
    let name = html_name(tag);
    let attrs: Vec<(QualName, &str)> = attrs.iter().map(|(k, v)| (attr_name(k), *v)).collect();
    s.start_elem(name.clone(), attrs.iter().map(|(k, v)| (k, *v)))?;
    body(s)?;
    s.end_elem(name)
}

pub fn text_element<S: Serializer>(
    s: &mut S,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> io::Result<()> {
    element(s, tag, attrs, |s| s.write_text(text))
}

impl Serialize for PanelView {
    fn serialize<S>(&self, serializer: &mut S, _traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        element(serializer, "div", &[("id", "search-panel")], |s| {
            if self.loading {
                text_element(s, "div", &[("id", "loading")], LOADING_TEXT)?;
            }
            if let Some(error) = &self.error {
                text_element(s, "div", &[("id", "error-message")], error)?;
            }
            if self.shows_table() {
                write_table(s, &self.rows)?;
            }
            if let Some(highlight) = &self.highlight {
                write_highlight(s, highlight)?;
            }
            Ok(())
        })
    }
}

fn write_table<S: Serializer>(s: &mut S, rows: &[Row]) -> io::Result<()> {
    element(s, "table", &[("id", "results-table")], |s| {
        element(s, "thead", &[], |s| {
            element(s, "tr", &[], |s| {
                for header in COLUMN_HEADERS {
                    text_element(s, "th", &[], header)?;
                }
                Ok(())
            })
        })?;
        element(s, "tbody", &[], |s| {
            for row in rows {
                element(s, "tr", &[], |s| match row {
                    Row::Product(cells) => {
                        for cell in cells {
                            text_element(s, "td", &[], cell)?;
                        }
                        Ok(())
                    }
                    Row::Placeholder(message) => {
                        text_element(s, "td", &[("colspan", "5")], message)
                    }
                })?;
            }
            Ok(())
        })
    })
}

fn write_highlight<S: Serializer>(s: &mut S, highlight: &Highlight) -> io::Result<()> {
    element(s, "div", &[("id", "best-product")], |s| {
        text_element(s, "h2", &[], "Best Product")?;
        for (label, value) in &highlight.fields {
            element(s, "p", &[], |s| {
                text_element(s, "strong", &[], &format!("{label}:"))?;
                s.write_text(&format!(" {value}"))
            })?;
        }
        Ok(())
    })
}

#[test]
fn test_loading_view_hides_everything_else() {
    let state = UiState::Loading {
        query: crate::data_models::SearchQuery::parse("tv").unwrap(),
    };
    let view = render(&state);
    assert!(view.loading);
    assert!(view.rows.is_empty());
    assert!(view.highlight.is_none());
    assert!(view.error.is_none());
    assert_eq!(
        view.to_html(),
        r#"<div id="search-panel"><div id="loading">Loading...</div></div>"#
    );
}
