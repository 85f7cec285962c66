use std::io;

use html5ever::serialize::{Serialize, Serializer, TraversalScope};

use crate::render::{PanelView, element, text_element};

/// Full search page: the form, any alerts from the last cycle, and the panel.
#[derive(Debug, Clone)]
pub struct SearchPage<'a> {
    pub query: &'a str,
    pub alerts: &'a [String],
    pub view: &'a PanelView,
}

impl Serialize for SearchPage<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        serializer.write_doctype("html")?;
        element(serializer, "html", &[], |s| {
            element(s, "head", &[], |s| {
                element(s, "meta", &[("charset", "utf-8")], |_| Ok(()))?;
                text_element(s, "title", &[], "Product Hunt")
            })?;
            element(s, "body", &[], |s| {
                element(s, "form", &[("method", "get"), ("action", "/")], |s| {
                    element(
                        s,
                        "input",
                        &[
                            ("type", "text"),
                            ("id", "search-query"),
                            ("name", "query"),
                            ("value", self.query),
                        ],
                        |_| Ok(()),
                    )?;
                    text_element(s, "button", &[("type", "submit"), ("id", "search-btn")], "Search")
                })?;
                for alert in self.alerts {
                    text_element(s, "div", &[("class", "alert"), ("role", "alert")], alert)?;
                }
                self.view.serialize(s, traversal_scope.clone())
            })
        })
    }
}
