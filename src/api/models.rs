use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PanelFragment {
    pub query: Option<String>,
    pub state: &'static str,
    pub alerts: Vec<String>,
    pub html: String,
}
