use scraper::{Html, Selector};
use serde_json::json;

use product_hunt::data_models::SearchQuery;
use product_hunt::panel::{ResultSet, UiState};
use product_hunt::render::{PanelView, render};

mod common;
use common::*;

fn select_text(html: &Html, selector: &str) -> Vec<String> {
    let selector = Selector::parse(selector).unwrap();
    html.select(&selector)
        .map(|e| e.text().collect::<String>())
        .collect()
}

fn count(html: &Html, selector: &str) -> usize {
    let selector = Selector::parse(selector).unwrap();
    html.select(&selector).count()
}

fn results(value: serde_json::Value) -> UiState {
    UiState::from_response(decode(value)).0
}

fn parsed(view: &PanelView) -> Html {
    Html::parse_fragment(&view.to_html())
}

#[test]
fn test_idle_renders_empty_panel() {
    let view = render(&UiState::Idle);
    assert_eq!(view, PanelView::default());
    assert_eq!(view.to_html(), r#"<div id="search-panel"></div>"#);
    assert_eq!(view.to_text(), "");
}

#[test]
fn test_product_rows_in_order_with_five_cells() {
    let state = results(json!({
        "products": [
            product_json("Laptop X", "eBay", json!("$ 499.00"), json!(120), json!(0.72)),
            product_json("Laptop Y", "Newegg", json!(650), json!(8), json!(-0.1)),
            product_json("Laptop Z", "eBay", json!(710.5), json!(0), json!(0)),
        ]
    }));
    let html = parsed(&render(&state));

    assert_eq!(count(&html, "#results-table tbody tr"), 3);
    assert_eq!(count(&html, "#results-table thead th"), 5);
    assert_eq!(count(&html, "#best-product"), 0);
    assert_eq!(count(&html, "#loading"), 0);
    assert_eq!(count(&html, "#error-message"), 0);

    let cells = select_text(&html, "#results-table tbody td");
    assert_eq!(
        cells,
        vec![
            "Laptop X", "eBay", "$ 499.00", "120", "0.72", //
            "Laptop Y", "Newegg", "650", "8", "-0.1", //
            "Laptop Z", "eBay", "710.5", "0", "0",
        ]
    );
}

#[test]
fn test_best_product_highlight_block() {
    let state = results(json!({ "products": [shoe_product()], "best_product": shoe_product() }));
    let html = parsed(&render(&state));

    assert_eq!(count(&html, "#best-product"), 1);
    assert_eq!(select_text(&html, "#best-product h2"), vec!["Best Product"]);
    assert_eq!(
        select_text(&html, "#best-product p"),
        vec![
            "Product: A",
            "Website: W1",
            "Price: 10",
            "Reviews: 5",
            "Sentiment Score: 0.8",
        ]
    );
    assert_eq!(
        select_text(&html, "#best-product p strong"),
        vec!["Product:", "Website:", "Price:", "Reviews:", "Sentiment Score:"]
    );
}

#[test]
fn test_placeholder_row_spans_all_columns() {
    let state = UiState::ResultsShown(ResultSet::Empty {
        message: "No products found".into(),
    });
    let html = parsed(&render(&state));

    assert_eq!(count(&html, "#results-table tbody tr"), 1);
    assert_eq!(
        select_text(&html, r#"#results-table tbody td[colspan="5"]"#),
        vec!["No products found"]
    );
    assert_eq!(count(&html, "#best-product"), 0);
}

#[test]
fn test_error_view_has_no_table() {
    let state = UiState::ErrorShown {
        message: "Error: kaboom".into(),
    };
    let view = render(&state);
    let html = parsed(&view);

    assert_eq!(select_text(&html, "#error-message"), vec!["Error: kaboom"]);
    assert_eq!(count(&html, "#results-table"), 0);
    assert_eq!(view.to_text(), "Error: kaboom\n");
}

#[test]
fn test_loading_view() {
    let state = UiState::Loading {
        query: SearchQuery::parse("tv").unwrap(),
    };
    let html = parsed(&render(&state));
    assert_eq!(select_text(&html, "#loading"), vec!["Loading..."]);
    assert_eq!(count(&html, "#results-table"), 0);
}

#[test]
fn test_markup_in_product_fields_is_escaped() {
    let state = results(json!({
        "products": [product_json(
            "<script>alert('x')</script>",
            "<b>W</b> & co",
            json!("<img src=x onerror=alert(1)>"),
            json!(1),
            json!(0.5),
        )],
        "best_product": product_json("<i>best</i>", "W", json!(1), json!(1), json!(0.5)),
    }));
    let view = render(&state);
    let raw = view.to_html();

    assert!(!raw.contains("<script>"));
    assert!(raw.contains("&lt;script&gt;"));
    assert!(raw.contains("&lt;b&gt;W&lt;/b&gt; &amp; co"));

    let html = Html::parse_fragment(&raw);
    assert_eq!(count(&html, "script"), 0);
    assert_eq!(count(&html, "img"), 0);
    assert_eq!(count(&html, "#best-product i"), 0);
    let cells = select_text(&html, "#results-table tbody td");
    assert_eq!(cells[0], "<script>alert('x')</script>");
    assert_eq!(cells[1], "<b>W</b> & co");
}

#[test]
fn test_text_rendering() {
    let state = results(json!({ "products": [shoe_product()], "best_product": shoe_product() }));
    let text = render(&state).to_text();
    assert_eq!(
        text,
        "Product | Website | Price | Reviews | Sentiment Score\n\
         A | W1 | 10 | 5 | 0.8\n\
         \n\
         Best Product\n\
         Product: A\n\
         Website: W1\n\
         Price: 10\n\
         Reviews: 5\n\
         Sentiment Score: 0.8\n"
    );
}
