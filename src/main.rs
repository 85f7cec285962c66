use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use product_hunt::api::{AppState, create_router};
use product_hunt::client::{Endpoint, HttpBackend};
use product_hunt::config::{CONFIG, Config};
use product_hunt::panel::{SearchPanel, Surface};
use product_hunt::render::PanelView;

#[derive(Debug, Parser)]
#[command(name = "product-hunt", about = "Search product prices and reviews")]
struct Cli {
    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Endpoint flavour: search, products or keyword-data
    #[arg(long, global = true)]
    api: Option<String>,

    /// Override the endpoint path
    #[arg(long, global = true)]
    api_path: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one search and print the panel
    Search {
        query: Vec<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Serve the search page over HTTP
    Serve {
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Html,
}

/// Prints the final panel to stdout and alerts to stderr.
struct TerminalSurface {
    format: Format,
}

/// What `search` prints to stdout for `view`; `None` while loading.
fn terminal_output(view: &PanelView, format: Format) -> Option<String> {
    if view.loading {
        return None;
    }
    Some(match format {
        Format::Text => view.to_text(),
        Format::Html => format!("{}\n", view.to_html()),
    })
}

impl Surface for TerminalSurface {
    fn paint(&self, view: &PanelView) {
        match terminal_output(view, self.format) {
            Some(output) => print!("{output}"),
            None => eprintln!("Searching..."),
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = (*CONFIG).clone();
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(api) = &self.api {
            config.api = api.clone();
        }
        if let Some(api_path) = &self.api_path {
            config.api_path = Some(api_path.clone());
        }
        if let Command::Serve {
            listen: Some(listen),
        } = &self.command
        {
            config.listen_addr = listen.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config();
    let endpoint: Endpoint = config.endpoint().context("invalid backend configuration")?;

    match cli.command {
        Command::Search { query, format } => {
            let backend = HttpBackend::new(reqwest::Client::new(), endpoint);
            let panel = SearchPanel::new(backend, TerminalSurface { format });
            panel.submit_search(&query.join(" ")).await;
        }
        Command::Serve { .. } => {
            let addr = config.listen_addr()?;
            let state = Arc::new(AppState {
                client: reqwest::Client::new(),
                endpoint,
            });
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!(%addr, backend = %state.endpoint.variant(), "serving search page");
            axum::serve(listener, create_router(state)).await?;
        }
    }
    Ok(())
}

#[test]
fn test_terminal_output_formats() {
    use product_hunt::data_models::SearchQuery;
    use product_hunt::panel::UiState;
    use product_hunt::render::render;

    let loading = render(&UiState::Loading {
        query: SearchQuery::parse("shoes").unwrap(),
    });
    assert_eq!(terminal_output(&loading, Format::Text), None);
    assert_eq!(terminal_output(&loading, Format::Html), None);

    let failed = render(&UiState::ErrorShown {
        message: "db <down>".into(),
    });
    let text = terminal_output(&failed, Format::Text).unwrap();
    assert_eq!(text, failed.to_text());
    assert!(text.contains("db <down>"));

    let html = terminal_output(&failed, Format::Html).unwrap();
    assert_eq!(
        html,
        "<div id=\"search-panel\"><div id=\"error-message\">db &lt;down&gt;</div></div>\n"
    );
}

#[test]
fn test_search_command_joins_words() {
    let cli = Cli::try_parse_from(["product-hunt", "search", "red", "shoes", "--format", "html"])
        .unwrap();
    let Command::Search { query, format } = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(query.join(" "), "red shoes");
    assert_eq!(format, Format::Html);
}
