use clap::Parser;
use jedi_widget::adapters::preview_handler::PreviewState;
use jedi_widget::cli::Cli;
use jedi_widget::config::{watcher::SchemaWatcher, Settings};
use jedi_widget::domain::{Schema, WidgetError};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Arc::new(Settings::new_with_cli(&cli)?);

    // The preview page needs a schema up front
    let schema_input = settings.load_schema()?.ok_or(WidgetError::MissingSchema)?;
    let schema = Schema::normalize(schema_input)?;

    let state = PreviewState::new(settings.clone(), schema)?;

    let _watcher = match (&settings.editor.schema_path, cli.no_watch) {
        (Some(path), false) => {
            let shared = state.schema.clone();
            Some(SchemaWatcher::new(path.clone(), move |schema| {
                *shared.blocking_write() = schema;
            })?)
        }
        _ => None,
    };

    let app = jedi_widget::create_app(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("Jedi preview server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
