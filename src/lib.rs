//! # Jedi Widget - JSON-schema form editor for server-rendered forms
//!
//! Renders the container and startup script for the
//! [Jedi](https://github.com/germanbisurgi/jedi) form editor and wires the
//! editor to a form field, so a schema-driven editor can be dropped into any
//! server-rendered page.
//!
//! ## Features
//!
//! - **Deep option merge**: editor defaults, site-wide options and per-widget options
//! - **Protected wiring**: container and hidden field name/id cannot be overridden
//! - **Schema inputs**: JSON text, `serde_json::Value` or any `Serialize` type
//! - **Script-safe encoding**: JSON embedded in `<script>` with markup characters escaped
//! - **Diagnostics**: non-fatal warnings returned with the rendered output
//! - **Preview server**: axum app to try schemas in a browser
//!
//! ## Quick Start
//!
//! ```rust
//! use jedi_widget::adapters::jedi_editor::{InputBinding, JediEditor};
//! use jedi_widget::adapters::view::View;
//!
//! let mut view = View::new();
//! let editor = JediEditor::new(InputBinding::named("profile", Some(r#"{"name":"Ada"}"#.into())))
//!     .schema(r#"{"type":"object","properties":{"name":{"type":"string"}}}"#)
//!     .widget(&mut view)?;
//!
//! // Place these in the page layout
//! let _container = editor.html;
//! let _head = view.head_html();
//! let _scripts = view.body_end_html();
//! # Ok::<(), jedi_widget::domain::WidgetError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: configuration values, merger, schema normalization, option defaulting
//! - **Adapters**: markup and script rendering, the widget, HTTP handlers
//! - **Config**: preview server settings

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::preview_handler::{self, PreviewState};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Creates the preview server router.
///
/// # Arguments
///
/// * `state` - Preview state holding settings and the current schema
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(state: PreviewState) -> Router {
    let health_handler = Arc::new(HealthHandler::new(state.settings.clone()));
    let assets_dir = state.settings.assets.dir.clone();

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let mut router = Router::new()
        .route("/", get(preview_handler::preview_page).post(preview_handler::submit))
        .route("/api/preview", get(preview_handler::preview_json))
        .with_state(state)
        .merge(health_router);

    if let Some(dir) = assets_dir {
        tracing::info!("Serving assets from {}", dir.display());
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http())
}
