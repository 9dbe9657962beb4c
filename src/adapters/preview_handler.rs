//! HTTP handlers of the preview server
//!
//! Renders one editor bound to the configured field so schemas and plugin
//! options can be tried in a browser, and shows what the form submits.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tokio::sync::RwLock;

use super::jedi_editor::{InputBinding, JediEditor, RenderedEditor};
use super::view::View;
use crate::config::Settings;
use crate::domain::{BoundValue, Diagnostics, Schema, WidgetError};

const PAGE_TEMPLATE: &str = "preview.html";

#[derive(Clone)]
pub struct PreviewState {
    pub settings: Arc<Settings>,
    pub schema: Arc<RwLock<Schema>>,
    pages: Arc<Tera>,
}

impl PreviewState {
    pub fn new(settings: Arc<Settings>, schema: Schema) -> Result<Self, PreviewError> {
        let mut pages = Tera::default();
        pages.add_raw_template(PAGE_TEMPLATE, include_str!("templates/preview.html"))?;

        Ok(Self {
            settings,
            schema: Arc::new(RwLock::new(schema)),
            pages: Arc::new(pages),
        })
    }

    /// Renders the editor for `value` into a fresh view.
    pub async fn render_editor(&self, value: Option<String>) -> Result<(View, RenderedEditor), PreviewError> {
        let schema = self.schema.read().await.clone();
        let mut view = View::new();

        let rendered = JediEditor::new(InputBinding::named(
            self.settings.editor.field_name.as_str(),
            value.map(BoundValue::Text),
        ))
        .schema(schema.into_value())
        .defaults(self.settings.editor_defaults())
        .assets(self.settings.assets.clone())
        .widget(&mut view)?;

        Ok((view, rendered))
    }

    async fn render_page(&self, value: Option<String>, submitted: Option<String>) -> Result<String, PreviewError> {
        let (view, rendered) = self.render_editor(value).await?;

        let mut context = Context::new();
        context.insert("title", "Jedi editor preview");
        context.insert("head", &view.head_html());
        context.insert("body_end", &view.body_end_html());
        context.insert("editor", &rendered.html);
        context.insert("diagnostics", &rendered.diagnostics);
        context.insert("submitted", &submitted);

        Ok(self.pages.render(PAGE_TEMPLATE, &context)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub html: String,
    pub head: String,
    pub body_end: String,
    pub input_id: String,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error(transparent)]
    Widget(#[from] WidgetError),

    #[error("Page template error: {0}")]
    Template(#[from] tera::Error),
}

impl PreviewError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Widget(WidgetError::Schema(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Widget(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        tracing::error!("Preview rendering failed: {}", self);
        (self.status_code(), self.to_string()).into_response()
    }
}

/// `GET /` - editor page, optionally pre-filled through `?value=`
pub async fn preview_page(
    State(state): State<PreviewState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, PreviewError> {
    Ok(Html(state.render_page(query.value, None).await?))
}

/// `POST /` - re-renders the page with the submitted field value
pub async fn submit(
    State(state): State<PreviewState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Html<String>, PreviewError> {
    let value = form.get(&state.settings.editor.field_name).cloned();
    let submitted = value.as_deref().map(pretty_json);
    tracing::info!(field = %state.settings.editor.field_name, "Form submitted");

    Ok(Html(state.render_page(value, submitted).await?))
}

/// `GET /api/preview` - rendered fragments as JSON
pub async fn preview_json(
    State(state): State<PreviewState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewResponse>, PreviewError> {
    let (view, rendered) = state.render_editor(query.value).await?;

    Ok(Json(PreviewResponse {
        html: rendered.html,
        head: view.head_html(),
        body_end: view.body_end_html(),
        input_id: rendered.input_id,
        diagnostics: rendered.diagnostics,
    }))
}

/// Pretty-prints JSON text, returning the input unchanged when it is not JSON.
fn pretty_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}
