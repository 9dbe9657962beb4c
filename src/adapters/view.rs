//! Render context shared by the widgets of one page
//!
//! Collects the asset bundles and inline scripts widgets register while they
//! render, hands out automatic widget ids and turns everything into the
//! fragments a page layout places in `<head>` and before `</body>`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::html::{tag, HtmlAttributes};
use crate::config::AssetSettings;

/// Client-side files a widget depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub name: String,
    #[serde(default)]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

impl AssetBundle {
    /// The editor library bundle
    pub fn jedi(assets: &AssetSettings) -> Self {
        Self {
            name: "jedi".to_string(),
            scripts: assets.scripts.clone(),
            styles: assets.styles.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct View {
    bundles: Vec<AssetBundle>,
    scripts: Vec<String>,
    widget_counter: usize,
    slugs: HashSet<String>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bundle once; later registrations under the same name are ignored.
    pub fn register_asset_bundle(&mut self, bundle: AssetBundle) {
        if self.bundles.iter().any(|b| b.name == bundle.name) {
            return;
        }
        tracing::debug!(bundle = %bundle.name, "registered asset bundle");
        self.bundles.push(bundle);
    }

    /// Registers an inline script block. Identical blocks are kept once.
    pub fn register_js(&mut self, script: impl Into<String>) {
        let script = script.into();
        if !self.scripts.contains(&script) {
            self.scripts.push(script);
        }
    }

    /// Next automatic widget id: `w0`, `w1`, ...
    pub fn next_widget_id(&mut self) -> String {
        let id = format!("w{}", self.widget_counter);
        self.widget_counter += 1;
        id
    }

    /// Reserves a startup routine suffix. A slug already taken on this page
    /// gets `_2`, `_3`, ... appended; slugs never contain `_` themselves.
    pub fn unique_slug(&mut self, slug: String) -> String {
        let mut candidate = slug.clone();
        let mut n = 2;
        while self.slugs.contains(&candidate) {
            candidate = format!("{slug}_{n}");
            n += 1;
        }
        self.slugs.insert(candidate.clone());
        candidate
    }

    pub fn asset_bundles(&self) -> &[AssetBundle] {
        &self.bundles
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Stylesheet links for `<head>`.
    pub fn head_html(&self) -> String {
        self.bundles
            .iter()
            .flat_map(|b| b.styles.iter())
            .map(|href| {
                let attrs = HtmlAttributes::new().with("rel", "stylesheet").with("href", href.as_str());
                format!("<link{}>", attrs.render())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Library scripts followed by the registered inline blocks.
    pub fn body_end_html(&self) -> String {
        let files = self.bundles.iter().flat_map(|b| b.scripts.iter()).map(|src| {
            let attrs = HtmlAttributes::new().with("src", src.as_str());
            tag("script", "", &attrs)
        });
        let inline = self
            .scripts
            .iter()
            .map(|script| tag("script", script, &HtmlAttributes::new()));

        files.chain(inline).collect::<Vec<_>>().join("\n")
    }
}
