//! Markup helpers: attribute maps, tag rendering and form field naming.

use serde::{Deserialize, Serialize};
use tera::escape_html;

/// Attributes rendered first, in this order. Others follow in insertion order.
const ATTRIBUTE_ORDER: &[&str] = &[
    "type", "id", "class", "name", "value", "href", "loading", "src", "srcset", "form", "action",
    "method", "selected", "checked", "readonly", "disabled", "multiple", "size", "maxlength",
    "minlength", "width", "height", "rows", "cols", "alt", "title", "rel", "media",
];

/// Insertion-ordered HTML attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlAttributes(Vec<(String, String)>);

impl HtmlAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders ` name="value"` pairs with a leading space, escaped.
    pub fn render(&self) -> String {
        let mut ordered: Vec<&(String, String)> = Vec::with_capacity(self.0.len());
        for name in ATTRIBUTE_ORDER {
            ordered.extend(self.0.iter().filter(|(k, _)| k == name));
        }
        ordered.extend(self.0.iter().filter(|(k, _)| !ATTRIBUTE_ORDER.contains(&k.as_str())));

        ordered
            .into_iter()
            .map(|(k, v)| format!(" {}=\"{}\"", escape_html(k), escape_html(v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HtmlAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// Renders `<name attrs>content</name>`. `content` is inserted as is.
pub fn tag(name: &str, content: &str, attributes: &HtmlAttributes) -> String {
    format!("<{name}{}>{content}</{name}>", attributes.render())
}

/// Form field name for a model attribute: `Form[attribute]`, or just the
/// attribute when the form has no name.
pub fn input_name(form_name: &str, attribute: &str) -> String {
    if form_name.is_empty() {
        attribute.to_string()
    } else {
        format!("{form_name}[{attribute}]")
    }
}

/// Element id derived from a field name, e.g. `Settings[payload]` → `settings-payload`.
pub fn input_id(name: &str) -> String {
    [("[]", ""), ("][", "-"), ("[", "-"), ("]", ""), (" ", "-"), (".", "-"), ("--", "-")]
        .iter()
        .fold(name.to_lowercase(), |acc, (from, to)| acc.replace(from, to))
}

/// Identifier-safe slug: ASCII alphanumerics only, lowercased. Distinct ids
/// can share a slug (`form-a_b`, `form-ab`); see [`View::unique_slug`].
///
/// [`View::unique_slug`]: super::view::View::unique_slug
pub fn slug(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
