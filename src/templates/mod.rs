//! Built-in templates for the posts listing, rendered with Tera
//!
//! Templates are embedded in the binary. Autoescaping is off; dynamic text
//! goes through the `html_escape` filter in the templates themselves.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{html_escape, Pagination};

/// Template renderer with the embedded posts templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // URLs and paths must not be escaped
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("posts/layout.html")),
            ("posts.html", include_str!("posts/posts.html")),
            (
                "partials/post_card.html",
                include_str!("posts/partials/post_card.html"),
            ),
            (
                "partials/search_input.html",
                include_str!("posts/partials/search_input.html"),
            ),
            (
                "partials/filter.html",
                include_str!("posts/partials/filter.html"),
            ),
            (
                "partials/pagination.html",
                include_str!("posts/partials/pagination.html"),
            ),
        ])?;

        tera.register_filter("html_escape", html_escape_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape HTML special characters
fn html_escape_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::String(s) => s.clone(),
        tera::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub language: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub date: String,
    pub datetime: String,
    pub category: String,
    pub author: Option<String>,
    pub image: Option<CardImage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterData {
    /// Current search text, empty when none
    pub search: String,
    /// Active taxonomy filters the search form has to keep
    pub search_hidden: Vec<HiddenField>,
    pub groups: Vec<FilterGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterGroup {
    /// Query parameter name
    pub name: String,
    pub label: String,
    pub all_label: String,
    pub options: Vec<FilterOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Full context of the posts listing template
#[derive(Debug, Clone, Serialize)]
pub struct PostsPageData {
    pub meta: PageMeta,
    pub posts_route: String,
    pub count_text: String,
    pub posts: Vec<PostCardData>,
    pub filter: FilterData,
    pub pagination: Option<Pagination>,
}

impl PostsPageData {
    pub fn to_context(&self) -> Result<Context> {
        Ok(Context::from_serialize(self)?)
    }
}
