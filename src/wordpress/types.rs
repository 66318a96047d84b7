//! WordPress REST API models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A `{ "rendered": "..." }` field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// A blog post as returned by `/wp/v2/posts?_embed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,

    /// Publication date in the site's timezone
    pub date: NaiveDateTime,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub title: Rendered,

    #[serde(default)]
    pub excerpt: Rendered,

    #[serde(default)]
    pub content: Rendered,

    /// Author id
    #[serde(default)]
    pub author: u64,

    #[serde(default)]
    pub categories: Vec<u64>,

    #[serde(default)]
    pub tags: Vec<u64>,

    #[serde(default)]
    pub featured_media: u64,

    #[serde(default, rename = "_embedded")]
    pub embedded: Option<Embedded>,
}

impl Post {
    /// Source URL of the embedded featured image
    pub fn featured_image(&self) -> Option<&FeaturedMedia> {
        self.embedded
            .as_ref()?
            .featured_media
            .iter()
            .find(|m| !m.source_url.is_empty())
    }

    /// Name of the embedded author
    pub fn author_name(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .author
            .first()
            .map(|a| a.name.as_str())
    }

    /// Embedded terms of a taxonomy ("category" or "post_tag")
    pub fn terms(&self, taxonomy: &str) -> Vec<&Term> {
        self.embedded
            .as_ref()
            .map(|e| {
                e.terms
                    .iter()
                    .flatten()
                    .filter(|t| t.taxonomy == taxonomy)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Data included by `_embed`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub author: Vec<EmbeddedAuthor>,

    #[serde(default, rename = "wp:featuredmedia")]
    pub featured_media: Vec<FeaturedMedia>,

    #[serde(default, rename = "wp:term")]
    pub terms: Vec<Vec<Term>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddedAuthor {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturedMedia {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub alt_text: String,
}

/// An embedded taxonomy term
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub taxonomy: String,
}

/// A post author (`/wp/v2/users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar_urls: HashMap<String, String>,
}

/// A post tag (`/wp/v2/tags`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub description: String,
}

/// A post category (`/wp/v2/categories`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent: u64,
}

/// Pagination metadata from the `X-WP-Total` / `X-WP-TotalPages` headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageHeaders {
    pub total: usize,
    pub total_pages: usize,
}

impl PageHeaders {
    /// Fill in whatever the server did not send
    pub fn from_parts(
        total: Option<usize>,
        total_pages: Option<usize>,
        returned: usize,
        per_page: usize,
    ) -> Self {
        let total = total.unwrap_or(returned);
        let total_pages = total_pages.unwrap_or_else(|| total.div_ceil(per_page.max(1)));
        Self { total, total_pages }
    }
}

/// One page of posts plus its headers
#[derive(Debug, Clone, Default)]
pub struct PostsResponse {
    pub data: Vec<Post>,
    pub headers: PageHeaders,
}

/// Optional filters for the posts query
///
/// Values are slugs for taxonomy filters, free text for `search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilter {
    pub author: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl PostFilter {
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Non-empty filter values as `(name, value)` pairs, in a stable order
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", &self.search),
            ("author", &self.author),
            ("tag", &self.tag),
            ("category", &self.category),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect()
    }
}
