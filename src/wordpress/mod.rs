//! WordPress data source
//!
//! Fetches posts and taxonomy (authors, tags, categories) from the
//! WordPress REST API. Everything here is read-only.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::WordPressClient;
pub use error::{Result, WordPressError};
pub use types::{
    Author, Category, Embedded, EmbeddedAuthor, FeaturedMedia, PageHeaders, Post, PostFilter,
    PostsResponse, Rendered, Tag, Term,
};

/// Content needed to render the posts listing
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// One page of posts matching `filter`, with pagination headers
    async fn get_posts_paginated(
        &self,
        page: usize,
        per_page: usize,
        filter: &PostFilter,
    ) -> Result<PostsResponse>;

    async fn get_all_authors(&self) -> Result<Vec<Author>>;

    async fn get_all_tags(&self) -> Result<Vec<Tag>>;

    async fn get_all_categories(&self) -> Result<Vec<Category>>;
}
