//! reqwest-backed WordPress REST client

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{Result, WordPressError};
use super::types::{Author, Category, PageHeaders, Post, PostFilter, PostsResponse, Tag};
use super::ContentSource;
use crate::config::SiteConfig;

/// Largest page size the REST API accepts
const MAX_PER_PAGE: usize = 100;

const TOTAL_HEADER: &str = "x-wp-total";
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Client for the `/wp-json/wp/v2` REST API
#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    api_base: Url,
}

impl WordPressClient {
    /// Create a client for the CMS at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let raw = format!("{}/wp-json/wp/v2/", base_url.trim_end_matches('/'));
        let api_base = Url::parse(&raw).map_err(|e| WordPressError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pressroom/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WordPressError::Request {
                url: raw.clone(),
                source: e,
            })?;

        Ok(Self { client, api_base })
    }

    /// Create a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> anyhow::Result<Self> {
        let base = config.wordpress_base()?;
        Ok(Self::new(base, Duration::from_secs(config.request_timeout))?)
    }

    /// Build an endpoint URL with query parameters
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .api_base
            .join(path)
            .map_err(|e| WordPressError::InvalidUrl {
                url: format!("{}{}", self.api_base, path),
                reason: e.to_string(),
            })?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// GET a JSON document, returning it together with the response headers
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<(T, HeaderMap)> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WordPressError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WordPressError::Status {
                url: url.to_string(),
                status,
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| WordPressError::Request {
            url: url.to_string(),
            source: e,
        })?;

        let data = serde_json::from_str(&body).map_err(|e| WordPressError::Decode {
            url: url.to_string(),
            source: e,
        })?;

        Ok((data, headers))
    }

    /// Fetch every page of a collection endpoint
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let mut params = query.to_vec();
            params.push(("per_page", MAX_PER_PAGE.to_string()));
            params.push(("page", page.to_string()));

            let (batch, headers): (Vec<T>, _) = self.fetch(self.endpoint(path, &params)?).await?;
            let returned = batch.len();
            items.extend(batch);

            let total_pages = header_usize(&headers, TOTAL_PAGES_HEADER).unwrap_or(1);
            if returned == 0 || page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} items from {}", items.len(), path);
        Ok(items)
    }

    /// Fetch the first item matching `slug`
    async fn fetch_by_slug<T: DeserializeOwned>(
        &self,
        path: &str,
        kind: &'static str,
        slug: &str,
    ) -> Result<T> {
        let url = self.endpoint(path, &[("slug", slug.to_string())])?;
        let (items, _): (Vec<T>, _) = self.fetch(url).await?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| WordPressError::NotFound {
                kind,
                key: "slug",
                value: slug.to_string(),
            })
    }

    pub async fn search_authors(&self, query: &str) -> Result<Vec<Author>> {
        self.search("users", query).await
    }

    pub async fn search_tags(&self, query: &str) -> Result<Vec<Tag>> {
        self.search("tags", query).await
    }

    pub async fn search_categories(&self, query: &str) -> Result<Vec<Category>> {
        self.search("categories", query).await
    }

    /// Search a taxonomy endpoint; a blank query lists everything
    async fn search<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<Vec<T>> {
        let query = query.trim();
        if query.is_empty() {
            return self.fetch_all(path, &[]).await;
        }
        self.fetch_all(path, &[("search", query.to_string())]).await
    }

    pub async fn get_author_by_slug(&self, slug: &str) -> Result<Author> {
        self.fetch_by_slug("users", "author", slug).await
    }

    pub async fn get_tag_by_slug(&self, slug: &str) -> Result<Tag> {
        self.fetch_by_slug("tags", "tag", slug).await
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Category> {
        self.fetch_by_slug("categories", "category", slug).await
    }

    /// Turn the slug-based filter into REST query parameters
    ///
    /// Returns `None` when a slug matches nothing, so no post can match.
    async fn filter_params(
        &self,
        filter: &PostFilter,
    ) -> Result<Option<Vec<(&'static str, String)>>> {
        let mut params = Vec::new();

        if let Some(author) = non_blank(&filter.author) {
            match self.resolve_id(author, self.get_author_by_slug(author)).await? {
                Some(id) => params.push(("author", id.to_string())),
                None => return Ok(None),
            }
        }
        if let Some(tag) = non_blank(&filter.tag) {
            match self.resolve_id(tag, self.get_tag_by_slug(tag)).await? {
                Some(id) => params.push(("tags", id.to_string())),
                None => return Ok(None),
            }
        }
        if let Some(category) = non_blank(&filter.category) {
            match self.resolve_id(category, self.get_category_by_slug(category)).await? {
                Some(id) => params.push(("categories", id.to_string())),
                None => return Ok(None),
            }
        }
        if let Some(search) = non_blank(&filter.search) {
            params.push(("search", search.to_string()));
        }

        Ok(Some(params))
    }

    /// Look the value up by slug; a numeric value that matches no slug is
    /// taken as an id
    async fn resolve_id<T, F>(&self, value: &str, lookup: F) -> Result<Option<u64>>
    where
        T: HasId,
        F: std::future::Future<Output = Result<T>>,
    {
        match lookup.await {
            Ok(item) => Ok(Some(item.id())),
            Err(WordPressError::NotFound { .. }) => {
                let id = value.parse::<u64>().ok();
                if id.is_none() {
                    tracing::debug!("Filter value {:?} matches nothing", value);
                }
                Ok(id)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ContentSource for WordPressClient {
    async fn get_posts_paginated(
        &self,
        page: usize,
        per_page: usize,
        filter: &PostFilter,
    ) -> Result<PostsResponse> {
        let Some(filter_params) = self.filter_params(filter).await? else {
            return Ok(PostsResponse::default());
        };

        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let mut params = vec![
            ("_embed", "true".to_string()),
            ("page", page.max(1).to_string()),
            ("per_page", per_page.to_string()),
        ];
        params.extend(filter_params);

        let (data, headers): (Vec<Post>, _) = self.fetch(self.endpoint("posts", &params)?).await?;
        let headers = PageHeaders::from_parts(
            header_usize(&headers, TOTAL_HEADER),
            header_usize(&headers, TOTAL_PAGES_HEADER),
            data.len(),
            per_page,
        );

        tracing::debug!(
            "Fetched {} posts (page {}, total {}, pages {})",
            data.len(),
            page,
            headers.total,
            headers.total_pages
        );

        Ok(PostsResponse { data, headers })
    }

    async fn get_all_authors(&self) -> Result<Vec<Author>> {
        self.fetch_all("users", &[]).await
    }

    async fn get_all_tags(&self) -> Result<Vec<Tag>> {
        self.fetch_all("tags", &[]).await
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.fetch_all("categories", &[]).await
    }
}

/// Taxonomy items addressable by numeric id
trait HasId {
    fn id(&self) -> u64;
}

impl HasId for Author {
    fn id(&self) -> u64 {
        self.id
    }
}

impl HasId for Tag {
    fn id(&self) -> u64 {
        self.id
    }
}

impl HasId for Category {
    fn id(&self) -> u64 {
        self.id
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn header_usize(headers: &HeaderMap, name: &str) -> Option<usize> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
