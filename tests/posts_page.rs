//! Posts listing rendering and preview server tests with an in-memory CMS

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use pressroom::config::SiteConfig;
use pressroom::generator::{Generator, PostsPage};
use pressroom::wordpress::{
    Author, Category, ContentSource, PageHeaders, Post, PostFilter, PostsResponse, Rendered,
    Result, Tag, WordPressError,
};
use pressroom::Site;

/// Serves a fixed set of posts, paginated like the REST API
#[derive(Default)]
struct StaticSource {
    posts: Vec<Post>,
    fail_tags: bool,
    /// Delay before answering the posts request
    posts_delay: Option<Duration>,
}

impl StaticSource {
    fn with_posts(count: u64) -> Self {
        Self {
            posts: (1..=count).map(post).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    async fn get_posts_paginated(
        &self,
        page: usize,
        per_page: usize,
        _filter: &PostFilter,
    ) -> Result<PostsResponse> {
        if let Some(delay) = self.posts_delay {
            tokio::time::sleep(delay).await;
        }
        let data = self
            .posts
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        Ok(PostsResponse {
            data,
            headers: PageHeaders {
                total: self.posts.len(),
                total_pages: self.posts.len().div_ceil(per_page),
            },
        })
    }

    async fn get_all_authors(&self) -> Result<Vec<Author>> {
        Ok(vec![Author {
            id: 1,
            name: "Ada".to_string(),
            slug: "ada".to_string(),
            description: String::new(),
            avatar_urls: Default::default(),
        }])
    }

    async fn get_all_tags(&self) -> Result<Vec<Tag>> {
        if self.fail_tags {
            return Err(WordPressError::Status {
                url: "http://cms.test/wp-json/wp/v2/tags".to_string(),
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }
        Ok(Vec::new())
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        Ok(vec![Category {
            id: 1,
            name: "News".to_string(),
            slug: "news".to_string(),
            count: 3,
            description: String::new(),
            parent: 0,
        }])
    }
}

fn post(id: u64) -> Post {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "date": "2024-02-01T08:00:00",
        "slug": format!("post-{}", id),
        "title": {"rendered": format!("Post number {}", id)},
        "excerpt": {"rendered": "<p>Short excerpt</p>"}
    }))
    .unwrap()
}

fn site(dir: &std::path::Path) -> Site {
    let config = SiteConfig {
        wordpress_url: Some("https://cms.example.com".to_string()),
        ..Default::default()
    };
    Site::with_config(dir, config)
}

#[tokio::test]
async fn test_empty_listing_shows_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(&site(dir.path())).unwrap();

    let html = generator
        .render_posts(&StaticSource::default(), 1, &PostFilter::default())
        .await
        .unwrap();

    assert!(html.contains("0 posts found"));
    assert!(html.contains("No posts found"));
    assert!(!html.contains("post-card-title"));
    assert!(!html.contains("pagination-content"));
}

#[tokio::test]
async fn test_single_post_uses_singular() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(&site(dir.path())).unwrap();

    let html = generator
        .render_posts(&StaticSource::with_posts(1), 1, &PostFilter::default())
        .await
        .unwrap();

    assert!(html.contains("1 post found"));
    assert!(html.contains("Post number 1"));
    assert!(html.contains(r#"href="/posts/post-1""#));
    assert!(html.contains("Uncategorized"));
    assert!(!html.contains("pagination-content"));
}

#[tokio::test]
async fn test_first_page_of_many() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(&site(dir.path())).unwrap();

    let html = generator
        .render_posts(&StaticSource::with_posts(20), 1, &PostFilter::default())
        .await
        .unwrap();

    assert!(html.contains("20 posts found"));
    assert_eq!(html.matches("post-card-title").count(), 9);
    assert!(html.contains("pagination-content"));
    assert!(!html.contains("Go to previous page"));
    assert!(html.contains(r#"href="/posts?page=2" aria-label="Go to next page""#));
    assert!(html.contains(r#"href="/posts?page=3""#));
    assert!(html.contains("All Authors"));
    assert!(html.contains(r#"<option value="news">News</option>"#));
}

#[tokio::test]
async fn test_failed_fetch_fails_render() {
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path());
    let source = StaticSource {
        fail_tags: true,
        posts_delay: Some(Duration::from_secs(30)),
        ..StaticSource::with_posts(3)
    };

    // The tag failure must not wait for the slow posts request
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        PostsPage::load(&source, &site.config, 1, &PostFilter::default()),
    )
    .await
    .expect("load should fail fast");

    let err = result.unwrap_err();
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_generate_writes_static_page() {
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path());
    let generator = Generator::new(&site).unwrap();

    let path = generator
        .generate(&StaticSource::with_posts(4))
        .await
        .unwrap();

    assert_eq!(path, site.public_dir.join("posts").join("index.html"));
    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("4 posts found"));
    assert!(html.contains("<title>Blog Posts</title>"));
}

async fn spawn_server(site: &Site, source: StaticSource) -> String {
    let app = pressroom::server::router(site, Arc::new(source)).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_server_admin_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(&site(dir.path()), StaticSource::default()).await;

    let response = http().get(format!("{}/admin", base)).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 308);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "https://cms.example.com/wp-admin"
    );
}

#[tokio::test]
async fn test_server_renders_requested_page() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_server(&site(dir.path()), StaticSource::with_posts(20)).await;

    let response = http()
        .get(format!("{}/posts?page=2", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let html = response.text().await.unwrap();
    assert!(html.contains("Post number 10"));
    assert!(html.contains(r#"href="/posts?page=2" aria-current="page""#));
    assert!(html.contains("Go to previous page"));
    assert!(html.contains("Go to next page"));
}

#[tokio::test]
async fn test_server_reports_render_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = StaticSource {
        fail_tags: true,
        ..Default::default()
    };
    let base = spawn_server(&site(dir.path()), source).await;

    let response = http().get(format!("{}/posts", base)).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert!(response.text().await.unwrap().contains("Something went wrong"));
}

#[tokio::test]
async fn test_server_serves_generated_files() {
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path());
    std::fs::create_dir_all(&site.public_dir).unwrap();
    std::fs::write(site.public_dir.join("robots.txt"), "User-agent: *").unwrap();
    let base = spawn_server(&site, StaticSource::default()).await;

    let response = http()
        .get(format!("{}/robots.txt", base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "User-agent: *");
}

#[tokio::test]
async fn test_server_without_cms_url_has_no_admin_route() {
    let dir = tempfile::tempdir().unwrap();
    let site = Site::with_config(dir.path(), SiteConfig::default());
    let base = spawn_server(&site, StaticSource::default()).await;

    let response = http().get(format!("{}/admin", base)).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert!(response.headers().get("location").is_none());
}

#[tokio::test]
async fn test_server_listing_at_site_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = SiteConfig {
        wordpress_url: Some("https://cms.example.com".to_string()),
        posts_dir: "".to_string(),
        admin_path: "dashboard".to_string(),
        ..Default::default()
    };
    let site = Site::with_config(dir.path(), config);
    let base = spawn_server(&site, StaticSource::with_posts(3)).await;

    let response = http().get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("3 posts found"));

    let response = http()
        .get(format!("{}/dashboard", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 308);
}
