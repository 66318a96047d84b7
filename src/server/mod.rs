//! Preview server
//!
//! Renders the posts listing on request (any page, any filter), redirects
//! the admin path to the CMS dashboard and serves everything else from the
//! public directory.

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::generator::Generator;
use crate::wordpress::{ContentSource, PostFilter};
use crate::Site;

/// Body of the 500 page
const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Something went wrong</title></head>
<body><h1>Something went wrong</h1><p>The posts could not be loaded. Please try again later.</p></body>
</html>
"#;

/// Server state
struct ServerState {
    generator: Generator,
    source: Arc<dyn ContentSource>,
    admin_target: Option<String>,
}

/// Query string accepted by the listing route
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub page: Option<String>,
    pub search: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl ListingQuery {
    /// Requested page; anything unparsable or below 1 means page 1
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    pub fn filter(&self) -> PostFilter {
        PostFilter {
            author: self.author.clone(),
            tag: self.tag.clone(),
            category: self.category.clone(),
            search: self.search.clone(),
        }
    }
}

/// Build the application router
pub fn router(site: &Site, source: Arc<dyn ContentSource>) -> Result<Router> {
    let admin_target = match site.config.admin_redirect_target() {
        Ok(target) => Some(target),
        Err(e) => {
            tracing::warn!("Admin redirect disabled: {}", e);
            None
        }
    };

    let state = Arc::new(ServerState {
        generator: Generator::new(site)?,
        source,
        admin_target,
    });

    let posts_route = site.config.posts_route();
    let mut app = Router::new().route(&posts_route, get(posts_handler));
    if posts_route != "/" {
        app = app.route(&format!("{}/", posts_route), get(posts_handler));
    }

    if state.admin_target.is_some() {
        match site.config.admin_route() {
            Some(admin_route) if admin_route != posts_route => {
                app = app.route(&admin_route, get(admin_handler));
            }
            Some(admin_route) => {
                tracing::warn!("Admin path {} clashes with the posts listing", admin_route);
            }
            None => tracing::debug!("Admin redirect disabled by config"),
        }
    }

    let app = app
        .fallback_service(ServeDir::new(&site.public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the preview server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let source: Arc<dyn ContentSource> = Arc::new(site.client()?);
    let app = router(site, source)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, site.config.posts_route());
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Render one page of the listing
async fn posts_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let page = query.page();
    let filter = query.filter();

    match state
        .generator
        .render_posts(state.source.as_ref(), page, &filter)
        .await
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render posts page {}: {:#}", page, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
        }
    }
}

/// Permanently redirect to the CMS dashboard
async fn admin_handler(State(state): State<Arc<ServerState>>) -> Response {
    match &state.admin_target {
        Some(target) => Redirect::permanent(target).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
