//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::images::ImagePolicy;

/// Environment variable holding the CMS base URL
pub const WORDPRESS_URL_ENV: &str = "WORDPRESS_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Page metadata
    pub title: String,
    pub description: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub posts_dir: String,

    // Listing
    pub posts_per_page: usize,
    pub date_format: String,
    /// Words kept from each post excerpt
    pub excerpt_words: usize,

    // CMS
    pub wordpress_url: Option<String>,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub admin_path: String,

    #[serde(default)]
    pub images: ImagesConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog Posts".to_string(),
            description: "Browse all our blog posts".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            posts_dir: "posts".to_string(),

            posts_per_page: 9,
            date_format: "MMMM D, YYYY".to_string(),
            excerpt_words: 12,

            wordpress_url: None,
            request_timeout: 30,
            admin_path: "/admin".to_string(),

            images: ImagesConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `WORDPRESS_URL` from the environment, if set
    pub fn apply_env(&mut self) {
        self.apply_wordpress_url(std::env::var(WORDPRESS_URL_ENV).ok());
    }

    fn apply_wordpress_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Using {} from environment: {}", WORDPRESS_URL_ENV, url);
            self.wordpress_url = Some(url.trim().to_string());
        }
    }

    /// CMS base URL without trailing slash
    pub fn wordpress_base(&self) -> Result<&str> {
        match self.wordpress_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url.trim_end_matches('/')),
            _ => anyhow::bail!("{} is not set", WORDPRESS_URL_ENV),
        }
    }

    /// Where `admin_path` permanently redirects to
    pub fn admin_redirect_target(&self) -> Result<String> {
        Ok(format!("{}/wp-admin", self.wordpress_base()?))
    }

    /// Route of the posts listing, e.g. `/posts`
    ///
    /// An empty `posts_dir` puts the listing at the site root.
    pub fn posts_route(&self) -> String {
        normalize_route(&crate::helpers::url_for(self, &self.posts_dir))
    }

    /// Route that redirects to the CMS dashboard, or `None` when disabled
    pub fn admin_route(&self) -> Option<String> {
        if self.admin_path.trim().trim_matches('/').is_empty() {
            return None;
        }
        Some(normalize_route(self.admin_path.trim()))
    }

    /// Build the remote image allow-list
    ///
    /// Falls back to `{wordpress_url}/**` when no patterns are configured.
    pub fn image_policy(&self) -> Result<ImagePolicy> {
        if !self.images.remote_patterns.is_empty() {
            return ImagePolicy::new(&self.images.remote_patterns[..]);
        }

        match self.wordpress_base() {
            Ok(base) => ImagePolicy::new(&[format!("{}/**", base)]),
            Err(_) => Ok(ImagePolicy::default()),
        }
    }
}

/// Leading slash, no trailing slash; the root stays `/`
fn normalize_route(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}

/// Remote image configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub remote_patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Blog Posts");
        assert_eq!(config.posts_per_page, 9);
        assert_eq!(config.posts_route(), "/posts");
        assert!(config.wordpress_base().is_err());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Journal
wordpress_url: https://cms.example.com/
posts_per_page: 12
images:
  remote_patterns:
    - https://cdn.example.com/uploads/**
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Journal");
        assert_eq!(config.posts_per_page, 12);
        assert_eq!(config.wordpress_base().unwrap(), "https://cms.example.com");
        assert_eq!(config.images.remote_patterns.len(), 1);
        // Unset fields keep their defaults
        assert_eq!(config.admin_path, "/admin");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = SiteConfig {
            wordpress_url: Some("https://old.example.com".to_string()),
            ..Default::default()
        };
        config.apply_wordpress_url(Some("https://new.example.com".to_string()));
        assert_eq!(config.wordpress_base().unwrap(), "https://new.example.com");

        config.apply_wordpress_url(Some("  ".to_string()));
        assert_eq!(config.wordpress_base().unwrap(), "https://new.example.com");
    }

    #[test]
    fn test_routes_are_normalized() {
        let config = SiteConfig {
            posts_dir: "".to_string(),
            admin_path: "wp/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.posts_route(), "/");
        assert_eq!(config.admin_route().as_deref(), Some("/wp"));

        let config = SiteConfig {
            root: "blog".to_string(),
            admin_path: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.posts_route(), "/blog/posts");
        assert_eq!(config.admin_route(), None);
    }

    #[test]
    fn test_admin_redirect_target() {
        let config = SiteConfig {
            wordpress_url: Some("https://cms.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.admin_redirect_target().unwrap(),
            "https://cms.example.com/wp-admin"
        );
    }

    #[test]
    fn test_image_policy_defaults_to_cms() {
        let config = SiteConfig {
            wordpress_url: Some("https://cms.example.com".to_string()),
            ..Default::default()
        };
        let policy = config.image_policy().unwrap();
        assert!(policy.allows("https://cms.example.com/wp-content/uploads/a.jpg"));
        assert!(!policy.allows("https://elsewhere.example.com/a.jpg"));
    }
}
