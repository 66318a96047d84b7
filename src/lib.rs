//! pressroom: a static blog listing generator for headless WordPress
//!
//! This crate fetches posts, authors, tags and categories from the
//! WordPress REST API and renders the `/posts` listing page with embedded
//! Tera templates. A small preview server renders other pages and filters
//! on request and redirects `/admin` to the CMS dashboard.

pub mod commands;
pub mod config;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod wordpress;

use anyhow::Result;
use std::path::Path;

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new site from a directory
    ///
    /// Reads `_config.yml` when present, then `.env`, then applies
    /// `WORDPRESS_URL` from the environment.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)?;
            tracing::debug!("Loaded environment from {:?}", env_path);
        }

        let config_path = base_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Client for the configured CMS
    pub fn client(&self) -> Result<wordpress::WordPressClient> {
        wordpress::WordPressClient::from_config(&self.config)
    }

    /// Generate the static posts listing
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
