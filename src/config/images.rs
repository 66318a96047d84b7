//! Remote image allow-list

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use reqwest::Url;

/// `*` stays within one path segment, `**` spans any number
const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single `scheme://host[:port]/path-glob` pattern
#[derive(Debug, Clone)]
struct RemotePattern {
    scheme: String,
    host: String,
    port: Option<u16>,
    pathname: Pattern,
}

impl RemotePattern {
    fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("Invalid image pattern: {}", raw))?;
        let host = url
            .host_str()
            .with_context(|| format!("Image pattern has no host: {}", raw))?
            .to_lowercase();
        let pathname = Pattern::new(url.path())
            .with_context(|| format!("Invalid path glob in image pattern: {}", raw))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
            pathname,
        })
    }

    fn matches(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.host_str().map(str::to_lowercase).as_deref() == Some(self.host.as_str())
            && url.port_or_known_default() == self.port
            && self.pathname.matches_with(url.path(), PATH_MATCH)
    }
}

/// Which remote image URLs may be embedded in rendered pages
#[derive(Debug, Clone, Default)]
pub struct ImagePolicy {
    patterns: Vec<RemotePattern>,
}

impl ImagePolicy {
    /// Build a policy from URL patterns such as `https://cms.example.com/**`
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| RemotePattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Check whether an image URL is allowed
    pub fn allows(&self, src: &str) -> bool {
        match Url::parse(src) {
            Ok(url) => self.patterns.iter().any(|p| p.matches(&url)),
            Err(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
