//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::wordpress::PostFilter;

/// Characters escaped in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "posts") // -> "/blog/posts"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_matches('/');
    let path = path.trim_start_matches('/');

    let mut url = String::from("/");
    if !root.is_empty() {
        url.push_str(root);
        url.push('/');
    }
    url.push_str(path);
    url
}

/// Link to one page of the listing
///
/// Page 1 is the bare listing URL so it stays canonical; later pages add
/// `?page=N`. Active filters are carried along.
///
/// # Examples
/// ```ignore
/// pagination_url("/posts", 1, &PostFilter::default()) // -> "/posts"
/// pagination_url("/posts", 3, &PostFilter::default()) // -> "/posts?page=3"
/// ```
pub fn pagination_url(base: &str, page: usize, filter: &PostFilter) -> String {
    let mut params: Vec<String> = filter
        .pairs()
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, encode_query_value(value)))
        .collect();

    if page > 1 {
        params.push(format!("page={}", page));
    }

    if params.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, params.join("&"))
    }
}

/// Link to a single post
///
/// WordPress stores non-ASCII slugs already percent-encoded, so the slug is
/// used as is.
pub fn post_url(posts_route: &str, slug: &str) -> String {
    format!("{}/{}", posts_route.trim_end_matches('/'), slug)
}

/// Encode a query string value
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
