//! Generator module - builds and renders the posts listing page

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::config::{ImagePolicy, SiteConfig};
use crate::helpers::{
    date_xml, format_date, pagination_url, post_url, to_plain_text, truncate_words,
    Pagination,
};
use crate::templates::{
    CardImage, FilterData, FilterGroup, FilterOption, HiddenField, PageMeta, PostCardData,
    PostsPageData, TemplateRenderer,
};
use crate::wordpress::{Author, Category, ContentSource, Post, PostFilter, PostsResponse, Tag};
use crate::Site;

/// Category label for posts without one
const UNCATEGORIZED: &str = "Uncategorized";

/// Everything fetched for one render of the listing
#[derive(Debug, Clone)]
pub struct PostsPage {
    pub page: usize,
    pub filter: PostFilter,
    pub posts: PostsResponse,
    pub authors: Vec<Author>,
    pub tags: Vec<Tag>,
    pub categories: Vec<Category>,
}

impl PostsPage {
    /// Fetch posts and taxonomy for one page of the listing
    ///
    /// The four requests run concurrently; the first failure fails the whole
    /// load.
    pub async fn load(
        source: &dyn ContentSource,
        config: &SiteConfig,
        page: usize,
        filter: &PostFilter,
    ) -> Result<Self> {
        let page = page.max(1);
        let (posts, authors, tags, categories) = tokio::try_join!(
            source.get_posts_paginated(page, config.posts_per_page, filter),
            source.get_all_authors(),
            source.get_all_tags(),
            source.get_all_categories(),
        )?;

        tracing::debug!(
            "Loaded page {}: {} posts, {} authors, {} tags, {} categories",
            page,
            posts.data.len(),
            authors.len(),
            tags.len(),
            categories.len()
        );

        Ok(Self {
            page,
            filter: filter.clone(),
            posts,
            authors,
            tags,
            categories,
        })
    }

    /// "1 post found" / "N posts found"
    pub fn count_text(&self) -> String {
        count_text(self.posts.headers.total)
    }

    /// Build the template context
    pub fn to_page_data(&self, config: &SiteConfig, images: &ImagePolicy) -> PostsPageData {
        let posts_route = config.posts_route();
        let canonical_path = pagination_url(&posts_route, self.page, &self.filter);

        PostsPageData {
            meta: PageMeta {
                title: config.title.clone(),
                description: config.description.clone(),
                canonical: format!("{}{}", config.url.trim_end_matches('/'), canonical_path),
                language: "en".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            count_text: self.count_text(),
            posts: self
                .posts
                .data
                .iter()
                .map(|p| post_card(p, config, images, &posts_route))
                .collect(),
            filter: self.filter_data(),
            pagination: Pagination::build(
                self.page,
                self.posts.headers.total_pages,
                &posts_route,
                &self.filter,
            ),
            posts_route,
        }
    }

    fn filter_data(&self) -> FilterData {
        let author = active_value(&self.filter.author);
        let tag = active_value(&self.filter.tag);
        let category = active_value(&self.filter.category);

        let groups = vec![
            filter_group(
                "author",
                "Author",
                "All Authors",
                self.authors.iter().map(|a| (a.id, a.slug.as_str(), a.name.as_str())),
                author,
            ),
            filter_group(
                "tag",
                "Tag",
                "All Tags",
                self.tags.iter().map(|t| (t.id, t.slug.as_str(), t.name.as_str())),
                tag,
            ),
            filter_group(
                "category",
                "Category",
                "All Categories",
                self.categories
                    .iter()
                    .map(|c| (c.id, c.slug.as_str(), c.name.as_str())),
                category,
            ),
        ];

        let search_hidden = self
            .filter
            .pairs()
            .into_iter()
            .filter(|(name, _)| *name != "search")
            .map(|(name, value)| HiddenField {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();

        FilterData {
            search: active_value(&self.filter.search).to_string(),
            search_hidden,
            groups,
        }
    }
}

/// "1 post found" / "N posts found"
pub fn count_text(total: usize) -> String {
    format!("{} {} found", total, if total == 1 { "post" } else { "posts" })
}

fn active_value(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

fn filter_group<'a>(
    name: &str,
    label: &str,
    all_label: &str,
    items: impl Iterator<Item = (u64, &'a str, &'a str)>,
    active: &str,
) -> FilterGroup {
    let options = items
        .map(|(id, slug, item_name)| {
            let value = if slug.is_empty() {
                id.to_string()
            } else {
                slug.to_string()
            };
            FilterOption {
                selected: !active.is_empty() && (value == active || id.to_string() == active),
                label: to_plain_text(item_name),
                value,
            }
        })
        .collect();

    FilterGroup {
        name: name.to_string(),
        label: label.to_string(),
        all_label: all_label.to_string(),
        options,
    }
}

/// Card view of a single post
fn post_card(
    post: &Post,
    config: &SiteConfig,
    images: &ImagePolicy,
    posts_route: &str,
) -> PostCardData {
    let image = post
        .featured_image()
        .filter(|media| {
            let allowed = images.allows(&media.source_url);
            if !allowed {
                tracing::debug!("Skipping image outside allow-list: {}", media.source_url);
            }
            allowed
        })
        .map(|media| CardImage {
            src: media.source_url.clone(),
            alt: media.alt_text.clone(),
        });

    let category = post
        .terms("category")
        .first()
        .map(|t| to_plain_text(&t.name))
        .unwrap_or_else(|| UNCATEGORIZED.to_string());

    let slug = if post.slug.is_empty() {
        post.id.to_string()
    } else {
        post.slug.clone()
    };

    PostCardData {
        id: post.id,
        title: to_plain_text(&post.title.rendered),
        excerpt: truncate_words(
            &to_plain_text(&post.excerpt.rendered),
            config.excerpt_words,
            None,
        ),
        url: post_url(posts_route, &slug),
        date: format_date(&post.date, &config.date_format),
        datetime: date_xml(&post.date),
        category,
        author: post.author_name().map(to_plain_text),
        image,
    }
}

/// Static site generator for the posts listing
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    images: ImagePolicy,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
            images: site.config.image_policy()?,
        })
    }

    /// Fetch and render one page of the listing
    pub async fn render_posts(
        &self,
        source: &dyn ContentSource,
        page: usize,
        filter: &PostFilter,
    ) -> Result<String> {
        let loaded = PostsPage::load(source, &self.site.config, page, filter).await?;
        self.render_loaded(&loaded)
    }

    /// Render already fetched data
    pub fn render_loaded(&self, loaded: &PostsPage) -> Result<String> {
        let data = loaded.to_page_data(&self.site.config, &self.images);
        self.renderer.render("posts.html", &data.to_context()?)
    }

    /// Render the static listing (page 1, no filters) into the public directory
    pub async fn generate(&self, source: &dyn ContentSource) -> Result<PathBuf> {
        let html = self.render_posts(source, 1, &PostFilter::default()).await?;

        let output_path = self
            .site
            .public_dir
            .join(self.site.config.posts_dir.trim_matches('/'))
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordpress::{Embedded, FeaturedMedia, PageHeaders, Rendered, Term};
    use chrono::NaiveDate;

    fn post(id: u64, image: Option<&str>) -> Post {
        Post {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            slug: format!("post-{}", id),
            link: String::new(),
            title: Rendered {
                rendered: "Hello &amp; welcome".to_string(),
            },
            excerpt: Rendered {
                rendered: "<p>one two three four five six seven eight nine ten eleven twelve thirteen</p>"
                    .to_string(),
            },
            content: Rendered::default(),
            author: 1,
            categories: vec![3],
            tags: Vec::new(),
            featured_media: 0,
            embedded: Some(Embedded {
                author: Vec::new(),
                featured_media: image
                    .map(|src| FeaturedMedia {
                        id: 9,
                        source_url: src.to_string(),
                        alt_text: "cover".to_string(),
                    })
                    .into_iter()
                    .collect(),
                terms: vec![vec![Term {
                    id: 3,
                    name: "News &amp; Notes".to_string(),
                    slug: "news".to_string(),
                    taxonomy: "category".to_string(),
                }]],
            }),
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            wordpress_url: Some("https://cms.example.com".to_string()),
            ..Default::default()
        }
    }

    fn page(posts: Vec<Post>, total: usize, total_pages: usize) -> PostsPage {
        PostsPage {
            page: 1,
            filter: PostFilter::default(),
            posts: PostsResponse {
                data: posts,
                headers: PageHeaders { total, total_pages },
            },
            authors: Vec::new(),
            tags: vec![Tag {
                id: 7,
                name: "Rust".to_string(),
                slug: "rust".to_string(),
                count: 1,
                description: String::new(),
            }],
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_count_text() {
        assert_eq!(count_text(0), "0 posts found");
        assert_eq!(count_text(1), "1 post found");
        assert_eq!(count_text(27), "27 posts found");
    }

    #[test]
    fn test_post_card() {
        let config = config();
        let images = config.image_policy().unwrap();
        let card = post_card(
            &post(1, Some("https://cms.example.com/wp-content/uploads/a.jpg")),
            &config,
            &images,
            "/posts",
        );
        assert_eq!(card.title, "Hello & welcome");
        assert_eq!(
            card.excerpt,
            "one two three four five six seven eight nine ten eleven twelve..."
        );
        assert_eq!(card.url, "/posts/post-1");
        assert_eq!(card.date, "January 5, 2024");
        assert_eq!(card.category, "News & Notes");
        assert_eq!(card.image.unwrap().alt, "cover");
    }

    #[test]
    fn test_post_card_drops_foreign_image() {
        let config = config();
        let images = config.image_policy().unwrap();
        let card = post_card(
            &post(1, Some("https://tracker.example.net/a.jpg")),
            &config,
            &images,
            "/posts",
        );
        assert!(card.image.is_none());
    }

    #[test]
    fn test_page_data_without_pagination() {
        let config = config();
        let images = config.image_policy().unwrap();
        let data = page(vec![post(1, None)], 1, 1).to_page_data(&config, &images);
        assert_eq!(data.count_text, "1 post found");
        assert!(data.pagination.is_none());
        assert_eq!(data.meta.canonical, "http://localhost:4000/posts");
        assert_eq!(data.filter.groups.len(), 3);
        assert_eq!(data.filter.groups[1].options[0].value, "rust");
    }

    #[test]
    fn test_page_data_marks_selected_filter() {
        let config = config();
        let images = config.image_policy().unwrap();
        let mut loaded = page(vec![post(1, None)], 20, 3);
        loaded.filter.tag = Some("rust".to_string());
        let data = loaded.to_page_data(&config, &images);

        assert!(data.filter.groups[1].options[0].selected);
        assert_eq!(data.filter.search_hidden.len(), 1);
        let pagination = data.pagination.unwrap();
        assert_eq!(pagination.next_link.as_deref(), Some("/posts?tag=rust&page=2"));
    }
}
