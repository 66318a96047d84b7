//! List CMS content

use anyhow::Result;

use crate::generator::count_text;
use crate::helpers::{format_date, to_plain_text};
use crate::wordpress::{ContentSource, PostFilter};
use crate::Site;

/// List content by type, optionally narrowed by a search query
pub async fn run(site: &Site, content_type: &str, search: Option<&str>, page: usize) -> Result<()> {
    let client = site.client()?;
    let search = search.unwrap_or("");

    match content_type {
        "post" | "posts" => {
            let filter = PostFilter {
                search: Some(search.to_string()),
                ..Default::default()
            };
            let response = client
                .get_posts_paginated(page, site.config.posts_per_page, &filter)
                .await?;
            println!(
                "Posts ({}, page {}/{}):",
                count_text(response.headers.total),
                page.max(1),
                response.headers.total_pages.max(1)
            );
            for post in response.data {
                println!(
                    "  {} - {} [{}]",
                    format_date(&post.date, "YYYY-MM-DD"),
                    to_plain_text(&post.title.rendered),
                    post.slug
                );
            }
        }
        "author" | "authors" => {
            let authors = client.search_authors(search).await?;
            println!("Authors ({}):", authors.len());
            for author in authors {
                println!("  {} [{}]", author.name, author.slug);
            }
        }
        "tag" | "tags" => {
            let mut tags = client.search_tags(search).await?;
            println!("Tags ({}):", tags.len());
            tags.sort_by(|a, b| b.count.cmp(&a.count));
            for tag in tags {
                println!("  {} ({})", to_plain_text(&tag.name), tag.count);
            }
        }
        "category" | "categories" => {
            let mut categories = client.search_categories(search).await?;
            println!("Categories ({}):", categories.len());
            categories.sort_by(|a, b| b.count.cmp(&a.count));
            for cat in categories {
                println!("  {} ({})", to_plain_text(&cat.name), cat.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, author, tag, category",
                content_type
            );
        }
    }

    Ok(())
}
