//! List site content

use anyhow::Result;
use std::fs;

use crate::content::MetadataTable;
use crate::routes::route_table;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let metadata_path = folio
        .content_dir
        .join(&folio.config.blog_dir)
        .join("metadata.json");
    let raw = fs::read_to_string(&metadata_path)?;
    let table = MetadataTable::parse(&raw)?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", table.posts.len());
            for post in &table.posts {
                println!(
                    "  {} - {} [{}]",
                    post.publish_date.format("%Y-%m-%d"),
                    post.title,
                    post.notebook
                );
            }
        }
        "route" | "routes" => {
            let routes = route_table(&table);
            println!("Routes ({}):", routes.len());
            for route in &routes {
                println!("  {} -> {}", route.url(), route.output_path().display());
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    }

    Ok(())
}
