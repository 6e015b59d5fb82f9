//! Routes - the site's logical destinations
//!
//! Five route shapes cover the whole site: the three section pages, the
//! blog index, and one post page per registered slug. Each route knows its
//! URL, its output file, and which navigation entry it lights up.

use std::path::PathBuf;

use crate::content::MetadataTable;

/// One logical destination on the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Projects,
    BlogIndex,
    BlogPost { slug: String },
}

impl Route {
    /// Site-relative URL, always with a trailing slash
    pub fn url(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about/".to_string(),
            Route::Projects => "/projects/".to_string(),
            Route::BlogIndex => "/blog/".to_string(),
            Route::BlogPost { slug } => format!("/blog/{}/", slug),
        }
    }

    /// Output file under the public directory
    pub fn output_path(&self) -> PathBuf {
        match self {
            Route::Home => PathBuf::from("index.html"),
            Route::About => PathBuf::from("about/index.html"),
            Route::Projects => PathBuf::from("projects/index.html"),
            Route::BlogIndex => PathBuf::from("blog/index.html"),
            Route::BlogPost { slug } => PathBuf::from(format!("blog/{}/index.html", slug)),
        }
    }

    /// Navigation entry the route highlights
    pub fn nav(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::About => "about",
            Route::Projects => "projects",
            Route::BlogIndex | Route::BlogPost { .. } => "blog",
        }
    }

    /// Map a request path back to a route. Trailing slashes and an
    /// `index.html` suffix are ignored. Post paths resolve only for slugs
    /// the metadata table knows.
    pub fn resolve(path: &str, table: &MetadataTable) -> Option<Route> {
        let trimmed = path
            .trim_start_matches('/')
            .trim_end_matches("index.html")
            .trim_matches('/');

        match trimmed {
            "" => Some(Route::Home),
            "about" => Some(Route::About),
            "projects" => Some(Route::Projects),
            "blog" => Some(Route::BlogIndex),
            other => {
                let slug = other.strip_prefix("blog/")?;
                if table.slugs.contains_key(slug) {
                    Some(Route::BlogPost {
                        slug: slug.to_string(),
                    })
                } else {
                    None
                }
            }
        }
    }
}

/// Every page the generator emits: the four fixed routes plus one post page
/// per registered slug, in the table's stored order
pub fn route_table(table: &MetadataTable) -> Vec<Route> {
    let mut routes = vec![
        Route::Home,
        Route::About,
        Route::Projects,
        Route::BlogIndex,
    ];
    for slug in table.slugs.keys() {
        routes.push(Route::BlogPost { slug: slug.clone() });
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MetadataTable {
        MetadataTable::parse(
            r#"{
                "slugs": { "intro": "intro.ipynb", "deep-dive": "deep.ipynb" },
                "posts": []
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_urls_and_output_paths() {
        assert_eq!(Route::Home.url(), "/");
        assert_eq!(Route::Home.output_path(), PathBuf::from("index.html"));
        assert_eq!(Route::BlogIndex.url(), "/blog/");
        let post = Route::BlogPost {
            slug: "intro".to_string(),
        };
        assert_eq!(post.url(), "/blog/intro/");
        assert_eq!(post.output_path(), PathBuf::from("blog/intro/index.html"));
    }

    #[test]
    fn test_resolve_fixed_routes() {
        let table = table();
        assert_eq!(Route::resolve("/", &table), Some(Route::Home));
        assert_eq!(Route::resolve("/index.html", &table), Some(Route::Home));
        assert_eq!(Route::resolve("/about/", &table), Some(Route::About));
        assert_eq!(Route::resolve("about", &table), Some(Route::About));
        assert_eq!(Route::resolve("/blog", &table), Some(Route::BlogIndex));
        assert_eq!(
            Route::resolve("/blog/index.html", &table),
            Some(Route::BlogIndex)
        );
    }

    #[test]
    fn test_resolve_post_routes() {
        let table = table();
        assert_eq!(
            Route::resolve("/blog/intro/", &table),
            Some(Route::BlogPost {
                slug: "intro".to_string()
            })
        );
        assert_eq!(Route::resolve("/blog/nope/", &table), None);
        assert_eq!(Route::resolve("/whatever", &table), None);
    }

    #[test]
    fn test_route_table_covers_every_slug_in_order() {
        let routes = route_table(&table());
        assert_eq!(routes.len(), 6);
        assert_eq!(routes[0], Route::Home);
        assert_eq!(
            routes[4],
            Route::BlogPost {
                slug: "intro".to_string()
            }
        );
        assert_eq!(
            routes[5],
            Route::BlogPost {
                slug: "deep-dive".to_string()
            }
        );
    }

    #[test]
    fn test_nav_groups_posts_under_blog() {
        let post = Route::BlogPost {
            slug: "intro".to_string(),
        };
        assert_eq!(post.nav(), "blog");
        assert_eq!(Route::Projects.nav(), "projects");
    }
}
