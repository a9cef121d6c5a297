//! Content loaded from disk at startup.
//!
//! - `pages/*.md` - markdown pages with YAML frontmatter (about, help)
//! - `catalog.json` - the shops and items shown to customers

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use localazy_core::catalog::Catalog;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Catalog file name inside the content directory.
pub const CATALOG_FILE: &str = "catalog.json";

/// Metadata for static pages
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Content store that holds all loaded content in memory
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
    catalog: Arc<Catalog>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory cannot be read or the catalog
    /// is missing or malformed.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages = Self::load_pages(&content_dir.join("pages"))?;
        let catalog = load_catalog(&content_dir.join(CATALOG_FILE))?;

        tracing::info!(
            pages = pages.len(),
            shops = catalog.shops().len(),
            "Content loaded"
        );

        Ok(Self {
            pages: Arc::new(pages),
            catalog: Arc::new(catalog),
        })
    }

    /// A store with no pages, serving `catalog`.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            pages: Arc::new(HashMap::new()),
            catalog: Arc::new(catalog),
        }
    }

    /// Load all pages from the pages directory
    fn load_pages(dir: &Path) -> Result<HashMap<String, Page>, ContentError> {
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(pages);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path) {
                    Ok(page) => {
                        tracing::debug!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load page {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(pages)
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        parse_page(slug, &content)
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Parse frontmatter and render the markdown body of one page.
fn parse_page(slug: String, content: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug,
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

fn load_catalog(path: &Path) -> Result<Catalog, ContentError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ContentError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| ContentError::Parse(format!("{}: {e}", path.display())))
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use localazy_core::ShopId;

    use super::*;

    fn content_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("content")
    }

    #[test]
    fn test_parse_page_renders_markdown() {
        let page = parse_page(
            "help".to_string(),
            "---\ntitle: Help\ndescription: Answers\n---\n# Ordering\n\nPick a **shop**.\n",
        )
        .unwrap();
        assert_eq!(page.meta.title, "Help");
        assert!(page.content_html.contains("<strong>shop</strong>"));
        assert!(page.content_html.contains("<h1"));
    }

    #[test]
    fn test_parse_page_requires_frontmatter() {
        assert!(parse_page("x".to_string(), "no frontmatter here").is_err());
    }

    #[test]
    fn test_load_bundled_content() {
        let store = ContentStore::load(&content_dir()).unwrap();
        assert!(store.get_page("about").is_some());
        assert!(store.get_page("help").is_some());
        assert_eq!(store.catalog().shops().len(), 3);
        let bakery = store.catalog().shop(ShopId::new(3)).unwrap();
        assert_eq!(bakery.name, "Sweet Delight Bakery");
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let err = ContentStore::load(Path::new("/nonexistent/content")).unwrap_err();
        assert!(matches!(err, ContentError::Io(_)));
    }
}
