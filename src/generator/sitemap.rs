//! Sitemap generation.
//!
//! Lists the statically generated pages (home and categories) for search
//! engines. `build` writes it next to the pages; `serve` answers
//! `/sitemap.xml` from the page cache.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://shop.example.com/catalog/categories/mouses</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    log,
    utils::minify::{MinifyType, minify},
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// Absolute URL
    pub loc: String,
    /// `YYYY-MM-DD`
    pub lastmod: Option<String>,
}

impl UrlEntry {
    /// Entry for a site-relative `path` rendered at `rendered_at`.
    pub fn new(config: &SiteConfig, path: &str, rendered_at: Option<DateTime<Utc>>) -> Self {
        Self {
            loc: format!("{}{}", config.site.url.trim_end_matches('/'), path),
            lastmod: rendered_at.map(|at| at.format("%Y-%m-%d").to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

impl Sitemap {
    pub fn new(urls: Vec<UrlEntry>) -> Self {
        Self { urls }
    }

    /// Generate sitemap XML, minified when `[build] minify` is set.
    pub fn to_xml(&self, config: &SiteConfig) -> Vec<u8> {
        let xml = self.to_xml_string();
        minify(MinifyType::Xml(xml.as_bytes()), config).into_owned()
    }

    fn to_xml_string(&self) -> String {
        let mut xml = String::with_capacity(256 + self.urls.len() * 96);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in &self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = &entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write to `[build] sitemap.path` inside the output directory, if enabled.
    pub fn write(&self, config: &SiteConfig) -> Result<()> {
        if !config.build.sitemap.enable {
            return Ok(());
        }

        let sitemap_path = config.sitemap_path();
        fs::write(&sitemap_path, self.to_xml(config))
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{} urls", self.urls.len());
        Ok(())
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
