//! HTML document rendering.
//!
//! Pages write their body through the quick-xml helpers in [`common`];
//! [`PageShell`] wraps it in the document, head tags included.
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="..">
//!   <head> charset, viewport, [refresh], SEO tags, icon </head>
//!   <body><main> page body </main></body>
//! </html>
//! ```

pub mod common;
mod head;

pub use common::XmlWriter;

use crate::{
    config::SiteConfig,
    seo::{SeoMeta, TagSet, build_seo_tags},
    utils::minify::{MinifyType, minify},
};
use anyhow::{Context, Result};
use common::{create_writer, into_string, write_end, write_raw, write_start};

/// Document wrapper around a page body.
#[derive(Debug, Clone)]
pub struct PageShell {
    tags: TagSet,
    refresh: Option<u64>,
}

impl PageShell {
    pub fn new(meta: &SeoMeta, config: &SiteConfig) -> Self {
        Self {
            tags: build_seo_tags(meta, config),
            refresh: None,
        }
    }

    /// Ask the browser to reload after `seconds`.
    pub fn refresh(mut self, seconds: u64) -> Self {
        self.refresh = Some(seconds);
        self
    }

    /// Render the document, minified when `[build] minify` is set.
    pub fn render<F>(self, config: &SiteConfig, body: F) -> Result<String>
    where
        F: FnOnce(&mut XmlWriter) -> Result<()>,
    {
        let mut writer = create_writer();
        write_raw(&mut writer, "<!DOCTYPE html>")?;
        write_start(&mut writer, "html", &[("lang", &config.site.language)])?;
        head::write_head(&mut writer, &self.tags, self.refresh)?;

        write_start(&mut writer, "body", &[])?;
        write_start(&mut writer, "main", &[])?;
        body(&mut writer)?;
        write_end(&mut writer, "main")?;
        write_end(&mut writer, "body")?;
        write_end(&mut writer, "html")?;

        let html = into_string(writer)?;
        let minified = minify(MinifyType::Html(html.as_bytes()), config);
        String::from_utf8(minified.into_owned()).context("Minified HTML is not valid UTF-8")
    }
}
