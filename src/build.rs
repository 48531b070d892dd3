//! Static pre-rendering.
//!
//! Renders every page whose path is known ahead of time into the output
//! directory, the same pages `serve` pre-renders at startup plus home.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output()    clean / create output dir
//!     │
//!     ├── site_paths()        "/" + static_paths()
//!     │
//!     ├── render_pages()      one backend round per page ──► Vec<RenderedPage>
//!     │
//!     ├── write_page()        <output>/<path>/index.html
//!     │
//!     └── Sitemap::write()    <output>/sitemap.xml
//! ```

use crate::{
    cms::{CmsClient, ContentApi},
    config::SiteConfig,
    generator::sitemap::{Sitemap, UrlEntry},
    log,
    logger::ProgressBars,
    pages::{cart::StubCartView, render_route, static_paths},
    routes::Route,
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// One pre-rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Site-relative URL path
    pub path: String,
    pub html: String,
}

/// Build the site into `[build] output`.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    prepare_output(&config.build.output, config.build.clean)?;

    let api = CmsClient::new(&config.cms, None);
    let paths = runtime.block_on(site_paths(&api))?;

    let progress = ProgressBars::new_filtered(&[("render", paths.len()), ("write", paths.len())]);
    let advance = |index| {
        if let Some(progress) = &progress {
            progress.inc(index);
        }
    };

    let pages = runtime.block_on(render_pages(&api, paths, config, || advance(0)))?;
    for page in &pages {
        write_page(&config.build.output, page)?;
        advance(1);
    }
    if let Some(progress) = &progress {
        progress.finish();
    }

    site_sitemap(&pages, config).write(config)?;
    log!("build"; "{} pages written to {}", pages.len(), config.build.output.display());
    Ok(())
}

/// Home plus every statically known page path.
async fn site_paths(api: &dyn ContentApi) -> Result<Vec<String>> {
    let mut paths = vec!["/".to_string()];
    paths.extend(static_paths(api).await.context("Failed to list static paths")?);
    Ok(paths)
}

/// Render `paths` in order, failing on the first error. `on_rendered` runs
/// after each page.
async fn render_pages(
    api: &dyn ContentApi,
    paths: Vec<String>,
    config: &SiteConfig,
    on_rendered: impl Fn(),
) -> Result<Vec<RenderedPage>> {
    let mut pages = Vec::with_capacity(paths.len());
    for path in paths {
        let route = Route::parse(&path).with_context(|| format!("Unroutable path {path}"))?;
        let html = render_route(&route, api, &StubCartView, config)
            .await
            .with_context(|| format!("Failed to render {path}"))?;
        pages.push(RenderedPage { path, html });
        on_rendered();
    }
    Ok(pages)
}

/// Ensure the output directory exists, removing previous content when `clean`.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// File receiving the page at `path`: `<output>/<path>/index.html`.
fn page_file(output: &Path, path: &str) -> PathBuf {
    let relative = path.trim_matches('/');
    let dir = if relative.is_empty() {
        output.to_path_buf()
    } else {
        output.join(relative)
    };
    dir.join("index.html")
}

fn write_page(output: &Path, page: &RenderedPage) -> Result<()> {
    let file = page_file(output, &page.path);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&file, &page.html).with_context(|| format!("Failed to write {}", file.display()))
}

fn site_sitemap(pages: &[RenderedPage], config: &SiteConfig) -> Sitemap {
    let now = chrono::Utc::now();
    Sitemap::new(
        pages
            .iter()
            .map(|page| UrlEntry::new(config, &page.path, Some(now)))
            .collect(),
    )
}
