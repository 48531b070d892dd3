//! Error pages: 404 for unknown routes and missing documents, 500 otherwise.

use crate::{
    cms::CmsError,
    config::SiteConfig,
    render::{
        PageShell,
        common::{write_link, write_text_element},
    },
    seo::SeoMeta,
};
use anyhow::Result;

/// Whether a page failure means the requested document does not exist.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CmsError>()
        .is_some_and(CmsError::is_not_found)
}

fn render_message(config: &SiteConfig, title: &str, message: &str) -> Result<String> {
    PageShell::new(&SeoMeta::new(title).noindex(), config).render(config, |writer| {
        write_text_element(writer, "h1", title)?;
        write_text_element(writer, "p", message)?;
        write_link(writer, "/", "Back to the store")
    })
}

pub fn render_not_found(config: &SiteConfig) -> Result<String> {
    render_message(
        config,
        "Page not found",
        "The page you are looking for does not exist.",
    )
}

pub fn render_failure(config: &SiteConfig) -> Result<String> {
    render_message(
        config,
        "Something went wrong",
        "We could not load this page. Please try again.",
    )
}
