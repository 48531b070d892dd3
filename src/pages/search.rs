//! `/search?q=`: full-text search over product titles, per request.

use super::write_product_list;
use crate::{
    cms::{CmsError, ContentApi, Predicate, ProductListing, decode_all},
    config::SiteConfig,
    render::{
        PageShell,
        common::{write_empty_elem, write_end, write_raw, write_start},
    },
    seo::SeoMeta,
};
use anyhow::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchProps {
    pub query: Option<String>,
    pub search_results: Vec<ProductListing>,
}

/// An absent or empty query returns no results without calling the backend.
/// Anything else is sent verbatim, whitespace included.
pub async fn load(api: &dyn ContentApi, query: Option<&str>) -> Result<SearchProps, CmsError> {
    let Some(q) = query.filter(|q| !q.is_empty()) else {
        return Ok(SearchProps::default());
    };

    let documents = api
        .query(&[
            Predicate::document_type("product"),
            Predicate::fulltext("my.product.title", q),
        ])
        .await?;

    Ok(SearchProps {
        query: Some(q.to_string()),
        search_results: decode_all(documents)?,
    })
}

pub fn render(props: &SearchProps, config: &SiteConfig) -> Result<String> {
    let meta = SeoMeta::new("Search").noindex();
    PageShell::new(&meta, config).render(config, |writer| {
        write_start(writer, "form", &[("method", "get"), ("action", "/search")])?;
        write_empty_elem(writer, "input", &[("type", "text"), ("name", "q")])?;
        write_start(writer, "button", &[("type", "submit")])?;
        write_raw(writer, "Search")?;
        write_end(writer, "button")?;
        write_end(writer, "form")?;

        write_product_list(writer, &props.search_results)
    })
}
