//! `/`: every product, loaded per request.

use super::write_product_list;
use crate::{
    cms::{CmsError, ContentApi, Predicate, ProductListing, decode_all},
    config::SiteConfig,
    render::{
        PageShell,
        common::{write_end, write_start, write_text_element},
    },
    seo::SeoMeta,
};
use anyhow::Result;

pub const TITLE: &str = "DevCommerce, your best e-commerce";

#[derive(Debug, Clone, PartialEq)]
pub struct HomeProps {
    pub recommended_products: Vec<ProductListing>,
}

pub async fn load(api: &dyn ContentApi) -> Result<HomeProps, CmsError> {
    let documents = api.query(&[Predicate::document_type("product")]).await?;
    Ok(HomeProps {
        recommended_products: decode_all(documents)?,
    })
}

pub fn render(props: &HomeProps, config: &SiteConfig) -> Result<String> {
    let meta = SeoMeta::new(TITLE).without_title_suffix();
    PageShell::new(&meta, config).render(config, |writer| {
        write_start(writer, "section", &[])?;
        write_text_element(writer, "h1", "Products")?;
        write_product_list(writer, &props.recommended_products)?;
        write_end(writer, "section")
    })
}
