//! `/catalog/categories/<slug>`: one category and its products.

use super::write_product_list;
use crate::{
    cms::{Category, CategoryData, CmsError, ContentApi, Predicate, ProductListing, decode_all},
    config::SiteConfig,
    render::{PageShell, common::write_text_element},
    seo::SeoMeta,
};
use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProps {
    pub category: Category,
    pub products: Vec<ProductListing>,
}

/// Resolve the category, then query its products.
///
/// The relationship field stores document ids, so products are filtered by
/// the resolved category's id and never by its slug.
pub async fn load(api: &dyn ContentApi, slug: &str) -> Result<CategoryProps, CmsError> {
    let category = api
        .get_by_uid("category", slug)
        .await?
        .decode::<CategoryData>()?;

    let documents = api
        .query(&[
            Predicate::document_type("product"),
            Predicate::at("my.product.category", category.id.as_str()),
        ])
        .await?;

    Ok(CategoryProps {
        category,
        products: decode_all(documents)?,
    })
}

/// Slugs of every category, pre-rendered at startup and by `build`.
pub async fn paths(api: &dyn ContentApi) -> Result<Vec<String>, CmsError> {
    let categories = api.query(&[Predicate::document_type("category")]).await?;
    Ok(categories.into_iter().filter_map(|doc| doc.uid).collect())
}

pub fn render(props: &CategoryProps, config: &SiteConfig) -> Result<String> {
    let title = props.category.data.title.as_text(" ");
    PageShell::new(&SeoMeta::new(&title), config).render(config, |writer| {
        write_text_element(writer, "h1", &title)?;
        write_product_list(writer, &props.products)
    })
}
