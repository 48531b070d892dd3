//! `/catalog/product/<slug>`: product detail with the add-to-cart action.

use super::cart::ViewDescriptor;
use crate::{
    cms::{CmsError, ContentApi, Product, ProductData},
    config::SiteConfig,
    render::{
        PageShell,
        common::{write_empty_elem, write_end, write_raw, write_start, write_text_element},
    },
    routes::{ADD_TO_CART_PARAM, Route},
    seo::SeoMeta,
};
use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductProps {
    pub product: Product,
}

/// The lookup result, with only its payload typed.
pub async fn load(api: &dyn ContentApi, slug: &str) -> Result<ProductProps, CmsError> {
    let product = api
        .get_by_uid("product", slug)
        .await?
        .decode::<ProductData>()?;
    Ok(ProductProps { product })
}

/// No product is pre-rendered; every slug is generated on first request.
pub fn paths() -> Vec<String> {
    Vec::new()
}

pub fn render(props: &ProductProps, cart: Option<&ViewDescriptor>, config: &SiteConfig) -> Result<String> {
    let product = &props.product;
    let title = product.data.title.as_text(" ");
    let summary = product.data.description.as_text(" ");

    let mut meta = SeoMeta::new(&title);
    if !summary.is_empty() {
        meta = meta.description(summary);
    }

    PageShell::new(&meta, config).render(config, |writer| {
        write_start(writer, "div", &[])?;
        write_text_element(writer, "h1", &title)?;
        write_empty_elem(
            writer,
            "img",
            &[
                ("src", &product.data.thumbnail.url),
                ("width", "600"),
                ("alt", ""),
            ],
        )?;

        // CMS-authored markup, inserted unescaped
        write_start(writer, "div", &[])?;
        write_raw(writer, &product.data.description.as_html())?;
        write_end(writer, "div")?;

        write_text_element(writer, "p", &format!("Price: ${}", product.data.price))?;

        let action = Route::product_href(product.slug());
        write_start(writer, "form", &[("method", "get"), ("action", &action)])?;
        write_empty_elem(
            writer,
            "input",
            &[("type", "hidden"), ("name", ADD_TO_CART_PARAM), ("value", "1")],
        )?;
        write_text_element(writer, "button", "Add To Cart")?;
        write_end(writer, "form")?;

        if let Some(view) = cart {
            view.write(writer)?;
        }
        write_end(writer, "div")
    })
}
