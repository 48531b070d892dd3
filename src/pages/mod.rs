//! Storefront pages.
//!
//! Each page module pairs a loader, which turns route parameters into props
//! through [`ContentApi`], with a pure renderer from props to HTML.
//!
//! | Page     | Loader calls                                   | Refresh policy          |
//! |----------|------------------------------------------------|-------------------------|
//! | home     | products                                       | per request             |
//! | search   | none for an empty `q`, else fulltext on title  | per request             |
//! | category | category by uid, then products by category id  | revalidate, with paths  |
//! | product  | product by uid                                 | revalidate, no paths    |
//!
//! Loaders never catch backend errors; they reach the server unchanged.

pub mod cart;
pub mod category;
pub mod error;
pub mod fallback;
pub mod home;
pub mod product;
pub mod search;

use crate::{
    cms::{ContentApi, ProductListing},
    config::SiteConfig,
    render::{
        XmlWriter,
        common::{write_end, write_link, write_start},
    },
    routes::Route,
};
use anyhow::{Result, bail};
use cart::CartViewLoader;
use std::time::Duration;

/// When a page is (re)generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Rendered for every request, never cached.
    PerRequest,
    /// Cached and regenerated in the background once older than `ttl`.
    /// Unknown paths are generated on demand behind a placeholder.
    Revalidate { ttl: Duration },
}

impl RefreshPolicy {
    pub fn for_route(route: &Route, config: &SiteConfig) -> Self {
        match route {
            Route::Category { .. } => Self::Revalidate {
                ttl: config.pages.category_ttl(),
            },
            Route::Product {
                add_to_cart: false, ..
            } => Self::Revalidate {
                ttl: config.pages.product_ttl(),
            },
            _ => Self::PerRequest,
        }
    }

    pub const fn ttl(self) -> Option<Duration> {
        match self {
            Self::PerRequest => None,
            Self::Revalidate { ttl } => Some(ttl),
        }
    }
}

/// Load and render the page behind `route`.
///
/// The cart view is loaded only for a product route with the add-to-cart
/// flag set.
pub async fn render_route(
    route: &Route,
    api: &dyn ContentApi,
    cart: &dyn CartViewLoader,
    config: &SiteConfig,
) -> Result<String> {
    match route {
        Route::Home => home::render(&home::load(api).await?, config),
        Route::Search { query } => search::render(&search::load(api, query.as_deref()).await?, config),
        Route::Category { slug } => category::render(&category::load(api, slug).await?, config),
        Route::Product { slug, add_to_cart } => {
            let props = product::load(api, slug).await?;
            let view = if *add_to_cart {
                Some(cart.load().await?)
            } else {
                None
            };
            product::render(&props, view.as_ref(), config)
        }
        Route::Sitemap => bail!("{} is not a page", route.href()),
    }
}

/// Every statically known page path, for pre-rendering.
pub async fn static_paths(api: &dyn ContentApi) -> Result<Vec<String>> {
    let mut paths: Vec<String> = category::paths(api)
        .await?
        .iter()
        .map(|slug| Route::category_href(slug))
        .collect();
    paths.extend(product::paths().iter().map(|slug| Route::product_href(slug)));
    Ok(paths)
}

/// `<ul>` of product links titled by their plain-text title.
pub(crate) fn write_product_list(writer: &mut XmlWriter, products: &[ProductListing]) -> Result<()> {
    write_start(writer, "ul", &[])?;
    for product in products {
        write_start(writer, "li", &[])?;
        write_link(
            writer,
            &Route::product_href(product.slug()),
            &product.data.title.as_text(" "),
        )?;
        write_end(writer, "li")?;
    }
    write_end(writer, "ul")
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::SiteConfig;

    /// Default config with minification off, so markup can be matched exactly.
    pub fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.minify = false;
        config
    }
}
