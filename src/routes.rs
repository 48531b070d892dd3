//! Storefront URL space.
//!
//! | Path                          | Page     |
//! |-------------------------------|----------|
//! | `/`                           | home     |
//! | `/search?q=<text>`            | search   |
//! | `/catalog/categories/<slug>`  | category |
//! | `/catalog/product/<slug>`     | product  |
//! | `/sitemap.xml`                | sitemap  |

use std::borrow::Cow;

/// Query flag that mounts the add-to-cart view on a product page.
pub const ADD_TO_CART_PARAM: &str = "add-to-cart";

const CATEGORY_PREFIX: &str = "/catalog/categories/";
const PRODUCT_PREFIX: &str = "/catalog/product/";

/// A parsed storefront route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search { query: Option<String> },
    Category { slug: String },
    Product { slug: String, add_to_cart: bool },
    Sitemap,
}

impl Route {
    /// Parse a request target (`/path?query`). `None` for unknown paths.
    pub fn parse(target: &str) -> Option<Self> {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => Some(Self::Home),
            "/search" => Some(Self::Search {
                query: query_param(query, "q"),
            }),
            "/sitemap.xml" => Some(Self::Sitemap),
            _ => {
                if let Some(slug) = single_segment(path, CATEGORY_PREFIX) {
                    Some(Self::Category { slug })
                } else {
                    single_segment(path, PRODUCT_PREFIX).map(|slug| Self::Product {
                        slug,
                        add_to_cart: query_param(query, ADD_TO_CART_PARAM)
                            .is_some_and(|v| !v.is_empty() && v != "0"),
                    })
                }
            }
        }
    }

    /// Route serving the document with the given type and uid, if any.
    pub fn for_document(kind: &str, uid: &str) -> Option<Self> {
        match kind {
            "category" => Some(Self::Category { slug: uid.into() }),
            "product" => Some(Self::Product {
                slug: uid.into(),
                add_to_cart: false,
            }),
            _ => None,
        }
    }

    /// Category link for a slug.
    pub fn category_href(slug: &str) -> String {
        format!("{CATEGORY_PREFIX}{}", urlencoding::encode(slug))
    }

    /// Product link for a slug.
    pub fn product_href(slug: &str) -> String {
        format!("{PRODUCT_PREFIX}{}", urlencoding::encode(slug))
    }

    /// Link to this route.
    pub fn href(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Search { query: None } => "/search".into(),
            Self::Search { query: Some(q) } => format!("/search?q={}", urlencoding::encode(q)),
            Self::Category { slug } => Self::category_href(slug),
            Self::Product { slug, add_to_cart } => {
                let href = Self::product_href(slug);
                if *add_to_cart {
                    format!("{href}?{ADD_TO_CART_PARAM}=1")
                } else {
                    href
                }
            }
            Self::Sitemap => "/sitemap.xml".into(),
        }
    }

    /// Cache key of a statically generated page; `None` for per-request pages.
    pub fn static_key(&self) -> Option<String> {
        match self {
            Self::Category { slug } => Some(Self::category_href(slug)),
            Self::Product {
                slug,
                add_to_cart: false,
            } => Some(Self::product_href(slug)),
            _ => None,
        }
    }
}

/// Extract `<prefix><segment>` where the segment is non-empty and has no `/`.
fn single_segment(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(decode_component(rest).into_owned())
}

/// First value of `name` in a form-encoded query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode_component(key) == name)
        .map(|(_, value)| decode_component(value).into_owned())
}

/// Percent-decode a form component (`+` is a space). Invalid input is kept as-is.
fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Owned(spaced),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_home() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("/?utm=1"), Some(Route::Home));
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            Route::parse("/search"),
            Some(Route::Search { query: None })
        );
        assert_eq!(
            Route::parse("/search?q="),
            Some(Route::Search {
                query: Some(String::new())
            })
        );
        assert_eq!(
            Route::parse("/search?page=2&q=wireless+mouse%21"),
            Some(Route::Search {
                query: Some("wireless mouse!".into())
            })
        );
    }

    #[test]
    fn test_parse_category_and_product() {
        assert_eq!(
            Route::parse("/catalog/categories/mouses/"),
            Some(Route::Category {
                slug: "mouses".into()
            })
        );
        assert_eq!(
            Route::parse("/catalog/product/wireless-mouse"),
            Some(Route::Product {
                slug: "wireless-mouse".into(),
                add_to_cart: false
            })
        );
        assert_eq!(
            Route::parse("/catalog/product/wireless-mouse?add-to-cart=1"),
            Some(Route::Product {
                slug: "wireless-mouse".into(),
                add_to_cart: true
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_nested() {
        assert_eq!(Route::parse("/catalog/product/"), None);
        assert_eq!(Route::parse("/catalog/product/a/b"), None);
        assert_eq!(Route::parse("/about"), None);
    }

    #[test]
    fn test_href_round_trip() {
        let routes = [
            Route::Home,
            Route::Search {
                query: Some("café & bar".into()),
            },
            Route::Category {
                slug: "mouses".into(),
            },
            Route::Product {
                slug: "wireless-mouse".into(),
                add_to_cart: true,
            },
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.href()), Some(route));
        }
    }

    #[test]
    fn test_static_key() {
        assert_eq!(Route::Home.static_key(), None);
        assert_eq!(
            Route::Search { query: None }.static_key(),
            None
        );
        assert_eq!(
            Route::Category { slug: "a".into() }.static_key().as_deref(),
            Some("/catalog/categories/a")
        );
        assert_eq!(
            Route::Product {
                slug: "b".into(),
                add_to_cart: true
            }
            .static_key(),
            None
        );
    }

    #[test]
    fn test_for_document() {
        assert_eq!(
            Route::for_document("product", "p1").map(|r| r.href()).as_deref(),
            Some("/catalog/product/p1")
        );
        assert_eq!(Route::for_document("page", "about"), None);
    }
}
