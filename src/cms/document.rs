//! Content documents and their typed payloads.
//!
//! Documents arrive with an untyped `data` payload. Before anything reads
//! a field, the payload is decoded into the record a page needs
//! (`ProductData`, `ProductSummary`, `CategoryData`). A document missing a
//! field that record requires fails there, with a [`DecodeError`] naming
//! the document.

use super::error::DecodeError;
use super::richtext::RichText;
use crate::routes::Route;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A content document as served by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document<T = Value> {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    pub data: T,
}

/// Typed payload of one document type.
pub trait DocumentType: DeserializeOwned {
    /// Type tag the payload belongs to.
    const TYPE: &'static str;
}

impl Document {
    /// Decode the payload as `T`, checking the type tag first.
    pub fn decode<T: DocumentType>(self) -> Result<Document<T>, DecodeError> {
        if self.kind != T::TYPE {
            return Err(DecodeError::WrongType {
                id: self.id,
                expected: T::TYPE,
                found: self.kind,
            });
        }

        let data = serde_json::from_value(self.data).map_err(|source| DecodeError::Payload {
            id: self.id.clone(),
            kind: self.kind.clone(),
            source,
        })?;

        Ok(Document {
            id: self.id,
            uid: self.uid,
            kind: self.kind,
            href: self.href,
            tags: self.tags,
            lang: self.lang,
            first_publication_date: self.first_publication_date,
            last_publication_date: self.last_publication_date,
            data,
        })
    }
}

impl<T> Document<T> {
    /// Slug used in storefront URLs; empty when the document has no uid.
    pub fn slug(&self) -> &str {
        self.uid.as_deref().unwrap_or_default()
    }
}

/// Decode a whole result list, failing on the first bad document.
pub fn decode_all<T: DocumentType>(documents: Vec<Document>) -> Result<Vec<Document<T>>, DecodeError> {
    documents.into_iter().map(Document::decode).collect()
}

// ============================================================================
// Field types
// ============================================================================

/// Image field. An unset image arrives as `{}` and fails to decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Relationship field. Only `id` is reliable for filtering; an unset link
/// carries nothing but `link_type`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentLink {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "isBroken", default)]
    pub is_broken: bool,
}

impl DocumentLink {
    /// Storefront URL of the linked document, if it is a page we serve.
    pub fn href(&self) -> Option<String> {
        if self.is_broken {
            return None;
        }
        Route::for_document(self.kind.as_deref()?, self.uid.as_deref()?).map(|r| r.href())
    }
}

// ============================================================================
// Document types
// ============================================================================

/// `product` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductData {
    pub title: RichText,
    #[serde(default)]
    pub description: RichText,
    pub thumbnail: Image,
    pub price: f64,
    #[serde(default)]
    pub category: Option<DocumentLink>,
}

impl DocumentType for ProductData {
    const TYPE: &'static str = "product";
}

/// `product` payload as shown in listings: only the title is required, so a
/// product with an unset price or thumbnail is still listed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub title: RichText,
}

impl DocumentType for ProductSummary {
    const TYPE: &'static str = "product";
}

/// `category` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryData {
    pub title: RichText,
}

impl DocumentType for CategoryData {
    const TYPE: &'static str = "category";
}

pub type Product = Document<ProductData>;
pub type ProductListing = Document<ProductSummary>;
pub type Category = Document<CategoryData>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn product_json() -> Value {
        json!({
            "id": "YAbc12",
            "uid": "wireless-mouse",
            "type": "product",
            "href": "https://devcommerce9.cdn.prismic.io/api/v2/documents/search?ref=X",
            "tags": [],
            "first_publication_date": "2021-01-10T12:00:00+0000",
            "last_publication_date": "2021-02-01T08:30:00+0000",
            "lang": "pt-br",
            "data": {
                "title": [{ "type": "heading1", "text": "Wireless Mouse", "spans": [] }],
                "description": [{ "type": "paragraph", "text": "Quiet clicks", "spans": [] }],
                "thumbnail": {
                    "dimensions": { "width": 800, "height": 600 },
                    "alt": null,
                    "copyright": null,
                    "url": "https://images.prismic.io/devcommerce9/mouse.png"
                },
                "price": 129.9,
                "category": {
                    "id": "CAT1", "type": "category", "tags": [], "slug": "mouses",
                    "lang": "pt-br", "uid": "mouses", "link_type": "Document", "isBroken": false
                }
            }
        })
    }

    #[test]
    fn test_decode_product() {
        let product = raw(product_json()).decode::<ProductData>().unwrap();

        assert_eq!(product.id, "YAbc12");
        assert_eq!(product.slug(), "wireless-mouse");
        assert_eq!(product.data.title.as_text(" "), "Wireless Mouse");
        assert_eq!(product.data.price, 129.9);
        assert_eq!(
            product.data.thumbnail.dimensions,
            Some(Dimensions {
                width: 800,
                height: 600
            })
        );
        let category = product.data.category.unwrap();
        assert_eq!(category.id.as_deref(), Some("CAT1"));
        assert_eq!(category.href().as_deref(), Some("/catalog/categories/mouses"));
    }

    #[test]
    fn test_decode_keeps_metadata() {
        let document = raw(product_json());
        let decoded = document.clone().decode::<ProductData>().unwrap();

        assert_eq!(decoded.id, document.id);
        assert_eq!(decoded.uid, document.uid);
        assert_eq!(decoded.kind, document.kind);
        assert_eq!(decoded.lang, document.lang);
        assert_eq!(decoded.last_publication_date, document.last_publication_date);
    }

    #[test]
    fn test_decode_missing_required_field() {
        let mut value = product_json();
        value["data"].as_object_mut().unwrap().remove("price");
        let err = raw(value).decode::<ProductData>().unwrap_err();

        let message = err.to_string();
        assert!(message.contains("YAbc12"));
        assert!(message.contains("price"));
    }

    #[test]
    fn test_decode_null_price_fails() {
        let mut value = product_json();
        value["data"]["price"] = Value::Null;
        assert!(raw(value).decode::<ProductData>().is_err());
    }

    #[test]
    fn test_decode_unset_image_fails() {
        let mut value = product_json();
        value["data"]["thumbnail"] = json!({});
        let err = raw(value).decode::<ProductData>().unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn test_summary_tolerates_unset_fields() {
        let mut value = product_json();
        value["data"]["price"] = Value::Null;
        value["data"]["thumbnail"] = json!({});

        let listing = raw(value.clone()).decode::<ProductSummary>().unwrap();
        assert_eq!(listing.slug(), "wireless-mouse");
        assert_eq!(listing.data.title.as_text(" "), "Wireless Mouse");
        assert!(raw(value).decode::<ProductData>().is_err());
    }

    #[test]
    fn test_summary_requires_title() {
        let mut value = product_json();
        value["data"].as_object_mut().unwrap().remove("title");
        let err = raw(value).decode::<ProductSummary>().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_decode_wrong_type() {
        let err = raw(product_json()).decode::<CategoryData>().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::WrongType {
                expected: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_unset_relationship() {
        let mut value = product_json();
        value["data"]["category"] = json!({ "link_type": "Document" });
        let product = raw(value).decode::<ProductData>().unwrap();

        let link = product.data.category.unwrap();
        assert_eq!(link.id, None);
        assert_eq!(link.href(), None);
    }

    #[test]
    fn test_decode_all_fails_fast() {
        let mut broken = product_json();
        broken["id"] = json!("BROKEN");
        broken["data"].as_object_mut().unwrap().remove("title");

        let err = decode_all::<ProductData>(vec![raw(product_json()), raw(broken)]).unwrap_err();
        assert!(err.to_string().contains("BROKEN"));
    }

    #[test]
    fn test_slug_without_uid() {
        let mut value = product_json();
        value.as_object_mut().unwrap().remove("uid");
        assert_eq!(raw(value).slug(), "");
    }
}
