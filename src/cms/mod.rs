//! Headless CMS adapter.
//!
//! Page loaders talk to the backend through [`ContentApi`]; the HTTP
//! implementation is [`CmsClient`], built per request so preview cookies
//! can be forwarded.
//!
//! ```text
//! loader ──► ContentApi::query(&[Predicate])        ──► Vec<Document>
//!        └─► ContentApi::get_by_uid(type, uid)      ──► Document | NotFound
//!                      │
//!                      ▼
//!             Document::decode::<ProductData>()      (typed, fail fast)
//!             Document::decode::<ProductSummary>()   (listings: title only)
//! ```

mod client;
mod document;
mod error;
mod predicate;
mod richtext;
#[cfg(test)]
pub mod testing;

pub use client::{CmsClient, RequestContext};
pub use document::{
    Category, CategoryData, Document, Product, ProductData, ProductListing, decode_all,
};
pub use error::CmsError;
pub use predicate::Predicate;
pub use richtext::RichText;

use async_trait::async_trait;

/// Operations the storefront needs from the content backend.
///
/// Errors propagate unchanged: no retries, no partial results.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// All documents matching every predicate, in backend order.
    async fn query(&self, predicates: &[Predicate]) -> Result<Vec<Document>, CmsError>;

    /// The document of type `kind` whose uid is `uid`.
    async fn get_by_uid(&self, kind: &str, uid: &str) -> Result<Document, CmsError>;
}
