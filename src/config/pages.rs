//! `[pages]` section configuration.
//!
//! Revalidation intervals for the statically generated pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[pages]` section in storefront.toml - static page refresh policy.
///
/// # Example
/// ```toml
/// [pages]
/// category_revalidate = 60   # seconds
/// product_revalidate = 10
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PagesConfig {
    /// Seconds before a cached category page is regenerated.
    #[serde(default = "defaults::pages::category_revalidate")]
    #[educe(Default = defaults::pages::category_revalidate())]
    pub category_revalidate: u64,

    /// Seconds before a cached product page is regenerated.
    #[serde(default = "defaults::pages::product_revalidate")]
    #[educe(Default = defaults::pages::product_revalidate())]
    pub product_revalidate: u64,

    /// Seconds the loading placeholder waits before reloading itself.
    #[serde(default = "defaults::pages::fallback_refresh")]
    #[educe(Default = defaults::pages::fallback_refresh())]
    pub fallback_refresh: u64,
}

impl PagesConfig {
    pub const fn category_ttl(&self) -> Duration {
        Duration::from_secs(self.category_revalidate)
    }

    pub const fn product_ttl(&self) -> Duration {
        Duration::from_secs(self.product_revalidate)
    }
}
