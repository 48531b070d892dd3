//! `[cms]` section configuration.
//!
//! Where the content API lives and how to authenticate against it.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[cms]` section in storefront.toml - headless content API settings.
///
/// # Example
/// ```toml
/// [cms]
/// endpoint = "https://my-repo.cdn.prismic.io/api/v2"
/// access_token = "..."   # private repositories only
/// page_size = 100
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CmsConfig {
    /// API entry point. `GET <endpoint>` lists refs, searches go to
    /// `<endpoint>/documents/search`.
    #[serde(default = "defaults::cms::endpoint")]
    #[educe(Default = defaults::cms::endpoint())]
    pub endpoint: String,

    /// Permanent access token, sent as `access_token` on every call.
    /// Overridden by `CMS_ACCESS_TOKEN`.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Results per query page (`pageSize`). The backend default applies when unset.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Cookie carrying a preview ref forwarded from the inbound request.
    #[serde(default = "defaults::cms::preview_cookie")]
    #[educe(Default = defaults::cms::preview_cookie())]
    pub preview_cookie: String,
}
