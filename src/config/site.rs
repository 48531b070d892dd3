//! `[site]` section configuration.
//!
//! Public origin and branding used by the SEO tags and page shell.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in storefront.toml - public storefront identity.
///
/// # Example
/// ```toml
/// [site]
/// url = "https://shop.example.com"
/// brand = "DevCommerce"
/// locale = "pt_BR"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Public site origin. Image paths are appended to it verbatim.
    /// Overridden by `SITE_URL` / `NEXT_PUBLIC_SITE_URL`.
    #[serde(default = "defaults::site::url")]
    #[educe(Default = defaults::site::url())]
    pub url: String,

    /// Brand appended to page titles (`"<title> | <brand>"`).
    #[serde(default = "defaults::site::brand")]
    #[educe(Default = defaults::site::brand())]
    pub brand: String,

    /// Open Graph locale (`og:locale`).
    #[serde(default = "defaults::site::locale")]
    #[educe(Default = defaults::site::locale())]
    pub locale: String,

    /// BCP 47 language code for `<html lang>`.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,

    /// Browser chrome color (`theme-color`, `msapplication-TileColor`).
    #[serde(default = "defaults::site::theme_color")]
    #[educe(Default = defaults::site::theme_color())]
    pub theme_color: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_site_config_full() {
        let config = r##"
            [site]
            url = "https://shop.example.com"
            brand = "Acme"
            locale = "en_US"
            language = "en-US"
            theme_color = "#ffffff"
        "##;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.url, "https://shop.example.com");
        assert_eq!(config.site.brand, "Acme");
        assert_eq!(config.site.locale, "en_US");
        assert_eq!(config.site.language, "en-US");
        assert_eq!(config.site.theme_color, "#ffffff");
    }

    #[test]
    fn test_site_config_defaults() {
        let config: SiteConfig = toml::from_str("[site]").unwrap();

        assert_eq!(config.site.url, "http://localhost:3000");
        assert_eq!(config.site.brand, "DevCommerce");
        assert_eq!(config.site.locale, "pt_BR");
        assert_eq!(config.site.theme_color, "#121214");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [site]
            brand = "Acme"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_site_config_unicode_brand() {
        let config = r#"
            [site]
            brand = "Loja Mágica 🛒"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.brand, "Loja Mágica 🛒");
    }
}
