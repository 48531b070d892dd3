//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn url() -> String {
        "http://localhost:3000".into()
    }

    pub fn brand() -> String {
        "DevCommerce".into()
    }

    pub fn locale() -> String {
        "pt_BR".into()
    }

    pub fn language() -> String {
        "pt-BR".into()
    }

    pub fn theme_color() -> String {
        "#121214".into()
    }
}

// ============================================================================
// [cms] Section Defaults
// ============================================================================

pub mod cms {
    pub fn endpoint() -> String {
        "https://devcommerce9.cdn.prismic.io/api/v2".into()
    }

    pub fn preview_cookie() -> String {
        "io.prismic.preview".into()
    }
}

// ============================================================================
// [pages] Section Defaults
// ============================================================================

pub mod pages {
    pub fn category_revalidate() -> u64 {
        60
    }

    pub fn product_revalidate() -> u64 {
        10
    }

    pub fn fallback_refresh() -> u64 {
        1
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn public() -> PathBuf {
        "static".into()
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        3000
    }
}
