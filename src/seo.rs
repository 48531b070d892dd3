//! SEO head tags.
//!
//! Pure mapping from a page's metadata to the `<head>` tags that describe
//! it: `<title>`, description, Open Graph and robots directives.

use crate::config::SiteConfig;

/// Per-page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoMeta {
    pub title: String,
    pub description: Option<String>,
    /// Site-relative image path, made absolute with `[site] url`.
    pub image: Option<String>,
    pub exclude_title_suffix: bool,
    pub indexable: bool,
}

impl SeoMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            image: None,
            exclude_title_suffix: false,
            indexable: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image(mut self, path: impl Into<String>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn without_title_suffix(mut self) -> Self {
        self.exclude_title_suffix = true;
        self
    }

    pub fn noindex(mut self) -> Self {
        self.indexable = false;
        self
    }
}

/// Attribute naming a `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Name,
    Property,
    HttpEquiv,
}

impl MetaKey {
    pub const fn attr(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
            Self::HttpEquiv => "http-equiv",
        }
    }
}

/// One `<head>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    Title(String),
    Meta {
        key: MetaKey,
        value: &'static str,
        content: String,
    },
}

/// Ordered set of head tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(pub Vec<HeadTag>);

impl TagSet {
    fn meta(&mut self, key: MetaKey, value: &'static str, content: impl Into<String>) {
        self.0.push(HeadTag::Meta {
            key,
            value,
            content: content.into(),
        });
    }

    pub fn title(&self) -> Option<&str> {
        self.0.iter().find_map(|tag| match tag {
            HeadTag::Title(title) => Some(title.as_str()),
            HeadTag::Meta { .. } => None,
        })
    }

    /// Content of the `<meta>` whose key attribute equals `value`.
    pub fn content(&self, value: &str) -> Option<&str> {
        self.0.iter().find_map(|tag| match tag {
            HeadTag::Meta {
                value: v, content, ..
            } if *v == value => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeadTag> {
        self.0.iter()
    }
}

/// Build the head tags for a page.
pub fn build_seo_tags(meta: &SeoMeta, config: &SiteConfig) -> TagSet {
    let site = &config.site;
    let page_title = if meta.exclude_title_suffix {
        meta.title.clone()
    } else {
        format!("{} | {}", meta.title, site.brand)
    };
    let page_image = meta
        .image
        .as_deref()
        .map(|path| format!("{}{}", site.url, path));

    let mut tags = TagSet::default();
    tags.0.push(HeadTag::Title(page_title.clone()));

    if let Some(description) = &meta.description {
        tags.meta(MetaKey::Name, "description", description);
    }
    if let Some(image) = &page_image {
        tags.meta(MetaKey::Name, "image", image);
    }
    if !meta.indexable {
        tags.meta(MetaKey::Name, "robots", "noindex,nofollow");
    }

    tags.meta(MetaKey::HttpEquiv, "x-ua-compatible", "IE=edge,chrome=1");
    tags.meta(MetaKey::Name, "MobileOptimized", "320");
    tags.meta(MetaKey::Name, "HandheldFriendly", "True");
    tags.meta(MetaKey::Name, "theme-color", &site.theme_color);
    tags.meta(MetaKey::Name, "msapplication-TileColor", &site.theme_color);
    tags.meta(MetaKey::Name, "referrer", "no-referrer-when-downgrade");
    tags.meta(MetaKey::Name, "google", "notranslate");

    tags.meta(MetaKey::Property, "og:title", &page_title);
    if let Some(description) = &meta.description {
        tags.meta(MetaKey::Property, "og:description", description);
    }
    tags.meta(MetaKey::Property, "og:locale", &site.locale);
    tags.meta(MetaKey::Property, "og:type", "website");
    tags.meta(MetaKey::Property, "og:site_name", &page_title);

    if let Some(image) = page_image {
        tags.meta(MetaKey::Property, "og:image", &image);
        tags.meta(MetaKey::Property, "og:image:secure_url", image);
        tags.meta(MetaKey::Property, "og:image:alt", "Thumbnail");
        tags.meta(MetaKey::Property, "og:image:type", "image/png");
        tags.meta(MetaKey::Property, "og:image:width", "1200");
        tags.meta(MetaKey::Property, "og:image:height", "630");
    }

    tags
}
