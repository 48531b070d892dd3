//! Placeholder served while a static page is generated for the first time.

use crate::{
    config::SiteConfig,
    render::{PageShell, common::write_text_element},
    seo::SeoMeta,
};
use anyhow::Result;

pub fn render(config: &SiteConfig) -> Result<String> {
    PageShell::new(&SeoMeta::new("Loading...").noindex(), config)
        .refresh(config.pages.fallback_refresh)
        .render(config, |writer| write_text_element(writer, "p", "Loading..."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::test_support::config;

    #[test]
    fn test_placeholder() {
        let html = render(&config()).unwrap();

        assert!(html.contains("<main><p>Loading...</p></main>"));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="1"/>"#));
        assert!(html.contains(r#"<meta name="robots" content="noindex,nofollow"/>"#));
    }
}
