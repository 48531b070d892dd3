//! Storefront configuration management for `storefront.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[site]`    | Public origin, brand, locale                       |
//! | `[cms]`     | Content API endpoint and credentials               |
//! | `[pages]`   | Revalidation intervals of static pages             |
//! | `[build]`   | Pre-render output, minify, sitemap                 |
//! | `[serve]`   | HTTP server (port, interface, prerender)           |
//!
//! # Precedence
//!
//! CLI flags > environment (`SITE_URL`, `CMS_ACCESS_TOKEN`) > file > defaults.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://shop.example.com"
//!
//! [cms]
//! endpoint = "https://devcommerce9.cdn.prismic.io/api/v2"
//!
//! [serve]
//! port = 3000
//! ```

mod build;
mod cms;
pub mod defaults;
mod error;
mod handle;
mod pages;
mod serve;
mod site;

pub use cms::CmsConfig;
pub use handle::{cfg, init_config};

use build::BuildConfig;
use error::ConfigError;
use pages::PagesConfig;
use serve::ServeConfig;
use site::SiteSection;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variables holding the public site origin, first match wins.
const SITE_URL_VARS: [&str; 2] = ["SITE_URL", "NEXT_PUBLIC_SITE_URL"];

/// Environment variable holding the CMS access token.
const ACCESS_TOKEN_VAR: &str = "CMS_ACCESS_TOKEN";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing storefront.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Public storefront identity
    #[serde(default)]
    pub site: SiteSection,

    /// Content API settings
    #[serde(default)]
    pub cms: CmsConfig,

    /// Static page refresh policy
    #[serde(default)]
    pub pages: PagesConfig,

    /// Pre-render settings
    #[serde(default)]
    pub build: BuildConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load from the CLI-selected file (defaults when absent), then apply
    /// environment and CLI overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = normalize_path(&config_path);
        config.set_root(root);

        config.update_with_env(|key| std::env::var(key).ok());
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Absolute path of the sitemap file.
    pub fn sitemap_path(&self) -> PathBuf {
        self.build.output.join(&self.build.sitemap.path)
    }

    /// Apply environment overrides through `lookup` (`std::env::var` in production).
    pub fn update_with_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = SITE_URL_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
        {
            self.site.url = url;
        }
        if let Some(token) = lookup(ACCESS_TOKEN_VAR).filter(|v| !v.is_empty()) {
            self.cms.access_token = Some(token);
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(args) = cli.render_args() {
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            Self::update_option(&mut self.site.url, args.site_url.as_ref());
        }

        match &cli.command {
            Commands::Serve {
                interface, port, ..
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Build { output, clean, .. } => {
                Self::update_option(&mut self.build.output, output.as_ref());
                self.build.clean |= *clean;
            }
            Commands::Paths => {}
        }

        let root = normalize_path(self.get_root());
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.build.public = normalize_path(&root.join(&self.build.public));
        self.set_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        ConfigError::check_http("site.url", &self.site.url)?;
        ConfigError::check_http("cms.endpoint", &self.cms.endpoint)?;

        if self.cms.page_size == Some(0) {
            bail!(ConfigError::Zero { field: "cms.page_size" });
        }
        if self.pages.fallback_refresh == 0 {
            bail!(ConfigError::Zero { field: "pages.fallback_refresh" });
        }
        if self.cms.preview_cookie.trim().is_empty() {
            bail!(ConfigError::Empty { field: "cms.preview_cookie" });
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, manually make them absolute
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
