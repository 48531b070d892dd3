//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from the request loop and from
//! background revalidation tasks running on the tokio runtime.
//!
//! # Usage
//!
//! ```ignore
//! use crate::config::cfg;
//!
//! let c = cfg();
//! render(&props, &c)?;  // Arc auto-derefs to &SiteConfig
//! ```

use super::SiteConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
///
/// Initialized with default config, then replaced with the loaded config in main.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Get current config as `Arc<SiteConfig>`.
///
/// Thread-safe and wait-free.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Initialize global config (called once at startup).
#[inline]
pub fn init_config(config: SiteConfig) {
    CONFIG.store(Arc::new(config));
}
