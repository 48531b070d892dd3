//! Generated site artifacts besides pages.

pub mod sitemap;
