//! storefront - a server-rendered e-commerce front-end for a headless CMS.

mod build;
mod cache;
mod cli;
mod cms;
mod config;
mod generator;
mod logger;
mod pages;
mod render;
mod routes;
mod seo;
mod serve;
mod utils;

use anyhow::{Context, Result};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use cms::CmsClient;
use config::{SiteConfig, cfg, init_config};
use serve::serve_site;

fn main() -> Result<()> {
    // A missing .env is fine; the environment and storefront.toml still apply
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_config(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => serve_site(),
        Commands::Build { .. } => build_site(&cfg()),
        Commands::Paths => print_paths(),
    }
}

/// Print every statically known page path, one per line.
fn print_paths() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let api = CmsClient::new(&cfg().cms, None);
    for path in runtime.block_on(pages::static_paths(&api))? {
        println!("{path}");
    }
    Ok(())
}
