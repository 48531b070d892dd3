//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storefront CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: storefront.toml)
    #[arg(short = 'C', long, default_value = "storefront.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared rendering arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Override the public site origin used for absolute image URLs.
    ///
    /// Takes precedence over `SITE_URL` and `[site] url`.
    ///
    /// Example:
    ///   storefront build --site-url "https://shop.example.com"
    #[arg(long = "site-url")]
    pub site_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the storefront, rendering pages on demand
    Serve {
        #[command(flatten)]
        render_args: RenderArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Pre-render every statically known page into the output directory
    Build {
        #[command(flatten)]
        render_args: RenderArgs,

        /// Output directory path (relative to project root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Clean output directory completely before building
        #[arg(long)]
        clean: bool,
    },

    /// Print the statically known page paths
    Paths,
}

impl Cli {
    pub fn render_args(&self) -> Option<&RenderArgs> {
        match &self.command {
            Commands::Serve { render_args, .. } | Commands::Build { render_args, .. } => {
                Some(render_args)
            }
            Commands::Paths => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["storefront", "serve", "--port", "8080", "--site-url", "https://a.b"]);

        match &cli.command {
            Commands::Serve { port, interface, .. } => {
                assert_eq!(*port, Some(8080));
                assert_eq!(*interface, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(
            cli.render_args().and_then(|a| a.site_url.as_deref()),
            Some("https://a.b")
        );
        assert_eq!(cli.config, PathBuf::from("storefront.toml"));
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from(["storefront", "-C", "shop.toml", "build", "--clean", "-m", "false"]);

        match &cli.command {
            Commands::Build { clean, render_args, output } => {
                assert!(*clean);
                assert_eq!(render_args.minify, Some(false));
                assert_eq!(*output, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("shop.toml"));
    }

    #[test]
    fn test_paths_has_no_render_args() {
        let cli = Cli::parse_from(["storefront", "paths"]);
        assert!(cli.render_args().is_none());
    }
}
