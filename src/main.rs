use clap::{Parser, Subcommand};
use docrender::assets::WebAssetRegistry;
use docrender::document::{Document, Factory};
use docrender::types::Page;
use docrender::{config, output};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docrender")]
#[command(about = "Render pages into HTML, JSON, XML, feed and raw responses")]
#[command(long_about = "\
Render pages into HTML, JSON, XML, feed and raw responses

A page is a JSON file describing one document: its title and meta tags, the
scripts and stylesheets it uses, and its body. Settings shared by every page
live in config.toml:

  site/
  ├── config.toml                  # Document, HTML, feed and image settings
  ├── templates/                   # Page layouts with <doc:include> tags
  │   ├── index.html
  │   └── print.html
  └── media/                       # Asset registry
      └── system.asset.json        # { \"name\", \"version\", \"assets\": [...] }

Run 'docrender gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON page description and print the response body
    Render {
        /// Page description file
        page: PathBuf,
        /// Document kind (html, json, xml, raw, image, feed, opensearch)
        #[arg(long)]
        kind: Option<String>,
        /// Print the status line and headers before the body
        #[arg(long)]
        headers: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Load an asset registry directory and show every preset's resolved order
    CheckAssets {
        /// Directory scanned for *.asset.json files
        dir: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrender=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            page,
            kind,
            headers,
        } => {
            let render_config = config::load_config(&cli.config)?;
            let factory = Factory::new(render_config, &cli.config)?;
            let page_desc = Page::load(&page)?;
            let kind = page_desc.resolve_kind(kind.as_deref());
            tracing::debug!(page = %page.display(), kind, "rendering page");
            let mut document = page_desc.build(&factory, kind)?;
            let response = document.render(&page_desc.params)?;
            output::print_response(&response, headers)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::CheckAssets { dir } => {
            let render_config = config::load_config(&cli.config)?;
            let mut registry = WebAssetRegistry::new(&render_config.html.media_version);
            let loaded = registry.load_dir(&dir)?;
            tracing::info!(dir = %dir.display(), files = loaded, "loaded asset registry");
            output::print_asset_report(&registry)?;
        }
    }

    Ok(())
}
