//! interlink CLI — internal link builder for blogs.
//!
//! Reads a site's sitemap, ranks its pages against one article and inserts
//! links to the best matches into the article's HTML.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
