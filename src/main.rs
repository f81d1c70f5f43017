use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use marquee::app::AppContext;
use marquee::cli::{commands, Cli, Commands};
use marquee::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.headed {
        config.scraper.headless = false;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Trending => commands::trending(&ctx).await?,
        Commands::Latest => commands::latest(&ctx).await?,
        Commands::Top { n } => commands::top(&ctx, n).await?,
        Commands::Genre { genre } => commands::genre(&ctx, &genre).await?,
        Commands::Search { query } => commands::search(&ctx, &query).await?,
        Commands::Trailer { title, year } => commands::trailer(&ctx, &title, year).await?,
        Commands::Details { id } => commands::details(&ctx, &id).await?,
        Commands::Torrents { title, year, best } => {
            commands::torrents(&ctx, &title, year, best).await?
        }
        Commands::Episode {
            title,
            season,
            episode,
        } => commands::episode(&ctx, &title, season, episode).await?,
        Commands::ClearCache => commands::clear_cache(&ctx)?,
    }

    Ok(())
}
