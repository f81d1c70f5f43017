use serde::Serialize;

use crate::app::{AppContext, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn trending(ctx: &AppContext) -> Result<()> {
    print_json(&ctx.catalog.trending().await)
}

pub async fn latest(ctx: &AppContext) -> Result<()> {
    print_json(&ctx.catalog.latest().await)
}

pub async fn top(ctx: &AppContext, n: usize) -> Result<()> {
    print_json(&ctx.catalog.top(n).await)
}

pub async fn genre(ctx: &AppContext, genre: &str) -> Result<()> {
    print_json(&ctx.catalog.by_genre(genre).await)
}

pub async fn search(ctx: &AppContext, query: &str) -> Result<()> {
    let titles = ctx.catalog.search(query).await;
    if titles.is_empty() {
        eprintln!("No titles found for \"{}\"", query);
    }
    print_json(&titles)
}

pub async fn trailer(ctx: &AppContext, title: &str, year: u16) -> Result<()> {
    match ctx.catalog.trailer(title, year).await {
        Some(id) => println!("https://www.youtube.com/watch?v={}", id),
        None => eprintln!("No trailer found for {} ({})", title, year),
    }
    Ok(())
}

pub async fn details(ctx: &AppContext, id: &str) -> Result<()> {
    match ctx.catalog.details(id).await {
        Some(details) => print_json(&details),
        None => {
            eprintln!("No details available for {}", id);
            Ok(())
        }
    }
}

pub async fn torrents(ctx: &AppContext, title: &str, year: u16, best: bool) -> Result<()> {
    if best {
        match ctx.catalog.best_magnet(title, year).await {
            Some(magnet) => println!("{}", magnet),
            None => eprintln!("No usable release found for {} ({})", title, year),
        }
        return Ok(());
    }
    print_json(&ctx.catalog.torrents_for_title(title, year).await)
}

pub async fn episode(ctx: &AppContext, title: &str, season: u32, episode: u32) -> Result<()> {
    print_json(&ctx.catalog.episode_torrents(title, season, episode).await)
}

pub fn clear_cache(ctx: &AppContext) -> Result<()> {
    ctx.cache.clear()?;
    println!("Cleared {}", ctx.cache.path().display());
    Ok(())
}
