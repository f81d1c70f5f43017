pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Browse movie and series catalogs from the terminal", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/marquee/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Show the browser window while scraping
    #[arg(long, global = true)]
    pub headed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Most popular titles right now
    Trending,
    /// Newest releases
    Latest,
    /// Top titles this week
    Top {
        /// Number of titles to show
        #[arg(short, long, default_value_t = 10)]
        n: usize,
    },
    /// Best rated movies of a genre
    Genre {
        /// Genre name, e.g. "horror"
        genre: String,
    },
    /// Search titles by name
    Search {
        /// Free-text query
        query: String,
    },
    /// Find the trailer of a title
    Trailer {
        title: String,
        year: u16,
    },
    /// Show description, genres, cast and runtime of a title
    Details {
        /// Title id such as tt0111161
        id: String,
    },
    /// List ranked torrent releases of a movie
    Torrents {
        title: String,
        year: u16,

        /// Print only the best magnet link
        #[arg(long)]
        best: bool,
    },
    /// List ranked torrent releases of a series episode
    Episode {
        title: String,
        season: u32,
        episode: u32,
    },
    /// Delete every cached listing and detail page
    ClearCache,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_default() {
        let cli = Cli::try_parse_from(["marquee", "top"]).unwrap();
        assert!(matches!(cli.command, Commands::Top { n: 10 }));
    }

    #[test]
    fn test_parse_episode() {
        let cli = Cli::try_parse_from(["marquee", "episode", "Severance", "2", "3"]).unwrap();
        match cli.command {
            Commands::Episode {
                title,
                season,
                episode,
            } => {
                assert_eq!(title, "Severance");
                assert_eq!((season, episode), (2, 3));
            }
            _ => panic!("expected episode command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["marquee", "trending", "--headed", "-c", "/tmp/m.toml"]).unwrap();
        assert!(cli.headed);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/m.toml")));
    }

    #[test]
    fn test_torrents_requires_year() {
        assert!(Cli::try_parse_from(["marquee", "torrents", "Dune"]).is_err());
    }
}
