mod config;
mod loader;
mod models;
mod parser;
mod pipeline;
mod scraper;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::loader::LocalPageSource;
use crate::models::EpisodeId;
use crate::pipeline::{Pipeline, PipelineStats, scrape_episode};
use crate::scraper::{JArchiveScraper, PageSource};
use crate::storage::Repository;

#[derive(Parser)]
#[command(name = "jarchive-scraper", about = "Quiz-show archive ETL", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and parse a range of game ids from the archive
    Scrape {
        /// First game id (inclusive)
        #[arg(long, default_value_t = 1)]
        from: u32,

        /// Last game id (inclusive)
        #[arg(long, default_value_t = 20)]
        to: u32,
    },

    /// Parse pages previously saved to a directory (episode_<id>.html)
    LoadHtml {
        #[arg(short, long, default_value = "pages")]
        dir: PathBuf,
    },

    /// Parse one episode and print its tables as JSON
    Show {
        episode: u32,

        /// Read the page from this file instead of the archive
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show database statistics
    Stats,

    /// List all stored episode ids
    Episodes,

    /// Apply schema migrations without loading data
    Migrate,
}

fn report(stats: &PipelineStats) {
    info!(
        "Done: {} episodes, {} clues, {} final responses, {} score rows, {} failed",
        stats.episodes_processed,
        utils::fmt_count(stats.clues),
        stats.final_responses,
        stats.score_rows,
        stats.failed.len()
    );
    if !stats.failed.is_empty() {
        let ids: Vec<String> = stats.failed.iter().map(|e| e.to_string()).collect();
        info!("Failed episodes: {}", ids.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "jarchive_scraper=info,warn",
        1 => "jarchive_scraper=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Scrape { from, to } => {
            anyhow::ensure!(from <= to, "--from ({from}) is after --to ({to})");
            let _t = utils::CommandTimer::start(format!("Scrape episodes {from}..={to}"));
            let stats = Pipeline::new(config).run_remote(from, to).await?;
            report(&stats);
        }

        Command::LoadHtml { dir } => {
            let _t = utils::CommandTimer::start(format!("Parse saved pages in {:?}", dir));
            let stats = Pipeline::new(config).run_local(&dir).await?;
            report(&stats);
        }

        Command::Show { episode, file } => {
            let episode = EpisodeId(episode);
            let source: Box<dyn PageSource> = match file {
                Some(path) => Box::new(LocalPageSource::single(episode, path)),
                None => Box::new(JArchiveScraper::connect(&config.scraper).await?),
            };
            let tables = scrape_episode(source.as_ref(), episode).await?;
            let json = serde_json::to_string_pretty(&tables)
                .context("Failed to serialize episode tables")?;
            println!("{}", json);
        }

        Command::Stats => {
            let repo = Repository::open(&config.storage.db_path)?;
            let episodes = repo.episode_count()?;
            let clues = repo.clue_count()?;
            let blank = repo.blank_clue_count()?;
            let (min, max) = repo.air_date_range().unwrap_or((None, None));
            println!("─────────────────────────────────");
            println!("  J! Archive ETL — Database Stats");
            println!("─────────────────────────────────");
            println!("  Episodes : {}", utils::fmt_count(episodes));
            println!("  Clues    : {}", utils::fmt_count(clues));
            println!("  Unplayed : {}", utils::fmt_count(blank));
            println!("  From     : {}", min.map(|d| d.to_string()).unwrap_or("—".into()));
            println!("  To       : {}", max.map(|d| d.to_string()).unwrap_or("—".into()));
            println!("─────────────────────────────────");
        }

        Command::Episodes => {
            let repo = Repository::open(&config.storage.db_path)?;
            let ids = repo.list_episodes()?;
            if ids.is_empty() {
                println!("No episodes — run `jarchive-scraper scrape` first.");
            } else {
                println!("{} episodes:", ids.len());
                for id in &ids {
                    println!("  {}", id);
                }
            }
        }

        Command::Migrate => {
            Repository::open(&config.storage.db_path)?.run_migrations()?;
            println!("Migrations applied.");
        }
    }

    Ok(())
}
