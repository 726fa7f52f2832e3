//! Pipeline orchestrator: ties page source → parser → storage together.
//!
//! ## Run modes
//!
//! `run_remote()` — crawl an inclusive range of game ids from the archive,
//!   one page at a time under the fetcher's politeness policy.
//!
//! `run_local()` — parse pages already saved to a directory (no network).
//!
//! Either way an episode is exported only after every extractor succeeded on
//! it; a failed episode leaves nothing behind.

use crate::config::AppConfig;
use crate::loader::LocalPageSource;
use crate::models::{EpisodeId, EpisodeTables};
use crate::parser::{self, EpisodeError};
use crate::scraper::{JArchiveScraper, PageSource};
use crate::storage::Repository;
use crate::storage::csv_export::{self, CsvExporter};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Fetch one page and parse it. Nothing is retained between calls.
pub async fn scrape_episode(
    source: &dyn PageSource,
    episode: EpisodeId,
) -> Result<EpisodeTables, EpisodeError> {
    let html = source
        .get_page(episode)
        .await
        .map_err(|source| EpisodeError::Fetch { episode, source })?;
    parser::parse_episode(episode, &html)
}

/// Where finished episodes go.
struct Sinks {
    csv: Option<CsvExporter>,
    repo: Option<Repository>,
}

impl Sinks {
    /// Both sinks or neither: CSV files are removed again if the database
    /// write fails.
    fn write(&self, tables: &EpisodeTables) -> Result<()> {
        let written = match &self.csv {
            Some(csv) => csv
                .write_episode(tables)
                .with_context(|| format!("CSV export of episode {}", tables.episode))?,
            None => Vec::new(),
        };
        if let Some(repo) = &self.repo {
            if let Err(e) = repo.replace_episode(tables) {
                csv_export::discard(&written);
                return Err(e.context(format!("DuckDB write of episode {}", tables.episode)));
            }
        }
        Ok(())
    }
}

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run_remote(&self, first: u32, last: u32) -> Result<PipelineStats> {
        let scraper = JArchiveScraper::connect(&self.config.scraper)
            .await
            .context("Failed to build scraper")?;
        let episodes = (first..=last).map(EpisodeId).collect();
        self.run(&scraper, episodes).await
    }

    pub async fn run_local(&self, dir: &Path) -> Result<PipelineStats> {
        let source = LocalPageSource::from_dir(dir)?;
        let episodes = source.episodes();
        self.run(&source, episodes).await
    }

    fn open_sinks(&self) -> Result<Sinks> {
        let storage = &self.config.storage;
        let repo = if storage.write_db {
            let repo = Repository::open(&storage.db_path).context("Failed to open DuckDB")?;
            if storage.run_migrations {
                repo.run_migrations()?;
            }
            Some(repo)
        } else {
            None
        };

        Ok(Sinks {
            csv: storage
                .write_csv
                .then(|| CsvExporter::new(storage.csv_dir.clone())),
            repo,
        })
    }

    /// Episodes are processed strictly one after another.
    pub async fn run(
        &self,
        source: &dyn PageSource,
        episodes: Vec<EpisodeId>,
    ) -> Result<PipelineStats> {
        let sinks = self.open_sinks()?;
        let run_id = match &sinks.repo {
            Some(repo) => Some(repo.begin_scrape_run()?),
            None => None,
        };

        info!("=== Processing {} episodes ===", episodes.len());
        let mut stats = PipelineStats::default();

        for episode in episodes {
            let outcome = match scrape_episode(source, episode).await {
                Ok(tables) => sinks.write(&tables).map(|()| tables),
                Err(e) => Err(e.into()),
            };

            match outcome {
                Ok(tables) => {
                    info!(
                        "Episode {}: {} clues | {} final | {} scores",
                        episode,
                        tables.clues.len(),
                        tables.final_round.len(),
                        tables.scores.len()
                    );
                    stats.record(&tables);
                }
                Err(e) => {
                    warn!("Skipping episode {}: {:#}", episode, e);
                    stats.failed.push(episode);

                    if !self.config.pipeline.continue_on_error {
                        if let (Some(repo), Some(run_id)) = (&sinks.repo, run_id) {
                            repo.finish_scrape_run(
                                run_id,
                                stats.episodes_processed,
                                stats.failed.len(),
                                Some(&format!("{:#}", e)),
                            )
                            .ok();
                        }
                        return Err(e.context("Stopping: continue_on_error is off"));
                    }
                }
            }
        }

        if let (Some(repo), Some(run_id)) = (&sinks.repo, run_id) {
            let msg = (!stats.failed.is_empty())
                .then(|| format!("{} episodes failed", stats.failed.len()));
            repo.finish_scrape_run(
                run_id,
                stats.episodes_processed,
                stats.failed.len(),
                msg.as_deref(),
            )
            .ok();
        }

        info!(
            "=== Done: {} episodes | {} clues | {} failed ===",
            stats.episodes_processed,
            stats.clues,
            stats.failed.len()
        );
        Ok(stats)
    }
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    pub episodes_processed: usize,
    pub clues: usize,
    pub final_responses: usize,
    pub score_rows: usize,
    pub failed: Vec<EpisodeId>,
}

impl PipelineStats {
    fn record(&mut self, tables: &EpisodeTables) {
        self.episodes_processed += 1;
        self.clues += tables.clues.len();
        self.final_responses += tables.final_round.len();
        self.score_rows += tables.scores.len();
    }
}
