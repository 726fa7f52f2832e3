//! Episode page → typed tables.
//!
//! Everything here is pure: a page string goes in, freshly allocated records
//! come out. A structural surprise anywhere fails the whole episode.

pub mod cleaner;
pub mod clues;
pub mod final_round;
pub mod markup;
pub mod reveal;
pub mod scores;

#[cfg(test)]
pub mod fixtures;

use scraper::Html;
use std::fmt;
use tracing::debug;

use crate::models::{EpisodeId, EpisodeMeta, EpisodeTables, SnapshotPoint};
use crate::scraper::FetchError;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Something the page layout promised was not there.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no element matching `{selector}` in {scope}")]
    MissingNode {
        scope: &'static str,
        selector: &'static str,
    },

    #[error("reveal panel has neither a correct nor an incorrect responder")]
    MissingOutcome,

    #[error("final round response table has an odd number of rows ({0})")]
    OddResponseRows(usize),

    #[error("final round response row {row}: expected {expected}")]
    MalformedRow { row: usize, expected: &'static str },

    #[error("round {round} has {cells} clue cells for {categories} categories")]
    GridMismatch {
        round: u32,
        cells: usize,
        categories: usize,
    },

    #[error("could not read {field} from {text:?}")]
    InvalidNumber { field: &'static str, text: String },

    #[error("{snapshot} score table not found (table #{nth} of {container})")]
    MissingSnapshot {
        snapshot: SnapshotPoint,
        container: &'static str,
        nth: usize,
    },

    #[error("{snapshot} score table: {detail}")]
    ScoreTable {
        snapshot: SnapshotPoint,
        detail: String,
    },
}

/// The sub-extractor that rejected a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Rounds,
    FinalRound,
    Scores,
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Extractor::Rounds => "round aggregator",
            Extractor::FinalRound => "final round extractor",
            Extractor::Scores => "score table extractor",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EpisodeError {
    #[error("episode {episode}: fetch failed")]
    Fetch {
        episode: EpisodeId,
        #[source]
        source: FetchError,
    },

    #[error("episode {episode}: malformed page in {extractor}")]
    MalformedPage {
        episode: EpisodeId,
        extractor: Extractor,
        #[source]
        source: ParseError,
    },
}

// ── Episode ───────────────────────────────────────────────────────────────────

pub fn parse_episode_meta(doc: &Html) -> EpisodeMeta {
    doc.select(&markup::GAME_TITLE)
        .next()
        .map(|title| cleaner::parse_episode_title(&markup::text_of(title)))
        .unwrap_or_default()
}

/// Build the tree once and run every extractor against it.
pub fn parse_episode(episode: EpisodeId, html: &str) -> Result<EpisodeTables, EpisodeError> {
    let doc = markup::parse_document(html);
    let malformed = |extractor: Extractor| {
        move |source: ParseError| EpisodeError::MalformedPage {
            episode,
            extractor,
            source,
        }
    };

    let clues = clues::parse_rounds(&doc).map_err(malformed(Extractor::Rounds))?;
    let final_round =
        final_round::parse_final_round(&doc).map_err(malformed(Extractor::FinalRound))?;
    let scores = scores::parse_scores(&doc).map_err(malformed(Extractor::Scores))?;
    let meta = parse_episode_meta(&doc);

    debug!(
        "Episode {}: {} clues, {} final responses, {} score rows (show {:?}, aired {:?})",
        episode,
        clues.len(),
        final_round.len(),
        scores.len(),
        meta.show_number,
        meta.air_date,
    );

    Ok(EpisodeTables {
        episode,
        meta,
        clues,
        final_round,
        scores,
    })
}
