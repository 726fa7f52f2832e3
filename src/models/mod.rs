use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Episode identifier ────────────────────────────────────────────────────────

/// Archive-side game id (the `game_id` query parameter), supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub u32);

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Clues ─────────────────────────────────────────────────────────────────────

/// One clue cell of a round grid.
///
/// Cells that were never revealed keep their slot with every per-clue field
/// set to `None` (and `is_daily_double` false), so the board can be rebuilt
/// from ordinal positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClueRecord {
    pub category: String,
    pub round_number: u32,
    pub order_number: Option<u32>,
    pub value: Option<u32>,
    pub is_daily_double: bool,
    pub answer_text: Option<String>,
    pub correct_response: Option<String>,
    pub responder: Option<String>,
    pub is_correct: Option<bool>,
}

impl ClueRecord {
    pub fn is_blank(&self) -> bool {
        self.order_number.is_none()
            && self.value.is_none()
            && self.answer_text.is_none()
            && self.correct_response.is_none()
            && self.responder.is_none()
            && self.is_correct.is_none()
    }
}

// ── Final round ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalRoundRecord {
    pub category: String,
    pub responder: String,
    pub response_text: String,
    pub wager: i64, // can be negative on some pages
    pub is_correct: bool,
    pub correct_response: String,
}

// ── Scores ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotPoint {
    FirstBreak,
    EndRound1,
    EndRound2,
    EndFinal,
}

impl SnapshotPoint {
    pub const ALL: [SnapshotPoint; 4] = [
        SnapshotPoint::FirstBreak,
        SnapshotPoint::EndRound1,
        SnapshotPoint::EndRound2,
        SnapshotPoint::EndFinal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotPoint::FirstBreak => "FIRST_BREAK",
            SnapshotPoint::EndRound1 => "END_ROUND_1",
            SnapshotPoint::EndRound2 => "END_ROUND_2",
            SnapshotPoint::EndFinal => "END_FINAL",
        }
    }
}

impl fmt::Display for SnapshotPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreSnapshotRecord {
    pub player: String,
    pub value: i64,
    pub additional_info: Option<String>, // e.g. "2-day champion: $31,200"
    pub snapshot_point: SnapshotPoint,
}

// ── Episode ───────────────────────────────────────────────────────────────────

/// Header data from the page title, e.g. "Show #4596 - Friday, July 23, 2004".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EpisodeMeta {
    pub show_number: Option<u32>,
    pub air_date: Option<NaiveDate>,
}

/// Everything extracted from one episode page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeTables {
    pub episode: EpisodeId,
    pub meta: EpisodeMeta,
    pub clues: Vec<ClueRecord>,
    pub final_round: Vec<FinalRoundRecord>,
    pub scores: Vec<ScoreSnapshotRecord>,
}
