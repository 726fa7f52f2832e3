//! Score snapshots, reshaped from one-column-per-player tables into one
//! record per player.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::ParseError;
use super::cleaner::parse_signed_dollars;
use super::markup::{DOUBLE_JEOPARDY_TABLES, FINAL_JEOPARDY_TABLES, JEOPARDY_TABLES, table_rows};
use crate::models::{ScoreSnapshotRecord, SnapshotPoint};

/// Where a snapshot table sits: the `nth` direct child table of a round
/// container. Layout changes are fixed here.
struct SnapshotLocation {
    tables: &'static LazyLock<Selector>,
    container: &'static str,
    nth: usize,
}

fn location(point: SnapshotPoint) -> SnapshotLocation {
    match point {
        SnapshotPoint::FirstBreak => SnapshotLocation {
            tables: &JEOPARDY_TABLES,
            container: "#jeopardy_round",
            nth: 1,
        },
        SnapshotPoint::EndRound1 => SnapshotLocation {
            tables: &JEOPARDY_TABLES,
            container: "#jeopardy_round",
            nth: 2,
        },
        SnapshotPoint::EndRound2 => SnapshotLocation {
            tables: &DOUBLE_JEOPARDY_TABLES,
            container: "#double_jeopardy_round",
            nth: 1,
        },
        SnapshotPoint::EndFinal => SnapshotLocation {
            tables: &FINAL_JEOPARDY_TABLES,
            container: "#final_jeopardy_round",
            nth: 1,
        },
    }
}

pub fn locate_snapshot(doc: &Html, point: SnapshotPoint) -> Result<ElementRef<'_>, ParseError> {
    let loc = location(point);
    doc.select(loc.tables)
        .nth(loc.nth)
        .ok_or(ParseError::MissingSnapshot {
            snapshot: point,
            container: loc.container,
            nth: loc.nth,
        })
}

/// Transpose one snapshot table. Row 0 holds player names, row 1 scores, and
/// an optional row 2 free-form remarks ("2-day champion: $43,400").
pub fn transpose_snapshot(
    table: ElementRef<'_>,
    point: SnapshotPoint,
) -> Result<Vec<ScoreSnapshotRecord>, ParseError> {
    let shape_error = |detail: String| ParseError::ScoreTable {
        snapshot: point,
        detail,
    };

    let rows = table_rows(table);
    let (players, values, remarks) = match rows.as_slice() {
        [players, values] => (players, values, None),
        [players, values, remarks] => (players, values, Some(remarks)),
        _ => {
            return Err(shape_error(format!(
                "expected 2 or 3 rows, found {}",
                rows.len()
            )));
        }
    };

    if players.is_empty() {
        return Err(shape_error("no players".to_string()));
    }
    if values.len() != players.len() || remarks.is_some_and(|r| r.len() != players.len()) {
        return Err(shape_error(format!(
            "{} players but {} values{}",
            players.len(),
            values.len(),
            remarks
                .map(|r| format!(" and {} remarks", r.len()))
                .unwrap_or_default()
        )));
    }

    players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let raw = &values[idx];
            let value = parse_signed_dollars(raw).ok_or_else(|| ParseError::InvalidNumber {
                field: "score",
                text: raw.clone(),
            })?;
            let additional_info = remarks
                .map(|r| r[idx].clone())
                .filter(|info| !info.is_empty());

            Ok(ScoreSnapshotRecord {
                player: player.clone(),
                value,
                additional_info,
                snapshot_point: point,
            })
        })
        .collect()
}

/// All four snapshots, in snapshot order.
pub fn parse_scores(doc: &Html) -> Result<Vec<ScoreSnapshotRecord>, ParseError> {
    let mut scores = Vec::new();
    for point in SnapshotPoint::ALL {
        let table = locate_snapshot(doc, point)?;
        scores.extend(transpose_snapshot(table, point)?);
    }
    Ok(scores)
}
