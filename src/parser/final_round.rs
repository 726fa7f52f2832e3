//! Final-round wagers and responses.
//!
//! The reveal panel's response table spends two rows per contestant:
//!
//! ```text
//! | Ken (right/wrong marker) | What is Athens? |
//! | $5,000                   |                 |
//! ```

use scraper::{ElementRef, Html};
use std::collections::HashSet;

use super::ParseError;
use super::cleaner::parse_signed_dollars;
use super::markup::{CATEGORY_NAME, FINAL_ROUND, select_one, text_of};
use super::reveal::RevealPanel;
use crate::models::FinalRoundRecord;

pub fn parse_final_round(doc: &Html) -> Result<Vec<FinalRoundRecord>, ParseError> {
    let node = doc.select(&FINAL_ROUND).next().ok_or(ParseError::MissingNode {
        scope: "page",
        selector: ".final_round",
    })?;
    extract_final_round(node)
}

pub fn extract_final_round(node: ElementRef<'_>) -> Result<Vec<FinalRoundRecord>, ParseError> {
    let category = text_of(select_one(node, &CATEGORY_NAME, "final round", ".category_name")?);
    let panel = RevealPanel::from_cell(node, "final round")?;
    let correct_response = panel.last_correct_response()?;
    let winners = panel.correct_responders();

    pair_rows(&panel.rows(), |idx, entry, wager| {
        contestant(idx, entry, wager, &category, &correct_response, &winners)
    })
}

/// Folds rows two at a time; a dangling row means the table is malformed.
fn pair_rows<T>(
    rows: &[Vec<String>],
    mut build: impl FnMut(usize, &[String], &[String]) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    if rows.len() % 2 != 0 {
        return Err(ParseError::OddResponseRows(rows.len()));
    }

    rows.chunks_exact(2)
        .enumerate()
        .try_fold(Vec::with_capacity(rows.len() / 2), |mut acc, (idx, pair)| {
            acc.push(build(idx, &pair[0], &pair[1])?);
            Ok(acc)
        })
}

fn contestant(
    idx: usize,
    entry: &[String],
    wager: &[String],
    category: &str,
    correct_response: &str,
    winners: &HashSet<String>,
) -> Result<FinalRoundRecord, ParseError> {
    let [responder, response_text, ..] = entry else {
        return Err(ParseError::MalformedRow {
            row: idx * 2,
            expected: "responder and response cells",
        });
    };
    let Some(wager_raw) = wager.first() else {
        return Err(ParseError::MalformedRow {
            row: idx * 2 + 1,
            expected: "a wager cell",
        });
    };
    let wager = parse_signed_dollars(wager_raw).ok_or_else(|| ParseError::InvalidNumber {
        field: "final round wager",
        text: wager_raw.clone(),
    })?;

    Ok(FinalRoundRecord {
        category: category.to_string(),
        responder: responder.clone(),
        response_text: response_text.clone(),
        wager,
        is_correct: winners.contains(responder),
        correct_response: correct_response.to_string(),
    })
}
