//! Clue extraction and round aggregation.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::ParseError;
use super::cleaner::{parse_dollars, strip_daily_double_prefix};
use super::markup::{
    CATEGORY_NAME, CLUE, CLUE_ORDER, CLUE_TEXT, CLUE_VALUE, CLUE_VALUE_DD, ROUND, has_text,
    select_one, text_of,
};
use super::reveal::{Response, parse_response};
use crate::models::ClueRecord;

/// Rows per category column on a standard board.
pub const BOARD_ROWS: usize = 5;

/// One grid position before category/round assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum ClueCell {
    /// Never revealed (time ran out).
    Blank,
    Played {
        order_number: u32,
        value: u32,
        is_daily_double: bool,
        answer_text: String,
        response: Response,
    },
}

impl ClueCell {
    pub fn into_record(self, category: String, round_number: u32) -> ClueRecord {
        match self {
            ClueCell::Blank => ClueRecord {
                category,
                round_number,
                order_number: None,
                value: None,
                is_daily_double: false,
                answer_text: None,
                correct_response: None,
                responder: None,
                is_correct: None,
            },
            ClueCell::Played {
                order_number,
                value,
                is_daily_double,
                answer_text,
                response,
            } => ClueRecord {
                category,
                round_number,
                order_number: Some(order_number),
                value: Some(value),
                is_daily_double,
                answer_text: Some(answer_text),
                correct_response: Some(response.correct_response),
                responder: Some(response.responder),
                is_correct: Some(response.is_correct),
            },
        }
    }
}

// ── Cells ─────────────────────────────────────────────────────────────────────

/// Value of a played cell, always positive. The daily-double node, when
/// present, is the only one consulted.
pub fn parse_value(cell: ElementRef<'_>) -> Result<(u32, bool), ParseError> {
    let (node, is_daily_double) = match cell.select(&CLUE_VALUE_DD).next() {
        Some(dd) => (dd, true),
        None => (select_one(cell, &CLUE_VALUE, "clue cell", ".clue_value")?, false),
    };

    let raw = text_of(node);
    let amount = if is_daily_double {
        strip_daily_double_prefix(&raw)
    } else {
        raw.as_str()
    };
    let value = parse_dollars(amount)
        .filter(|value| *value > 0)
        .ok_or_else(|| ParseError::InvalidNumber {
            field: "clue value",
            text: raw.clone(),
        })?;

    Ok((value, is_daily_double))
}

/// Blank check runs first: an empty cell is blank whatever markers it has.
pub fn parse_clue(cell: ElementRef<'_>) -> Result<ClueCell, ParseError> {
    if !has_text(cell) {
        return Ok(ClueCell::Blank);
    }

    let (value, is_daily_double) = parse_value(cell)?;
    let response = parse_response(cell)?;
    let answer_text = text_of(select_one(cell, &CLUE_TEXT, "clue cell", ".clue_text")?);

    let order_raw = text_of(select_one(
        cell,
        &CLUE_ORDER,
        "clue cell",
        ".clue_order_number",
    )?);
    let order_number = order_raw
        .parse()
        .map_err(|_| ParseError::InvalidNumber {
            field: "clue order number",
            text: order_raw.clone(),
        })?;

    Ok(ClueCell::Played {
        order_number,
        value,
        is_daily_double,
        answer_text,
        response,
    })
}

// ── Rounds ────────────────────────────────────────────────────────────────────

pub fn category_names(board: ElementRef<'_>) -> Vec<String> {
    board.select(&CATEGORY_NAME).map(text_of).collect()
}

/// Every clue cell of one board, in document order (row by row), with its
/// column's category.
pub fn parse_round(
    board: ElementRef<'_>,
    round_number: u32,
) -> Result<Vec<ClueRecord>, ParseError> {
    let categories = category_names(board);
    let cells: Vec<ElementRef<'_>> = board.select(&CLUE).collect();

    if categories.is_empty() || cells.len() != categories.len() * BOARD_ROWS {
        return Err(ParseError::GridMismatch {
            round: round_number,
            cells: cells.len(),
            categories: categories.len(),
        });
    }

    cells
        .into_iter()
        .zip(categories.iter().cycle())
        .map(|(cell, category)| {
            parse_clue(cell).map(|clue| clue.into_record(category.clone(), round_number))
        })
        .collect()
}

/// All non-final rounds, numbered from 1 in document order, concatenated.
pub fn parse_rounds(doc: &Html) -> Result<Vec<ClueRecord>, ParseError> {
    let mut clues = Vec::new();

    for (idx, board) in doc.select(&ROUND).enumerate() {
        let round_number = idx as u32 + 1;
        let round = parse_round(board, round_number)?;
        debug!(
            "Round {}: {} cells ({} blank)",
            round_number,
            round.len(),
            round.iter().filter(|c| c.is_blank()).count()
        );
        clues.extend(round);
    }

    if clues.is_empty() {
        return Err(ParseError::MissingNode {
            scope: "page",
            selector: ".round",
        });
    }

    Ok(clues)
}
