//! The "reveal on hover" panel.
//!
//! Each clue (and the final round's category cell) carries a `div` whose
//! `onmouseover` attribute holds a script call with a markup string inside:
//!
//! ```text
//! toggle('clue_J_1_1', 'clue_J_1_1_stuck', '<em class="correct_response">...</em>
//!     <table><tr><td class="right">Ken</td></tr></table>')
//! ```
//!
//! That string is parsed as a second, independent tree.

use scraper::{ElementRef, Html};
use std::collections::HashSet;

use super::ParseError;
use super::cleaner::unescape_script_string;
use super::markup::{
    self, CORRECT_RESPONSE, REVEAL_TRIGGER, RIGHT, WRONG, parse_fragment, select_one, text_of,
};

/// Who answered, and whether they got it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub responder: String,
    pub is_correct: bool,
}

/// Response data for a regular clue cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub correct_response: String,
    pub responder: String,
    pub is_correct: bool,
}

pub struct RevealPanel {
    fragment: Html,
}

impl RevealPanel {
    /// Locate the reveal trigger under `cell` and parse its fragment.
    pub fn from_cell(cell: ElementRef<'_>, scope: &'static str) -> Result<Self, ParseError> {
        let trigger = select_one(cell, &REVEAL_TRIGGER, scope, "div[onmouseover]")?;
        let markup = trigger.value().attr("onmouseover").unwrap_or_default();
        Ok(Self::parse(markup))
    }

    pub fn parse(markup: &str) -> Self {
        Self {
            fragment: parse_fragment(&unescape_script_string(markup)),
        }
    }

    fn root(&self) -> ElementRef<'_> {
        self.fragment.root_element()
    }

    /// First correct-response span.
    pub fn correct_response(&self) -> Result<String, ParseError> {
        select_one(self.root(), &CORRECT_RESPONSE, "reveal panel", ".correct_response")
            .map(text_of)
    }

    /// Last correct-response span; the final round repeats the marker and the
    /// last one carries the answer.
    pub fn last_correct_response(&self) -> Result<String, ParseError> {
        self.root()
            .select(&CORRECT_RESPONSE)
            .last()
            .map(text_of)
            .ok_or(ParseError::MissingNode {
                scope: "reveal panel",
                selector: ".correct_response",
            })
    }

    /// A `.right` marker wins over any `.wrong` ones (a clue can be missed
    /// by one player before another answers it).
    pub fn outcome(&self) -> Result<Outcome, ParseError> {
        if let Some(right) = self.root().select(&RIGHT).next() {
            return Ok(Outcome {
                responder: text_of(right),
                is_correct: true,
            });
        }
        if let Some(wrong) = self.root().select(&WRONG).next() {
            return Ok(Outcome {
                responder: text_of(wrong),
                is_correct: false,
            });
        }
        Err(ParseError::MissingOutcome)
    }

    pub fn correct_responders(&self) -> HashSet<String> {
        self.root().select(&RIGHT).map(text_of).collect()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        markup::table_rows(self.root())
    }
}

/// Response data for one played clue cell.
pub fn parse_response(cell: ElementRef<'_>) -> Result<Response, ParseError> {
    let panel = RevealPanel::from_cell(cell, "clue cell")?;
    let correct_response = panel.correct_response()?;
    let Outcome {
        responder,
        is_correct,
    } = panel.outcome()?;

    Ok(Response {
        correct_response,
        responder,
        is_correct,
    })
}
