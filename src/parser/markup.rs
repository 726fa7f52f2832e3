//! Thin adapter over `scraper`: tree building, the selectors the archive
//! layout depends on, and a couple of lookup helpers.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::ParseError;
use super::cleaner::normalise_text;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

// ── Page layout ───────────────────────────────────────────────────────────────

pub static GAME_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("#game_title"));
pub static ROUND: LazyLock<Selector> = LazyLock::new(|| selector(".round"));
pub static FINAL_ROUND: LazyLock<Selector> = LazyLock::new(|| selector(".final_round"));
pub static CATEGORY_NAME: LazyLock<Selector> = LazyLock::new(|| selector(".category_name"));

// ── Clue cells ────────────────────────────────────────────────────────────────

pub static CLUE: LazyLock<Selector> = LazyLock::new(|| selector(".clue"));
pub static CLUE_VALUE: LazyLock<Selector> = LazyLock::new(|| selector(".clue_value"));
pub static CLUE_VALUE_DD: LazyLock<Selector> =
    LazyLock::new(|| selector(".clue_value_daily_double"));
pub static CLUE_ORDER: LazyLock<Selector> = LazyLock::new(|| selector(".clue_order_number"));
pub static CLUE_TEXT: LazyLock<Selector> = LazyLock::new(|| selector(".clue_text"));
pub static REVEAL_TRIGGER: LazyLock<Selector> = LazyLock::new(|| selector("div[onmouseover]"));

// ── Reveal panel fragment ─────────────────────────────────────────────────────

pub static CORRECT_RESPONSE: LazyLock<Selector> =
    LazyLock::new(|| selector(".correct_response"));
pub static RIGHT: LazyLock<Selector> = LazyLock::new(|| selector(".right"));
pub static WRONG: LazyLock<Selector> = LazyLock::new(|| selector(".wrong"));

// ── Tables ────────────────────────────────────────────────────────────────────

pub static TR: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
pub static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));

pub static JEOPARDY_TABLES: LazyLock<Selector> =
    LazyLock::new(|| selector("#jeopardy_round > table"));
pub static DOUBLE_JEOPARDY_TABLES: LazyLock<Selector> =
    LazyLock::new(|| selector("#double_jeopardy_round > table"));
pub static FINAL_JEOPARDY_TABLES: LazyLock<Selector> =
    LazyLock::new(|| selector("#final_jeopardy_round > table"));

// ── Helpers ───────────────────────────────────────────────────────────────────

pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

pub fn parse_fragment(markup: &str) -> Html {
    Html::parse_fragment(markup)
}

/// All descendant text, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalise_text(&el.text().collect::<String>())
}

pub fn has_text(el: ElementRef<'_>) -> bool {
    el.text().any(|t| !t.trim().is_empty())
}

/// First match of `sel` under `scope`, or a `MissingNode` error naming both.
pub fn select_one<'a>(
    scope: ElementRef<'a>,
    sel: &Selector,
    scope_name: &'static str,
    css: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    scope.select(sel).next().ok_or(ParseError::MissingNode {
        scope: scope_name,
        selector: css,
    })
}

/// Cell texts of every `<tr>` under `scope`, in document order.
pub fn table_rows(scope: ElementRef<'_>) -> Vec<Vec<String>> {
    scope
        .select(&TR)
        .map(|tr| tr.select(&TD).map(text_of).collect())
        .collect()
}
