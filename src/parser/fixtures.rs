//! Synthetic archive pages for tests, laid out like the live site.

pub const CATEGORIES: [&str; 6] = [
    "WORLD CAPITALS",
    "POTENT POTABLES",
    "BEFORE & AFTER",
    "SCIENCE",
    "U.S. HISTORY",
    "WORDPLAY",
];

pub const PLAYERS: [&str; 3] = ["Ken", "Brad", "Julia"];

/// Unplayed cells of the first board in [`standard_page`].
pub const BLANK_CELLS: [usize; 2] = [23, 29];

/// Daily double of the first board in [`standard_page`] ("DD: $2,000").
pub const DAILY_DOUBLE_CELL: usize = 14;

pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Reveal fragment of a regular clue.
pub fn clue_panel(correct_response: &str, right: Option<&str>, wrong: &[&str]) -> String {
    let mut cells = String::new();
    for name in wrong {
        cells.push_str(&format!("<td class=\"wrong\">{name}</td>"));
    }
    if let Some(name) = right {
        cells.push_str(&format!("<td class=\"right\">{name}</td>"));
    }
    format!(
        "<em class=\"correct_response\">{correct_response}</em><br /><br />\
         <table width=\"100%\"><tr>{cells}</tr></table>"
    )
}

fn clue_cell(round: u32, idx: usize, value_markup: &str, panel: &str) -> String {
    let id = format!("clue_{round}_{}_{}", idx % 6 + 1, idx / 6 + 1);
    format!(
        "<td class=\"clue\">\n<table><tr><td>\
         <div onmouseover=\"toggle('{id}', '{id}_stuck', '{panel}')\" \
         onmouseout=\"toggle('{id}', '{id}_stuck', 'Clue {round}-{n}')\">\
         <table class=\"clue_header\"><tr>{value_markup}\
         <td class=\"clue_order_number\"><a href=\"suggestcorrection.php\">{n}</a></td>\
         </tr></table></div></td></tr>\
         <tr><td id=\"{id}\" class=\"clue_text\">Clue {round}-{n}</td></tr></table>\n</td>",
        panel = escape_attr(panel),
        n = idx + 1,
    )
}

/// A played cell whose responder rotates through [`PLAYERS`]; every fifth
/// cell is missed.
pub fn played_cell(round: u32, idx: usize, value: &str, daily_double: bool) -> String {
    let player = PLAYERS[idx % PLAYERS.len()];
    let answer = format!("Answer {round}-{}", idx + 1);
    let panel = if idx % 5 == 4 {
        clue_panel(&answer, None, &[player])
    } else {
        clue_panel(&answer, Some(player), &[])
    };
    let value_markup = if daily_double {
        format!("<td class=\"clue_value_daily_double\">DD: {value}</td>")
    } else {
        format!("<td class=\"clue_value\">{value}</td>")
    };
    clue_cell(round, idx, &value_markup, &panel)
}

pub fn blank_cell() -> String {
    "<td class=\"clue\">\n</td>".to_string()
}

/// A board with `categories.len() * 5` cells laid out row by row.
pub fn round_board(categories: &[&str], cell: impl Fn(usize) -> String) -> String {
    let mut html = String::from("<table class=\"round\">\n<tr class=\"categories\">");
    for name in categories {
        html.push_str(&format!(
            "<td class=\"category\"><table><tr><td class=\"category_name\">{name}</td></tr>\
             <tr><td class=\"category_comments\"></td></tr></table></td>"
        ));
    }
    html.push_str("</tr>\n");
    for row in 0..5 {
        html.push_str("<tr>");
        for col in 0..categories.len() {
            html.push_str(&cell(row * categories.len() + col));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

/// One contestant's final-round line: name, response, wager, correct?
pub type FinalEntry<'a> = (&'a str, &'a str, &'a str, bool);

pub fn final_panel(correct_response: &str, entries: &[FinalEntry<'_>]) -> String {
    let mut rows = String::new();
    for (name, response, wager, correct) in entries {
        let class = if *correct { "right" } else { "wrong" };
        rows.push_str(&format!(
            "<tr><td class=\"{class}\">{name}</td><td rowspan=\"2\" valign=\"top\">{response}</td></tr>\
             <tr><td>{wager}</td></tr>"
        ));
    }
    format!(
        "<table width=\"100%\">{rows}</table>\
         <em class=\"correct_response\">{correct_response}</em>"
    )
}

pub fn final_board(category: &str, panel: &str) -> String {
    format!(
        "<table class=\"final_round\">\n<tr><td class=\"category\">\
         <div onmouseover=\"toggle('clue_FJ', 'clue_FJ_stuck', '{panel}')\" \
         onmouseout=\"toggle('clue_FJ', 'clue_FJ_stuck', '')\">\
         <table><tr><td class=\"category_name\">{category}</td></tr>\
         <tr><td class=\"category_comments\"></td></tr></table></div></td></tr>\n\
         <tr><td class=\"clue\"><table><tr><td id=\"clue_FJ\" class=\"clue_text\">\
         This city hosted the first modern Olympics</td></tr></table></td></tr>\n</table>\n",
        panel = escape_attr(panel),
    )
}

pub fn score_table(names: &[&str], values: &[&str], remarks: Option<&[&str]>) -> String {
    let mut html = String::from("<table>\n<tr>");
    for name in names {
        html.push_str(&format!("<td class=\"score_player_nickname\">{name}</td>"));
    }
    html.push_str("</tr>\n<tr>");
    for value in values {
        let class = if value.contains('-') {
            "score_negative"
        } else {
            "score_positive"
        };
        html.push_str(&format!("<td class=\"{class}\">{value}</td>"));
    }
    html.push_str("</tr>\n");
    if let Some(remarks) = remarks {
        html.push_str("<tr>");
        for remark in remarks {
            html.push_str(&format!("<td class=\"score_remarks\">{remark}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

/// Parts of an episode page; any part can be swapped to build broken pages.
pub struct Page {
    pub title: String,
    pub jeopardy: String,
    pub first_break: String,
    pub end_round_1: String,
    pub double_jeopardy: String,
    pub end_round_2: String,
    pub final_round: String,
    pub final_scores: String,
}

impl Page {
    pub fn standard() -> Self {
        let jeopardy = round_board(&CATEGORIES, |idx| {
            if BLANK_CELLS.contains(&idx) {
                blank_cell()
            } else if idx == DAILY_DOUBLE_CELL {
                played_cell(1, idx, "$2,000", true)
            } else {
                played_cell(1, idx, &format!("${}", 200 * (idx / 6 + 1)), false)
            }
        });
        let double_jeopardy = round_board(&CATEGORIES, |idx| {
            if idx == 8 || idx == 21 {
                played_cell(2, idx, "$3,000", true)
            } else {
                played_cell(2, idx, &format!("${}", 400 * (idx / 6 + 1)), false)
            }
        });
        let final_round = final_board(
            "OLYMPIC CITIES",
            &final_panel(
                "Athens",
                &[
                    ("Ken", "What is Athens?", "$5,000", true),
                    ("Brad", "What is Rome?", "$-200", false),
                    ("Julia", "What is Athens?", "$0", true),
                ],
            ),
        );

        Self {
            title: "Show #4596 - Friday, July 23, 2004".to_string(),
            jeopardy,
            first_break: score_table(&PLAYERS, &["$2,400", "$1,000", "-$400"], None),
            end_round_1: score_table(&PLAYERS, &["$5,200", "$3,000", "$600"], None),
            double_jeopardy,
            end_round_2: score_table(&PLAYERS, &["$18,400", "$9,000", "$4,200"], None),
            final_round,
            final_scores: score_table(
                &PLAYERS,
                &["$23,400", "$8,800", "$4,200"],
                Some(&["2-day champion: $43,400", "2nd place: $2,000", "3rd place: $1,000"]),
            ),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><title>J! Archive</title></head><body>\n\
             <div id=\"content\">\n\
             <div id=\"game_title\"><h1>{title}</h1></div>\n\
             <div id=\"jeopardy_round\">\n<h2>Jeopardy! Round</h2>\n{jeopardy}\
             <h3>Scores at the first commercial break (after clue 15):</h3>\n{first_break}\
             <h3>Scores at the end of the Jeopardy! Round:</h3>\n{end_round_1}</div>\n\
             <div id=\"double_jeopardy_round\">\n<h2>Double Jeopardy! Round</h2>\n{double_jeopardy}\
             <h3>Scores at the end of the Double Jeopardy! Round:</h3>\n{end_round_2}</div>\n\
             <div id=\"final_jeopardy_round\">\n<h2>Final Jeopardy! Round</h2>\n{final_round}\
             <h3>Final scores:</h3>\n{final_scores}</div>\n\
             </div>\n</body></html>\n",
            title = self.title,
            jeopardy = self.jeopardy,
            first_break = self.first_break,
            end_round_1 = self.end_round_1,
            double_jeopardy = self.double_jeopardy,
            end_round_2 = self.end_round_2,
            final_round = self.final_round,
            final_scores = self.final_scores,
        )
    }
}

pub fn standard_page() -> String {
    Page::standard().render()
}
