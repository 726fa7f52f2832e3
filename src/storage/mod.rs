pub mod csv_export;

use crate::models::{EpisodeId, EpisodeTables};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use duckdb::{Connection, params};
use std::path::Path;
use tracing::{debug, info};

// ── Schema ────────────────────────────────────────────────────────────────────

const DDL: &str = r#"
CREATE SEQUENCE IF NOT EXISTS scrape_run_ids START 1;

CREATE TABLE IF NOT EXISTS episodes (
    episode      INTEGER PRIMARY KEY,
    show_number  INTEGER,
    air_date     DATE,
    scraped_at   TIMESTAMP NOT NULL
);

-- Child tables carry no unique index: an episode is replaced by
-- delete + insert inside one transaction.
CREATE TABLE IF NOT EXISTS clues (
    episode           INTEGER  NOT NULL,
    position          INTEGER  NOT NULL,
    round_number      INTEGER  NOT NULL,
    category          VARCHAR  NOT NULL,
    order_number      INTEGER,
    value             INTEGER,
    is_daily_double   BOOLEAN  NOT NULL,
    answer_text       VARCHAR,
    correct_response  VARCHAR,
    responder         VARCHAR,
    is_correct        BOOLEAN
);

CREATE TABLE IF NOT EXISTS final_round (
    episode           INTEGER  NOT NULL,
    position          INTEGER  NOT NULL,
    category          VARCHAR  NOT NULL,
    responder         VARCHAR  NOT NULL,
    response_text     VARCHAR  NOT NULL,
    wager             BIGINT   NOT NULL,
    is_correct        BOOLEAN  NOT NULL,
    correct_response  VARCHAR  NOT NULL
);

CREATE TABLE IF NOT EXISTS scores (
    episode          INTEGER  NOT NULL,
    snapshot_point   VARCHAR  NOT NULL,
    position         INTEGER  NOT NULL,
    player           VARCHAR  NOT NULL,
    value            BIGINT   NOT NULL,
    additional_info  VARCHAR
);

CREATE TABLE IF NOT EXISTS scrape_runs (
    id                  INTEGER PRIMARY KEY DEFAULT nextval('scrape_run_ids'),
    started_at          TIMESTAMP NOT NULL,
    finished_at         TIMESTAMP,
    status              VARCHAR NOT NULL DEFAULT 'running',
    episodes_processed  INTEGER DEFAULT 0,
    episodes_failed     INTEGER DEFAULT 0,
    error_msg           VARCHAR
);

CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TIMESTAMP NOT NULL
);
"#;

// ── Repository ────────────────────────────────────────────────────────────────

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create dir {:?}", parent))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open DuckDB at {:?}", path))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn run_migrations(&self) -> Result<()> {
        info!("Running migrations…");
        self.conn.execute_batch(DDL).context("DDL failed")?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, ?)",
            params![Utc::now().naive_utc()],
        )?;
        info!("Migrations done.");
        Ok(())
    }

    // ── Episodes ──────────────────────────────────────────────────────────────

    /// Replace everything stored for one episode; all or nothing.
    pub fn replace_episode(&self, tables: &EpisodeTables) -> Result<()> {
        let episode = i64::from(tables.episode.0);
        let tx = self.conn.unchecked_transaction()?;

        for table in ["clues", "final_round", "scores"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE episode = ?"),
                params![episode],
            )
            .with_context(|| format!("clear {table} for episode {episode}"))?;
        }

        tx.execute(
            r#"INSERT INTO episodes (episode, show_number, air_date, scraped_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (episode) DO UPDATE SET
                   show_number = excluded.show_number,
                   air_date    = excluded.air_date,
                   scraped_at  = excluded.scraped_at"#,
            params![
                episode,
                tables.meta.show_number.map(i64::from),
                tables.meta.air_date,
                Utc::now().naive_utc(),
            ],
        )
        .with_context(|| format!("upsert episode {episode}"))?;

        for (position, clue) in tables.clues.iter().enumerate() {
            tx.execute(
                r#"INSERT INTO clues
                       (episode, position, round_number, category, order_number, value,
                        is_daily_double, answer_text, correct_response, responder, is_correct)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    episode,
                    position as i64,
                    i64::from(clue.round_number),
                    clue.category,
                    clue.order_number.map(i64::from),
                    clue.value.map(i64::from),
                    clue.is_daily_double,
                    clue.answer_text,
                    clue.correct_response,
                    clue.responder,
                    clue.is_correct,
                ],
            )
            .with_context(|| format!("insert clue {position} of episode {episode}"))?;
        }

        for (position, entry) in tables.final_round.iter().enumerate() {
            tx.execute(
                r#"INSERT INTO final_round
                       (episode, position, category, responder, response_text,
                        wager, is_correct, correct_response)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    episode,
                    position as i64,
                    entry.category,
                    entry.responder,
                    entry.response_text,
                    entry.wager,
                    entry.is_correct,
                    entry.correct_response,
                ],
            )
            .with_context(|| format!("insert final response {position} of episode {episode}"))?;
        }

        for (position, score) in tables.scores.iter().enumerate() {
            tx.execute(
                r#"INSERT INTO scores
                       (episode, snapshot_point, position, player, value, additional_info)
                   VALUES (?, ?, ?, ?, ?, ?)"#,
                params![
                    episode,
                    score.snapshot_point.as_str(),
                    position as i64,
                    score.player,
                    score.value,
                    score.additional_info,
                ],
            )
            .with_context(|| format!("insert score {position} of episode {episode}"))?;
        }

        tx.commit()?;
        debug!(
            "Stored episode {}: {} clues, {} final, {} scores",
            episode,
            tables.clues.len(),
            tables.final_round.len(),
            tables.scores.len()
        );
        Ok(())
    }

    pub fn list_episodes(&self) -> Result<Vec<EpisodeId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT episode FROM episodes ORDER BY episode")?;
        let ids: Vec<EpisodeId> = stmt
            .query_map([], |r| r.get::<_, i64>(0))?
            .filter_map(|r| r.ok())
            .filter_map(|id| u32::try_from(id).ok().map(EpisodeId))
            .collect();
        Ok(ids)
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let n: i64 = self.conn.query_row(sql, [], |r| r.get(0))?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    pub fn episode_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM episodes")
    }

    pub fn clue_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM clues")
    }

    /// Grid slots that were never revealed.
    pub fn blank_clue_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM clues WHERE order_number IS NULL")
    }

    pub fn air_date_range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        let mut s = self
            .conn
            .prepare("SELECT MIN(air_date), MAX(air_date) FROM episodes")?;
        Ok(s.query_row([], |r| Ok((r.get(0)?, r.get(1)?)))?)
    }

    // ── Scrape run log ────────────────────────────────────────────────────────

    pub fn begin_scrape_run(&self) -> Result<i64> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO scrape_runs (started_at, status) VALUES (?, 'running') RETURNING id",
            params![Utc::now().naive_utc()],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    pub fn finish_scrape_run(
        &self,
        run_id: i64,
        processed: usize,
        failed: usize,
        error: Option<&str>,
    ) -> Result<()> {
        self.conn.execute(
            r#"UPDATE scrape_runs SET
               finished_at = ?, status = ?,
               episodes_processed = ?, episodes_failed = ?, error_msg = ?
               WHERE id = ?"#,
            params![
                Utc::now().naive_utc(),
                if error.is_none() { "success" } else { "error" },
                processed as i64,
                failed as i64,
                error,
                run_id,
            ],
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub fn run_status(&self, run_id: i64) -> Result<String> {
        let mut s = self
            .conn
            .prepare("SELECT status FROM scrape_runs WHERE id = ?")?;
        Ok(s.query_row(params![run_id], |r| r.get(0))?)
    }
}
