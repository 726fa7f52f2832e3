//! Per-episode CSV files: `<root>/{clues,final_round,scores}/episode_<id>.csv`.

use crate::models::{EpisodeId, EpisodeTables};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvExporter {
    root: PathBuf,
}

impl CsvExporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, facet: &str, episode: EpisodeId) -> PathBuf {
        self.root.join(facet).join(format!("episode_{}.csv", episode))
    }

    /// Write the three tables of one episode; returns the files written.
    /// Files are staged next to their targets and only renamed into place
    /// once all three are complete.
    pub fn write_episode(&self, tables: &EpisodeTables) -> Result<Vec<PathBuf>> {
        let mut staged = Vec::with_capacity(3);
        let result = self
            .stage("clues", tables.episode, &tables.clues, &mut staged)
            .and_then(|()| {
                self.stage("final_round", tables.episode, &tables.final_round, &mut staged)
            })
            .and_then(|()| self.stage("scores", tables.episode, &tables.scores, &mut staged));
        if let Err(e) = result {
            discard(staged.iter().map(|(tmp, _)| tmp));
            return Err(e);
        }

        let mut written = Vec::with_capacity(staged.len());
        for (idx, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = std::fs::rename(tmp, path) {
                discard(written.iter().chain(staged[idx..].iter().map(|(tmp, _)| tmp)));
                return Err(e).with_context(|| format!("Could not move {:?} into place", path));
            }
            written.push(path.clone());
        }
        Ok(written)
    }

    fn stage<T: Serialize>(
        &self,
        facet: &str,
        episode: EpisodeId,
        rows: &[T],
        staged: &mut Vec<(PathBuf, PathBuf)>,
    ) -> Result<()> {
        let path = self.path_for(facet, episode);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create dir {:?}", parent))?;
        }
        let tmp = path.with_extension("csv.tmp");
        staged.push((tmp.clone(), path));
        write_rows(&tmp, rows)?;
        debug!("Staged {} rows in {:?}", rows.len(), tmp);
        Ok(())
    }
}

/// Best-effort removal of files from an abandoned export.
pub fn discard<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            debug!("Could not remove {:?}: {}", path, e);
        }
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Could not create {:?}", path))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Could not write row to {:?}", path))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{fixtures, parse_episode};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jarchive-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_write_episode_layout_and_headers() {
        let dir = scratch_dir("csv-export");
        let tables = parse_episode(EpisodeId(173), &fixtures::standard_page()).unwrap();

        let written = CsvExporter::new(&dir).write_episode(&tables).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0], dir.join("clues").join("episode_173.csv"));

        let mut clues = csv::Reader::from_path(&written[0]).unwrap();
        let headers: Vec<String> = clues.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                "category",
                "round_number",
                "order_number",
                "value",
                "is_daily_double",
                "answer_text",
                "correct_response",
                "responder",
                "is_correct",
            ]
        );
        assert_eq!(clues.records().count(), 60);

        let mut scores = csv::Reader::from_path(&written[2]).unwrap();
        let rows: Vec<csv::StringRecord> = scores.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 12);
        assert_eq!(&rows[0][3], "FIRST_BREAK");
        assert_eq!(&rows[0][2], "");
        assert_eq!(&rows[11][2], "3rd place: $1,000");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_table_leaves_no_files_behind() {
        let dir = scratch_dir("csv-partial");
        std::fs::create_dir_all(&dir).unwrap();
        // A plain file where the scores directory should go.
        std::fs::write(dir.join("scores"), "").unwrap();
        let tables = parse_episode(EpisodeId(8), &fixtures::standard_page()).unwrap();

        let exporter = CsvExporter::new(&dir);
        assert!(exporter.write_episode(&tables).is_err());

        for facet in ["clues", "final_round"] {
            let path = exporter.path_for(facet, EpisodeId(8));
            assert!(!path.exists(), "{path:?} should not exist");
            assert!(!path.with_extension("csv.tmp").exists());
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_blank_clues_serialize_as_empty_fields() {
        let dir = scratch_dir("csv-blank");
        let tables = parse_episode(EpisodeId(5), &fixtures::standard_page()).unwrap();
        let written = CsvExporter::new(&dir).write_episode(&tables).unwrap();

        let mut reader = csv::Reader::from_path(&written[0]).unwrap();
        let blank = reader
            .records()
            .nth(fixtures::BLANK_CELLS[0])
            .unwrap()
            .unwrap();
        assert_eq!(&blank[0], fixtures::CATEGORIES[fixtures::BLANK_CELLS[0] % 6]);
        assert_eq!(&blank[2], "");
        assert_eq!(&blank[4], "false");
        assert_eq!(&blank[8], "");

        std::fs::remove_dir_all(&dir).ok();
    }
}
