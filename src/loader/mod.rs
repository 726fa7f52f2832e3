//! Saved-page loader: episode pages previously downloaded to a directory.

use crate::models::EpisodeId;
use crate::scraper::{FetchError, PageSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Episode id from the trailing digits of a file stem:
/// `episode_173.html`, `showgame-173.htm`, `173.html`.
pub fn extract_episode_from_filename(path: &Path) -> Option<EpisodeId> {
    let stem = path.file_stem()?.to_str()?;
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    digits.parse().ok().map(EpisodeId)
}

pub fn discover_html_files(dir: &Path) -> Result<BTreeMap<EpisodeId, PathBuf>> {
    let mut files = BTreeMap::new();
    if !dir.exists() {
        return Ok(files);
    }

    for entry in std::fs::read_dir(dir).with_context(|| format!("Could not list {:?}", dir))? {
        let path = entry?.path();
        let is_html = path
            .extension()
            .map(|e| e == "html" || e == "htm")
            .unwrap_or(false);
        if !path.is_file() || !is_html {
            continue;
        }

        match extract_episode_from_filename(&path) {
            Some(episode) => {
                if let Some(previous) = files.insert(episode, path.clone()) {
                    warn!("Episode {} saved twice: {:?} replaces {:?}", episode, path, previous);
                }
            }
            None => debug!("Skipping {:?}: no episode id in file name", path),
        }
    }
    Ok(files)
}

/// Pages on disk, keyed by episode id.
pub struct LocalPageSource {
    pages: BTreeMap<EpisodeId, PathBuf>,
}

impl LocalPageSource {
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let pages = discover_html_files(dir)?;
        info!("Found {} saved episode pages in {:?}", pages.len(), dir);
        Ok(Self { pages })
    }

    pub fn single(episode: EpisodeId, path: PathBuf) -> Self {
        Self {
            pages: BTreeMap::from([(episode, path)]),
        }
    }

    /// Ascending episode order.
    pub fn episodes(&self) -> Vec<EpisodeId> {
        self.pages.keys().copied().collect()
    }
}

#[async_trait]
impl PageSource for LocalPageSource {
    async fn get_page(&self, episode: EpisodeId) -> Result<String, FetchError> {
        let path = self.pages.get(&episode).ok_or(FetchError::NotSaved(episode))?;
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_episode_from_filename() {
        let id = |name: &str| extract_episode_from_filename(Path::new(name));
        assert_eq!(id("pages/episode_173.html"), Some(EpisodeId(173)));
        assert_eq!(id("showgame-8.htm"), Some(EpisodeId(8)));
        assert_eq!(id("42.html"), Some(EpisodeId(42)));
        assert_eq!(id("index.html"), None);
    }

    #[test]
    fn test_local_source_reads_saved_pages() {
        let dir = std::env::temp_dir().join(format!("jarchive-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("episode_12.html"), "<html>12</html>").unwrap();
        std::fs::write(dir.join("episode_3.html"), "<html>3</html>").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let source = LocalPageSource::from_dir(&dir).unwrap();
        assert_eq!(source.episodes(), vec![EpisodeId(3), EpisodeId(12)]);

        let page = tokio_test::block_on(source.get_page(EpisodeId(12))).unwrap();
        assert_eq!(page, "<html>12</html>");

        let missing = tokio_test::block_on(source.get_page(EpisodeId(99))).unwrap_err();
        assert!(matches!(missing, FetchError::NotSaved(EpisodeId(99))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
