pub mod http_client;
pub mod robots;

use crate::config::ScraperConfig;
use crate::models::EpisodeId;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use self::http_client::HttpClient;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} is disallowed by robots.txt")]
    Disallowed { url: String },

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no saved page for episode {0}")]
    NotSaved(EpisodeId),

    #[error("could not read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Worth another attempt: connection trouble, rate limiting, server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request { .. } => true,
            FetchError::Status { status, .. } => {
                status.as_u16() == 429 || status.is_server_error()
            }
            _ => false,
        }
    }
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable page source: the live archive or pages saved on disk.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_page(&self, episode: EpisodeId) -> Result<String, FetchError>;
}

// ── j-archive scraper ─────────────────────────────────────────────────────────

pub struct JArchiveScraper {
    client: HttpClient,
    base_url: Url,
}

impl JArchiveScraper {
    pub async fn connect(config: &ScraperConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self {
            client: HttpClient::connect(config).await?,
            base_url,
        })
    }

    /// e.g. 173 → showgame.php?game_id=173
    pub fn episode_url(&self, episode: EpisodeId) -> Url {
        episode_url(&self.base_url, episode)
    }
}

fn episode_url(base: &Url, episode: EpisodeId) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("game_id", &episode.to_string());
    url
}

#[async_trait]
impl PageSource for JArchiveScraper {
    async fn get_page(&self, episode: EpisodeId) -> Result<String, FetchError> {
        let url = self.episode_url(episode);
        debug!("Fetching episode {} ({})", episode, url);
        self.client.get_text(&url).await
    }
}
