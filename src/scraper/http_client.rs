use crate::config::ScraperConfig;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};
use url::Url;

use super::FetchError;
use super::robots::RobotsPolicy;

pub struct HttpClient {
    inner: reqwest::Client,
    config: ScraperConfig,
    robots: RobotsPolicy,
    last_request: Mutex<Option<Instant>>,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig, robots: RobotsPolicy) -> Result<Self, FetchError> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            inner,
            config: config.clone(),
            robots,
            last_request: Mutex::new(None),
        })
    }

    /// Build a client and load the site's robots.txt into it.
    pub async fn connect(config: &ScraperConfig) -> Result<Self, FetchError> {
        let mut client = Self::new(config, RobotsPolicy::allow_all())?;
        if !config.respect_robots {
            warn!("robots.txt checks disabled by configuration");
            return Ok(client);
        }

        let robots_url = Url::parse(&config.robots_url).map_err(|source| {
            FetchError::InvalidUrl {
                url: config.robots_url.clone(),
                source,
            }
        })?;

        let robots = match client.get_once(&robots_url).await {
            Ok(body) => RobotsPolicy::parse(&body, &config.user_agent),
            // No robots.txt (4xx) means no restrictions.
            Err(FetchError::Status { status, .. }) if status.is_client_error() => {
                info!("No robots.txt at {} ({}), assuming no restrictions", robots_url, status);
                RobotsPolicy::allow_all()
            }
            Err(e) => return Err(e),
        };
        client.robots = robots;

        info!(
            "Politeness: {:?} between requests (robots crawl-delay {:?})",
            client.min_delay(),
            client.robots.crawl_delay()
        );
        Ok(client)
    }

    /// Configured delay, raised to the robots.txt crawl-delay if that is longer.
    pub fn min_delay(&self) -> Duration {
        let configured = Duration::from_millis(self.config.request_delay_ms);
        self.robots
            .crawl_delay()
            .map_or(configured, |crawl| crawl.max(configured))
    }

    /// Fetch a URL as text, honoring robots rules, the request delay and
    /// retrying transient failures.
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let path = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        if !self.robots.is_allowed(&path) {
            return Err(FetchError::Disallowed {
                url: url.to_string(),
            });
        }

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.config.request_delay_ms.max(1))
            .max_delay(Duration::from_secs(120))
            .map(jitter)
            .take(self.config.max_retries as usize);

        RetryIf::spawn(
            strategy,
            move || self.get_once(url),
            |e: &FetchError| {
                let retry = e.is_transient();
                if retry {
                    warn!("GET {} failed, retrying: {}", url, e);
                }
                retry
            },
        )
        .await
    }

    async fn get_once(&self, url: &Url) -> Result<String, FetchError> {
        self.polite_delay().await;
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// Sleep until the delay + random jitter since the previous request has passed.
    async fn polite_delay(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let jitter = Duration::from_millis(rand::random_range(0..=self.config.jitter_ms));
            let wait = (self.min_delay() + jitter).saturating_sub(prev.elapsed());
            if !wait.is_zero() {
                debug!("Waiting {:?} before next request", wait);
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(delay_ms: u64) -> ScraperConfig {
        ScraperConfig {
            request_delay_ms: delay_ms,
            ..ScraperConfig::default()
        }
    }

    #[test]
    fn test_min_delay_takes_longer_of_config_and_crawl_delay() {
        let robots = RobotsPolicy::parse("User-agent: *\nCrawl-delay: 20\n", "x");
        let client = HttpClient::new(&config(2000), robots).unwrap();
        assert_eq!(client.min_delay(), Duration::from_secs(20));

        let client = HttpClient::new(&config(30_000), RobotsPolicy::allow_all()).unwrap();
        assert_eq!(client.min_delay(), Duration::from_secs(30));
    }

    #[test]
    fn test_disallowed_path_is_refused_without_request() {
        let robots = RobotsPolicy::parse("User-agent: *\nDisallow: /showgame.php\n", "x");
        let client = HttpClient::new(&config(0), robots).unwrap();
        let url = Url::parse("http://www.j-archive.com/showgame.php?game_id=1").unwrap();

        let err = tokio_test::block_on(client.get_text(&url)).unwrap_err();
        assert!(matches!(err, FetchError::Disallowed { .. }));
    }
}
