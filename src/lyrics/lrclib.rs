//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format) lyrics.
//! API Documentation: https://lrclib.net/docs

use anyhow::Context;
use serde::Deserialize;

use crate::config::LyricsConfig;

/// LRCLIB API response
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LrclibResponse {
    #[allow(dead_code)]
    pub id: Option<i64>,
    #[allow(dead_code)]
    pub track_name: Option<String>,
    #[allow(dead_code)]
    pub artist_name: Option<String>,
    #[allow(dead_code)]
    pub album_name: Option<String>,
    #[allow(dead_code)]
    pub duration: Option<f64>,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

impl LrclibResponse {
    /// Synced lyrics if present, else plain lyrics; blank text counts as absent.
    pub fn best_text(self) -> Option<String> {
        if has_text(&self.synced_lyrics) {
            return self.synced_lyrics;
        }
        if has_text(&self.plain_lyrics) {
            return self.plain_lyrics;
        }
        None
    }
}

fn has_text(lyrics: &Option<String>) -> bool {
    lyrics.as_ref().is_some_and(|t| !t.trim().is_empty())
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
    search_fallback: bool,
}

impl LrclibClient {
    pub fn new(cfg: &LyricsConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: cfg.lrclib_base_url.trim_end_matches('/').to_string(),
            search_fallback: cfg.search_fallback,
        })
    }

    /// Get lyrics by track info
    pub async fn get_lyrics(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        // First try the "get" endpoint with exact match
        if let Some(lyrics) = self
            .get_exact(track_name, artist_name, album_name, duration_secs)
            .await?
        {
            return Ok(Some(lyrics));
        }

        if !self.search_fallback {
            return Ok(None);
        }
        self.search(track_name, artist_name).await
    }

    fn exact_url(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: Option<&str>,
        duration_secs: Option<u32>,
    ) -> String {
        let mut url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        );

        if let Some(album) = album_name {
            url.push_str(&format!("&album_name={}", urlencoding::encode(album)));
        }

        if let Some(duration) = duration_secs {
            url.push_str(&format!("&duration={duration}"));
        }
        url
    }

    /// Get lyrics with exact match
    async fn get_exact(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let url = self.exact_url(track_name, artist_name, album_name, duration_secs);
        tracing::debug!(%url, "lrclib get");

        let response = self.client.get(&url).send().await.context("lrclib request")?;

        if response.status().is_success() {
            let lyrics: LrclibResponse = response.json().await.context("decode lrclib response")?;
            Ok(Some(lyrics))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB API error: {}", response.status());
        }
    }

    /// Search for lyrics
    async fn search(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let query = format!("{track_name} {artist_name}");
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(&query));
        tracing::debug!(%url, "lrclib search");

        let response = self.client.get(&url).send().await.context("lrclib search")?;

        if response.status().is_success() {
            let results: Vec<LrclibResponse> =
                response.json().await.context("decode lrclib search")?;
            Ok(pick_search_result(results))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB search error: {}", response.status());
        }
    }
}

/// First result with synced lyrics, else the first with plain lyrics.
fn pick_search_result(results: Vec<LrclibResponse>) -> Option<LrclibResponse> {
    let idx = results
        .iter()
        .position(|r| has_text(&r.synced_lyrics))
        .or_else(|| results.iter().position(|r| has_text(&r.plain_lyrics)))?;
    results.into_iter().nth(idx)
}
