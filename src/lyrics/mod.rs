//! Lyrics engine
//!
//! This module provides:
//! - LRC parser and active-line resolver
//! - Per-song view/edit/fetch/save state machine
//! - LRCLIB API client for fetching lyrics

pub mod error;
pub mod lrclib;
pub mod notice;
pub mod parser;
pub mod session;

pub use error::LyricsError;
pub use lrclib::LrclibClient;
pub use parser::ParsedLyrics;
pub use session::{Effect, FetchRequest, LyricsSession, StateTag, Ticket};

/// Look lyrics up online. Returns the raw text as published, untouched.
pub async fn fetch_lyrics(
    client: &LrclibClient,
    title: &str,
    artist: &str,
    album: Option<&str>,
    duration_secs: Option<u32>,
) -> anyhow::Result<Option<String>> {
    let result = client.get_lyrics(title, artist, album, duration_secs).await?;
    Ok(result.and_then(lrclib::LrclibResponse::best_text))
}
