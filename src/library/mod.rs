use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Track metadata as produced by the library scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// File path; also identifies the track for stored lyrics.
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration_secs: f64,
    /// Lyrics embedded in the file's tags (read-only).
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl Track {
    #[cfg(test)]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
            artist: None,
            album: None,
            duration_secs: 0.0,
            lyrics: None,
        }
    }

    /// "Title - Artist", falling back to the file path.
    pub fn display_name(&self) -> String {
        match (non_empty(&self.title), non_empty(&self.artist)) {
            (Some(title), Some(artist)) => format!("{title} - {artist}"),
            (Some(title), None) => title.to_string(),
            _ => self.path.clone(),
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Load the scanner's JSON track list. A missing file is an empty library.
pub fn load(path: &Path) -> anyhow::Result<Vec<Track>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "library file not found, starting empty");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let tracks: Vec<Track> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    tracing::info!(count = tracks.len(), "library loaded");
    Ok(tracks)
}
