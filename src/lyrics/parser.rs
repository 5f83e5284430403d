//! LRC format parser
//!
//! Parses lyrics that are either plain text or synchronized LRC:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.00] Another line
//!
//! Minutes may be one or two digits and the fraction is optional
//! (two digits are hundredths, three digits are milliseconds).

use once_cell::sync::Lazy;
use regex::Regex;

/// Time value of a line that carries no timestamp.
pub const UNTIMED: f64 = -1.0;

static TIMED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([0-9]{1,2}):([0-9]{2})(?:\.([0-9]{2,3}))?\](.*)$")
        .expect("static LRC pattern is valid")
});

/// A single line of lyrics
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Seconds from track start, or [`UNTIMED`]
    pub time: f64,
    /// The lyrics text, trimmed
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }

    pub fn untimed(text: impl Into<String>) -> Self {
        Self::new(UNTIMED, text)
    }

    pub fn is_timed(&self) -> bool {
        self.time >= 0.0
    }
}

/// Parsed lyrics ready for display
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLyrics {
    /// Lines in playback order when synced, source order otherwise
    pub lines: Vec<LyricLine>,
    /// Whether at least one input line carried a timestamp
    pub synced: bool,
}

impl ParsedLyrics {
    /// Parse plain or LRC formatted lyrics
    pub fn parse(content: &str) -> Self {
        parse_lyrics(content)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the line to highlight at `position` seconds.
    ///
    /// Unsynced lyrics never have an active line.
    pub fn active_line(&self, position: f64) -> Option<usize> {
        if !self.synced {
            return None;
        }
        current_line_index_bisect(&self.lines, position)
    }
}

/// Parse raw lyric text into display lines.
///
/// Plain lines are kept only while no timestamp has been seen yet, so a file
/// that starts with plain lines and later switches to LRC keeps those leading
/// lines (with [`UNTIMED`], sorted to the front).
pub fn parse_lyrics(content: &str) -> ParsedLyrics {
    let mut lines = Vec::new();
    let mut synced = false;

    for line in content.split('\n') {
        let line = trim_line(line);
        if line.is_empty() {
            continue;
        }

        match parse_timed_line(line) {
            Some((time, text)) => {
                synced = true;
                if !text.is_empty() {
                    lines.push(LyricLine::new(time, text));
                }
            }
            None if !synced => lines.push(LyricLine::untimed(line)),
            None => {}
        }
    }

    if synced {
        lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    ParsedLyrics { lines, synced }
}

/// Parse a line like `[00:12.34]Lyrics` into (seconds, trimmed text)
fn parse_timed_line(line: &str) -> Option<(f64, &str)> {
    let caps = TIMED_LINE.captures(line)?;
    let minutes: u32 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u32 = caps.get(2)?.as_str().parse().ok()?;
    let millis = match caps.get(3) {
        Some(frac) => fraction_to_millis(frac.as_str())?,
        None => 0,
    };
    let text = trim_line(caps.get(4).map_or("", |m| m.as_str()));

    let time = f64::from(minutes * 60 + seconds) + f64::from(millis) / 1000.0;
    Some((time, text))
}

/// Whitespace plus the byte-order mark left by editors that save LRC as UTF-8 with BOM.
fn trim_line(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// "34" is hundredths, "340" milliseconds: right-pad to three digits.
fn fraction_to_millis(frac: &str) -> Option<u32> {
    format!("{frac:0<3}").parse().ok()
}

/// Index of the last line whose time is at or before `position`.
///
/// `lines` must be sorted ascending by time. Returns `None` when the list is
/// empty or the first line starts after `position`.
pub fn current_line_index(lines: &[LyricLine], position: f64) -> Option<usize> {
    let mut current = None;
    for (i, line) in lines.iter().enumerate() {
        if line.time <= position {
            current = Some(i);
        } else {
            break;
        }
    }
    current
}

/// Same result as [`current_line_index`] using a binary search.
pub fn current_line_index_bisect(lines: &[LyricLine], position: f64) -> Option<usize> {
    lines
        .partition_point(|line| line.time <= position)
        .checked_sub(1)
}
