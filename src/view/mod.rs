//! Plain-text presenter for the session.
//!
//! Prints what changed since the last draw: the shown track, the lyrics
//! state, new notices and the active lyric line.

use crate::app::state::AppState;
use crate::lyrics::{LyricsSession, StateTag};
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub struct View<W: Write> {
    out: W,
    notice_ttl: Duration,
    last_path: Option<String>,
    last_tag: Option<StateTag>,
    last_line: Option<usize>,
    last_notice: Option<Instant>,
}

impl<W: Write> View<W> {
    pub fn new(out: W, notice_ttl: Duration) -> Self {
        Self {
            out,
            notice_ttl,
            last_path: None,
            last_tag: None,
            last_line: None,
            last_notice: None,
        }
    }

    pub fn draw(&mut self, state: &mut AppState) -> io::Result<()> {
        let session = &mut state.lyrics;
        session.clear_expired_notice(self.notice_ttl);

        let path = session.track().map(|t| t.path.clone());
        if path != self.last_path {
            if let Some(track) = session.track() {
                writeln!(self.out, "> {}", track.display_name())?;
            }
            self.last_path = path;
            self.last_tag = None;
            self.last_line = None;
        }

        if let Some(notice) = session.last_notice()
            && self.last_notice != Some(notice.created_at)
        {
            writeln!(self.out, "[{}] {}", notice.kind.label(), notice.message)?;
            self.last_notice = Some(notice.created_at);
        }

        let tag = session.tag();
        if session.track().is_some() && self.last_tag != Some(tag) {
            writeln!(self.out, "lyrics: {}", describe(session))?;
            self.last_tag = Some(tag);
        }

        let line = match tag {
            StateTag::Edit | StateTag::Saving => None,
            _ => session.active_line(),
        };
        if line != self.last_line {
            if let Some(text) = line.and_then(|i| session.lines().get(i)) {
                writeln!(self.out, "  ~ {}", text.text)?;
            }
            self.last_line = line;
        }

        self.out.flush()
    }

    pub fn print_tracks(&mut self, state: &AppState) -> io::Result<()> {
        if state.tracks.is_empty() {
            writeln!(self.out, "library is empty")?;
        }
        for (i, track) in state.tracks.iter().enumerate() {
            let marker = if state.selected == Some(i) { '*' } else { ' ' };
            writeln!(self.out, "{marker}{:02}. {}", i + 1, track.display_name())?;
        }
        Ok(())
    }

    pub fn print_lyrics(&mut self, session: &LyricsSession) -> io::Result<()> {
        if let Some(draft) = session.draft() {
            writeln!(self.out, "--- draft ---")?;
            writeln!(self.out, "{draft}")?;
            return Ok(());
        }
        if session.lines().is_empty() {
            writeln!(self.out, "No lyrics available")?;
            return Ok(());
        }
        for (i, line) in session.lines().iter().enumerate() {
            let marker = if session.active_line() == Some(i) { '>' } else { ' ' };
            if line.is_timed() {
                writeln!(self.out, "{marker} [{}] {}", format_time(line.time), line.text)?;
            } else {
                writeln!(self.out, "{marker} {}", line.text)?;
            }
        }
        Ok(())
    }

    pub fn print_status(&mut self, state: &AppState) -> io::Result<()> {
        match state.current_track() {
            Some(track) => writeln!(self.out, "track: {}", track.display_name())?,
            None => writeln!(self.out, "track: none")?,
        }
        writeln!(
            self.out,
            "clock: {} {}",
            format_time(state.position_secs),
            if state.playing { "playing" } else { "paused" }
        )?;
        writeln!(self.out, "lyrics: {}", describe(&state.lyrics))?;
        let session = &state.lyrics;
        if let Some(track) = session.track() {
            let saved = if session.stored().is_some() { "yes" } else { "no" };
            let busy = if session.is_busy(&track.path) { ", request running" } else { "" };
            writeln!(self.out, "saved: {saved}{busy}")?;
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn describe(session: &LyricsSession) -> String {
    let tag = session.tag();
    match tag {
        StateTag::View => {
            let source = if session.is_embedded() { "embedded" } else { "saved" };
            let kind = if session.is_synced() { "synced" } else { "plain" };
            format!("{} ({source}, {kind}, {} lines)", tag.label(), session.lines().len())
        }
        _ => tag.label().to_string(),
    }
}

/// mm:ss.cc
pub fn format_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    format!("{:02}:{:02}.{:02}", centis / 6000, (centis / 100) % 60, centis % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Track;
    use crate::lyrics::notice::Notice;

    fn output(view: View<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    fn state_showing(lyrics: &str) -> AppState {
        let mut track = Track::new("/a.flac");
        track.title = Some("Song".into());
        track.lyrics = Some(lyrics.into());
        let mut state = AppState::new(vec![track.clone()]);
        state.selected = Some(0);
        state.lyrics.show(track);
        state
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(62.5), "01:02.50");
        assert_eq!(format_time(12.34), "00:12.34");
    }

    #[test]
    fn test_draw_prints_changes_once() {
        let mut state = state_showing("[00:00]one\n[00:05]two");
        let mut view = View::new(Vec::new(), Duration::from_secs(60));
        state.lyrics.tick(1.0);
        view.draw(&mut state).unwrap();
        view.draw(&mut state).unwrap();
        state.lyrics.tick(6.0);
        view.draw(&mut state).unwrap();

        let out = output(view);
        assert_eq!(
            out,
            "> Song\nlyrics: viewing (embedded, synced, 2 lines)\n  ~ one\n  ~ two\n"
        );
    }

    #[test]
    fn test_draw_prints_notice() {
        let mut state = state_showing("plain");
        let mut view = View::new(Vec::new(), Duration::from_secs(60));
        state.lyrics.set_notice(Notice::error("boom"));
        view.draw(&mut state).unwrap();
        view.draw(&mut state).unwrap();
        let out = output(view);
        assert_eq!(out.matches("[error] boom").count(), 1);
    }

    #[test]
    fn test_print_lyrics_marks_active_line() {
        let mut state = state_showing("[00:00]one\n[00:05]two");
        state.lyrics.tick(5.0);
        let mut view = View::new(Vec::new(), Duration::from_secs(60));
        view.print_lyrics(&state.lyrics).unwrap();
        assert_eq!(output(view), "  [00:00.00] one\n> [00:05.00] two\n");
    }

    #[test]
    fn test_print_status_reports_saved_lyrics() {
        let mut state = state_showing("");
        state.lyrics.stored_loaded("/a.flac", Ok(Some("words".into())));
        let mut view = View::new(Vec::new(), Duration::from_secs(60));
        view.print_status(&state).unwrap();
        let out = output(view);
        assert!(out.contains("lyrics: viewing (saved, plain, 1 lines)"));
        assert!(out.ends_with("saved: yes\n"));
    }
}
