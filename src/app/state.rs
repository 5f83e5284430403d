use crate::library::Track;
use crate::lyrics::LyricsSession;

pub struct AppState {
    pub should_quit: bool,

    // Library
    pub tracks: Vec<Track>,
    pub selected: Option<usize>,

    // Playback
    pub position_secs: f64,
    pub playing: bool,

    // Lyrics
    pub lyrics: LyricsSession,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AppState {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            should_quit: false,
            tracks,
            selected: None,
            position_secs: 0.0,
            playing: false,
            lyrics: LyricsSession::new(),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn next_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some(match self.selected {
            Some(i) => (i + 1).min(self.tracks.len() - 1),
            None => 0,
        })
    }

    pub fn prev_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some(self.selected.map_or(0, |i| i.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(n: usize) -> AppState {
        AppState::new((0..n).map(|i| Track::new(format!("/t{i}.flac"))).collect())
    }

    #[test]
    fn test_navigation_bounds() {
        let mut state = state_with(3);
        assert_eq!(state.next_index(), Some(0));
        state.selected = Some(2);
        assert_eq!(state.next_index(), Some(2));
        assert_eq!(state.prev_index(), Some(1));
        state.selected = Some(0);
        assert_eq!(state.prev_index(), Some(0));
    }

    #[test]
    fn test_empty_library_has_no_selection() {
        let state = state_with(0);
        assert_eq!(state.next_index(), None);
        assert_eq!(state.prev_index(), None);
        assert!(state.current_track().is_none());
    }
}
