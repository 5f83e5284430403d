//! Per-song lyrics state machine.
//!
//! Transitions never perform IO. Operations that need storage or the network
//! return an [`Effect`] for the host to execute; the host reports back through
//! [`LyricsSession::stored_loaded`], [`LyricsSession::fetch_finished`] and
//! [`LyricsSession::save_finished`].

use std::collections::HashSet;
use std::time::Duration;

use super::error::LyricsError;
use super::notice::Notice;
use super::parser::{LyricLine, ParsedLyrics, parse_lyrics};
use crate::library::{Track, non_empty};

/// Identifies one in-flight mutating request.
///
/// Results are applied only while the ticket is still the one the session
/// is waiting for; anything else is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub path: String,
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Track length rounded down to whole seconds
    pub duration_secs: u32,
}

/// Work the host must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadStored { path: String },
    Fetch(FetchRequest),
    Save { ticket: Ticket, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LyricsState {
    /// No embedded or stored lyrics
    None,
    /// Lyrics exist and are shown
    View,
    Edit { draft: String },
    Fetching { ticket: Ticket },
    Saving { ticket: Ticket, draft: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTag {
    None,
    View,
    Edit,
    Fetching,
    Saving,
}

impl StateTag {
    pub fn label(self) -> &'static str {
        match self {
            StateTag::None => "no lyrics",
            StateTag::View => "viewing",
            StateTag::Edit => "editing",
            StateTag::Fetching => "fetching",
            StateTag::Saving => "saving",
        }
    }
}

impl LyricsState {
    pub fn tag(&self) -> StateTag {
        match self {
            LyricsState::None => StateTag::None,
            LyricsState::View => StateTag::View,
            LyricsState::Edit { .. } => StateTag::Edit,
            LyricsState::Fetching { .. } => StateTag::Fetching,
            LyricsState::Saving { .. } => StateTag::Saving,
        }
    }

    fn is_idle(&self) -> bool {
        matches!(self, LyricsState::None | LyricsState::View)
    }
}

#[derive(Debug)]
pub struct LyricsSession {
    track: Option<Track>,
    stored: Option<String>,
    // Set from `show` until `stored_loaded` reports for the shown track.
    stored_pending: bool,
    parsed: Option<ParsedLyrics>,
    state: LyricsState,
    position: f64,
    active_line: Option<usize>,
    notice: Option<Notice>,
    // Track paths with a fetch or save in flight; survives song switches.
    in_flight: HashSet<String>,
    next_ticket: u64,
}

impl Default for LyricsSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsSession {
    pub fn new() -> Self {
        Self {
            track: None,
            stored: None,
            stored_pending: false,
            parsed: None,
            state: LyricsState::None,
            position: 0.0,
            active_line: None,
            notice: None,
            in_flight: HashSet::new(),
            next_ticket: 1,
        }
    }

    // ---- observable state ----

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn tag(&self) -> StateTag {
        self.state.tag()
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            LyricsState::Edit { draft } | LyricsState::Saving { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn stored(&self) -> Option<&str> {
        self.stored.as_deref()
    }

    /// Embedded lyrics win over stored ones.
    pub fn display_text(&self) -> Option<&str> {
        self.embedded()
            .or_else(|| self.stored.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded().is_some()
    }

    pub fn lines(&self) -> &[LyricLine] {
        self.parsed.as_ref().map_or(&[], |p| p.lines.as_slice())
    }

    pub fn is_synced(&self) -> bool {
        self.parsed.as_ref().is_some_and(|p| p.synced)
    }

    pub fn active_line(&self) -> Option<usize> {
        self.active_line
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_busy(&self, path: &str) -> bool {
        self.in_flight.contains(path)
    }

    // ---- intents ----

    /// Switch the displayed song.
    ///
    /// Any edit is dropped and a pending fetch or save for the previous song
    /// is forgotten, so its result will be ignored when it arrives.
    pub fn show(&mut self, track: Track) -> Option<Effect> {
        if self.track.as_ref().is_some_and(|t| t.path == track.path) {
            return None;
        }

        tracing::debug!(path = %track.path, "showing track");
        let path = track.path.clone();
        self.track = Some(track);
        self.stored = None;
        self.stored_pending = true;
        self.position = 0.0;
        self.state = LyricsState::None;
        self.refresh();
        Some(Effect::LoadStored { path })
    }

    /// Result of reading the stored lyrics for `path`.
    pub fn stored_loaded(&mut self, path: &str, result: Result<Option<String>, LyricsError>) {
        if !self.is_current(path) {
            tracing::debug!(path, "ignoring stored lyrics for inactive track");
            return;
        }
        self.stored_pending = false;
        match result {
            Ok(text) => {
                self.stored = text.filter(|s| !s.is_empty());
                self.refresh();
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to load stored lyrics");
                self.notice = Some(e.to_notice());
            }
        }
    }

    pub fn start_edit(&mut self) {
        if self.track.is_none() {
            return;
        }
        match self.state {
            LyricsState::View if self.is_embedded() => {
                self.notice = Some(Notice::info("Embedded lyrics are read-only"));
                return;
            }
            LyricsState::None | LyricsState::View => {}
            _ => return,
        }
        if self.refuse_while_loading() {
            return;
        }
        let draft = self.stored.clone().unwrap_or_default();
        self.state = LyricsState::Edit { draft };
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        if let LyricsState::Edit { draft } = &mut self.state {
            *draft = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self.state, LyricsState::Edit { .. }) {
            self.state = self.resolve_idle();
        }
    }

    /// Persist the draft exactly as typed.
    pub fn save(&mut self) -> Option<Effect> {
        let LyricsState::Edit { draft } = &self.state else {
            return None;
        };
        let draft = draft.clone();
        let ticket = self.acquire_ticket()?;
        self.state = LyricsState::Saving {
            ticket: ticket.clone(),
            draft: draft.clone(),
        };
        Some(Effect::Save {
            ticket,
            text: draft,
        })
    }

    pub fn save_finished(&mut self, ticket: &Ticket, result: Result<(), LyricsError>) {
        self.in_flight.remove(&ticket.path);
        let draft = match &self.state {
            LyricsState::Saving { ticket: t, draft } if t == ticket => draft.clone(),
            _ => {
                tracing::debug!(path = %ticket.path, id = ticket.id, "ignoring stale save result");
                return;
            }
        };

        match result {
            Ok(()) => {
                let trimmed = draft.trim();
                self.stored = (!trimmed.is_empty()).then(|| trimmed.to_string());
                self.refresh();
                self.notice = Some(Notice::success("Lyrics saved"));
            }
            Err(e) => {
                tracing::warn!(path = %ticket.path, error = %e, "saving lyrics failed");
                self.state = LyricsState::Edit { draft };
                self.notice = Some(Notice::error("Failed to save lyrics"));
            }
        }
    }

    /// Look the current song up online. Only valid when it has no lyrics.
    pub fn fetch(&mut self) -> Option<Effect> {
        if !matches!(self.state, LyricsState::None) || self.refuse_while_loading() {
            return None;
        }
        let track = self.track.as_ref()?;
        let (Some(title), Some(artist)) = (non_empty(&track.title), non_empty(&track.artist))
        else {
            let err = LyricsError::Validation(
                "Song must have title and artist to search for lyrics".to_string(),
            );
            self.notice = Some(err.to_notice());
            return None;
        };
        let title = title.to_string();
        let artist = artist.to_string();
        let album = non_empty(&track.album).map(str::to_string);
        let duration_secs = track.duration_secs.max(0.0).floor() as u32;

        let ticket = self.acquire_ticket()?;
        self.state = LyricsState::Fetching {
            ticket: ticket.clone(),
        };
        Some(Effect::Fetch(FetchRequest {
            ticket,
            title,
            artist,
            album,
            duration_secs,
        }))
    }

    /// Result of an online lookup. Found text has already been persisted.
    pub fn fetch_finished(&mut self, ticket: &Ticket, result: Result<Option<String>, LyricsError>) {
        self.in_flight.remove(&ticket.path);
        if !matches!(&self.state, LyricsState::Fetching { ticket: t } if t == ticket) {
            tracing::debug!(path = %ticket.path, id = ticket.id, "ignoring stale fetch result");
            return;
        }
        self.state = LyricsState::None;

        match result {
            Ok(Some(text)) if !text.trim().is_empty() => {
                self.stored = Some(text);
                self.refresh();
                self.notice = Some(Notice::success("Lyrics downloaded"));
            }
            Ok(_) => self.notice = Some(LyricsError::NotFound.to_notice()),
            Err(e) => {
                tracing::warn!(path = %ticket.path, error = %e, "fetching lyrics failed");
                self.notice = Some(e.to_notice());
            }
        }
    }

    /// Playback clock moved. Returns true when the active line changed.
    pub fn tick(&mut self, position: f64) -> bool {
        self.position = position;
        let active = self.parsed.as_ref().and_then(|p| p.active_line(position));
        let changed = active != self.active_line;
        self.active_line = active;
        changed
    }

    #[cfg(test)]
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_expired_notice(&mut self, ttl: Duration) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(ttl)) {
            self.notice = None;
        }
    }

    // ---- internals ----

    fn embedded(&self) -> Option<&str> {
        self.track
            .as_ref()
            .and_then(|t| t.lyrics.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Editing or fetching before the stored text is known could overwrite it.
    fn refuse_while_loading(&mut self) -> bool {
        if self.stored_pending {
            self.notice = Some(Notice::info("Saved lyrics are still loading"));
        }
        self.stored_pending
    }

    fn is_current(&self, path: &str) -> bool {
        self.track.as_ref().is_some_and(|t| t.path == path)
    }

    fn resolve_idle(&self) -> LyricsState {
        if self.display_text().is_some() {
            LyricsState::View
        } else {
            LyricsState::None
        }
    }

    /// Re-derive the parsed lines and, when idle, the None/View state.
    fn refresh(&mut self) {
        self.parsed = self.display_text().map(parse_lyrics);
        self.active_line = self
            .parsed
            .as_ref()
            .and_then(|p| p.active_line(self.position));
        if self.state.is_idle() {
            self.state = self.resolve_idle();
        }
    }

    /// One mutating operation per track at a time.
    fn acquire_ticket(&mut self) -> Option<Ticket> {
        let path = self.track.as_ref()?.path.clone();
        if self.in_flight.contains(&path) {
            self.notice = Some(Notice::info(
                "Another lyrics operation is still running for this song",
            ));
            return None;
        }
        let ticket = Ticket {
            path: path.clone(),
            id: self.next_ticket,
        };
        self.next_ticket += 1;
        self.in_flight.insert(path);
        Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::notice::NoticeKind;

    fn track(path: &str) -> Track {
        Track {
            path: path.to_string(),
            title: Some("Song".into()),
            artist: Some("Artist".into()),
            album: Some("Album".into()),
            duration_secs: 187.9,
            lyrics: None,
        }
    }

    /// Shown track whose stored-lyrics lookup came back empty.
    fn shown(t: Track) -> LyricsSession {
        let mut session = showing(t.clone());
        session.stored_loaded(&t.path, Ok(None));
        session
    }

    /// Shown track still waiting for its stored-lyrics lookup.
    fn showing(t: Track) -> LyricsSession {
        let mut session = LyricsSession::new();
        let effect = session.show(t.clone());
        assert_eq!(effect, Some(Effect::LoadStored { path: t.path }));
        session
    }

    fn notice_kind(session: &LyricsSession) -> Option<NoticeKind> {
        session.last_notice().map(|n| n.kind)
    }

    fn fetch_ticket(effect: Option<Effect>) -> Ticket {
        match effect {
            Some(Effect::Fetch(req)) => req.ticket,
            other => panic!("expected fetch effect, got {other:?}"),
        }
    }

    fn save_ticket(effect: Option<Effect>) -> Ticket {
        match effect {
            Some(Effect::Save { ticket, .. }) => ticket,
            other => panic!("expected save effect, got {other:?}"),
        }
    }

    #[test]
    fn test_show_without_lyrics_is_none() {
        let mut session = showing(track("/a.flac"));
        assert_eq!(session.tag(), StateTag::None);
        session.stored_loaded("/a.flac", Ok(None));
        assert_eq!(session.tag(), StateTag::None);
        assert!(session.lines().is_empty());
    }

    #[test]
    fn test_embedded_lyrics_take_precedence() {
        let mut t = track("/a.flac");
        t.lyrics = Some("[00:01]embedded".into());
        let mut session = shown(t);
        assert_eq!(session.tag(), StateTag::View);
        session.stored_loaded("/a.flac", Ok(Some("stored".into())));
        assert_eq!(session.display_text(), Some("[00:01]embedded"));
        assert!(session.is_synced());
    }

    #[test]
    fn test_stored_lyrics_switch_to_view() {
        let mut session = shown(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(Some("plain words".into())));
        assert_eq!(session.tag(), StateTag::View);
        assert!(!session.is_synced());
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn test_stored_for_other_track_is_ignored() {
        let mut session = showing(track("/a.flac"));
        session.stored_loaded("/b.flac", Ok(Some("wrong song".into())));
        assert_eq!(session.tag(), StateTag::None);
        session.start_edit();
        assert_eq!(session.tag(), StateTag::None);
    }

    #[test]
    fn test_edit_waits_for_stored_text() {
        let mut session = showing(track("/a.flac"));
        session.start_edit();
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(session.draft(), None);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Info));
        assert_eq!(session.save(), None);

        session.stored_loaded("/a.flac", Ok(Some("existing".into())));
        session.start_edit();
        assert_eq!(session.draft(), Some("existing"));
        let Some(Effect::Save { text, .. }) = session.save() else {
            panic!("expected save effect");
        };
        assert_eq!(text, "existing");
    }

    #[test]
    fn test_fetch_waits_for_stored_text() {
        let mut session = showing(track("/a.flac"));
        assert_eq!(session.fetch(), None);
        assert_eq!(session.tag(), StateTag::None);
        assert!(!session.is_busy("/a.flac"));
        assert_eq!(notice_kind(&session), Some(NoticeKind::Info));

        session.stored_loaded("/a.flac", Ok(Some("my own lyrics".into())));
        assert_eq!(session.fetch(), None);
        assert_eq!(session.stored(), Some("my own lyrics"));
    }

    #[test]
    fn test_stored_load_failure_surfaces_error() {
        let mut session = showing(track("/a.flac"));
        session.stored_loaded("/a.flac", Err(LyricsError::Storage("locked".into())));
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Error));
    }

    #[test]
    fn test_showing_same_track_keeps_state() {
        let mut session = shown(track("/a.flac"));
        session.start_edit();
        assert_eq!(session.show(track("/a.flac")), None);
        assert_eq!(session.tag(), StateTag::Edit);
    }

    #[test]
    fn test_edit_embedded_is_refused() {
        let mut t = track("/a.flac");
        t.lyrics = Some("from tags".into());
        let mut session = shown(t);
        session.start_edit();
        assert_eq!(session.tag(), StateTag::View);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Info));
    }

    #[test]
    fn test_edit_starts_from_stored_text() {
        let mut session = shown(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(Some("old words".into())));
        session.start_edit();
        assert_eq!(session.draft(), Some("old words"));

        let mut empty = shown(track("/b.flac"));
        empty.start_edit();
        assert_eq!(empty.draft(), Some(""));
    }

    #[test]
    fn test_cancel_edit_restores_previous_state() {
        let mut session = shown(track("/a.flac"));
        session.start_edit();
        session.update_draft("draft");
        session.cancel_edit();
        assert_eq!(session.tag(), StateTag::None);

        session.stored_loaded("/a.flac", Ok(Some("kept".into())));
        session.start_edit();
        session.update_draft("changed");
        session.cancel_edit();
        assert_eq!(session.tag(), StateTag::View);
        assert_eq!(session.display_text(), Some("kept"));
    }

    #[test]
    fn test_save_success_stores_trimmed_draft() {
        let mut session = shown(track("/a.flac"));
        session.start_edit();
        session.update_draft("  [00:02]hi\n");
        let effect = session.save();
        let Some(Effect::Save { ticket, text }) = effect else {
            panic!("expected save effect");
        };
        assert_eq!(text, "  [00:02]hi\n");
        assert_eq!(session.tag(), StateTag::Saving);
        assert!(session.is_busy("/a.flac"));

        session.save_finished(&ticket, Ok(()));
        assert_eq!(session.tag(), StateTag::View);
        assert_eq!(session.stored(), Some("[00:02]hi"));
        assert_eq!(notice_kind(&session), Some(NoticeKind::Success));
        assert!(!session.is_busy("/a.flac"));
    }

    #[test]
    fn test_save_empty_draft_goes_back_to_none() {
        let mut session = shown(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(Some("words".into())));
        session.start_edit();
        session.update_draft("   ");
        let ticket = save_ticket(session.save());
        session.save_finished(&ticket, Ok(()));
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(session.stored(), None);
    }

    #[test]
    fn test_save_failure_keeps_draft_in_edit() {
        let mut session = shown(track("/a.flac"));
        session.start_edit();
        session.update_draft("my lyrics");
        let ticket = save_ticket(session.save());
        session.save_finished(&ticket, Err(LyricsError::Storage("read-only".into())));
        assert_eq!(session.tag(), StateTag::Edit);
        assert_eq!(session.draft(), Some("my lyrics"));
        assert_eq!(notice_kind(&session), Some(NoticeKind::Error));
    }

    #[test]
    fn test_fetch_requires_title_and_artist() {
        let mut t = track("/a.flac");
        t.artist = None;
        let mut session = shown(t);
        assert_eq!(session.fetch(), None);
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Error));
        assert!(!session.is_busy("/a.flac"));

        let mut blank = track("/b.flac");
        blank.title = Some("  ".into());
        let mut session = shown(blank);
        assert_eq!(session.fetch(), None);
    }

    #[test]
    fn test_fetch_request_contents() {
        let mut session = shown(track("/a.flac"));
        let Some(Effect::Fetch(req)) = session.fetch() else {
            panic!("expected fetch effect");
        };
        assert_eq!(req.title, "Song");
        assert_eq!(req.artist, "Artist");
        assert_eq!(req.album.as_deref(), Some("Album"));
        assert_eq!(req.duration_secs, 187);
        assert_eq!(session.tag(), StateTag::Fetching);
    }

    #[test]
    fn test_fetch_only_from_none() {
        let mut session = shown(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(Some("exists".into())));
        assert_eq!(session.fetch(), None);
        assert_eq!(session.tag(), StateTag::View);
    }

    #[test]
    fn test_fetch_found_goes_to_view() {
        let mut session = shown(track("/a.flac"));
        let ticket = fetch_ticket(session.fetch());
        session.fetch_finished(&ticket, Ok(Some("[00:00]la\n[00:10]da".into())));
        assert_eq!(session.tag(), StateTag::View);
        assert!(session.is_synced());
        assert_eq!(session.stored(), Some("[00:00]la\n[00:10]da"));
        assert_eq!(notice_kind(&session), Some(NoticeKind::Success));
    }

    #[test]
    fn test_fetch_not_found_and_error_return_to_none() {
        let mut session = shown(track("/a.flac"));
        let ticket = fetch_ticket(session.fetch());
        session.fetch_finished(&ticket, Ok(None));
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Info));

        let ticket = fetch_ticket(session.fetch());
        session.fetch_finished(&ticket, Err(LyricsError::Network("offline".into())));
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Error));
    }

    #[test]
    fn test_stale_fetch_after_song_switch_is_ignored() {
        let mut session = shown(track("/a.flac"));
        let ticket = fetch_ticket(session.fetch());

        session.show(track("/b.flac"));
        session.stored_loaded("/b.flac", Ok(None));
        session.fetch_finished(&ticket, Ok(Some("late lyrics".into())));

        assert_eq!(session.track().map(|t| t.path.as_str()), Some("/b.flac"));
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(session.stored(), None);
        assert!(session.last_notice().is_none());
        assert!(!session.is_busy("/a.flac"));
    }

    #[test]
    fn test_mutations_serialized_per_track() {
        let mut session = shown(track("/a.flac"));
        let first = fetch_ticket(session.fetch());

        // Leave and come back while the first fetch is still running.
        session.show(track("/b.flac"));
        session.show(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(None));
        assert_eq!(session.fetch(), None);
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(notice_kind(&session), Some(NoticeKind::Info));

        session.start_edit();
        session.update_draft("typed");
        assert_eq!(session.save(), None);
        assert_eq!(session.tag(), StateTag::Edit);

        // The old fetch finishing must not touch the new session state.
        session.fetch_finished(&first, Ok(Some("fetched".into())));
        assert_eq!(session.tag(), StateTag::Edit);
        assert_eq!(session.draft(), Some("typed"));

        let ticket = save_ticket(session.save());
        session.save_finished(&ticket, Ok(()));
        assert_eq!(session.stored(), Some("typed"));
    }

    #[test]
    fn test_song_switch_cancels_edit() {
        let mut session = shown(track("/a.flac"));
        session.start_edit();
        session.update_draft("unsaved");
        session.show(track("/b.flac"));
        assert_eq!(session.tag(), StateTag::None);
        assert_eq!(session.draft(), None);
        assert_eq!(session.state, LyricsState::None);
    }

    #[test]
    fn test_tick_tracks_active_line() {
        let mut session = shown(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(Some("[00:00]a\n[00:30]b\n[01:00]c".into())));
        assert!(!session.tick(10.0));
        assert_eq!(session.active_line(), Some(0));
        assert!(session.tick(45.0));
        assert_eq!(session.active_line(), Some(1));
        assert!(!session.tick(46.0));
    }

    #[test]
    fn test_tick_on_unsynced_has_no_active_line() {
        let mut session = shown(track("/a.flac"));
        session.stored_loaded("/a.flac", Ok(Some("plain".into())));
        session.tick(100.0);
        assert_eq!(session.active_line(), None);
    }

    #[test]
    fn test_notice_expires() {
        let mut session = shown(track("/a.flac"));
        session.set_notice(Notice::info("hello"));
        session.clear_expired_notice(Duration::from_secs(60));
        assert!(session.last_notice().is_some());
        session.clear_expired_notice(Duration::ZERO);
        // elapsed() may be zero on coarse clocks; wait until it is not.
        std::thread::sleep(Duration::from_millis(2));
        session.clear_expired_notice(Duration::ZERO);
        assert!(session.last_notice().is_none());
    }
}
