use crate::lyrics::{LyricsError, Ticket};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Lyrics(LyricsEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Line(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Position { seconds: f64 },
    Ended,
}

/// Completions of storage and network work started by the session.
#[derive(Debug, Clone)]
pub enum LyricsEvent {
    StoredLoaded {
        path: String,
        result: Result<Option<String>, LyricsError>,
    },
    Fetched {
        ticket: Ticket,
        result: Result<Option<String>, LyricsError>,
    },
    Saved {
        ticket: Ticket,
        result: Result<(), LyricsError>,
    },
}
