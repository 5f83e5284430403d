#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Help,
    Status,

    // Library
    ListTracks,
    Select(usize),
    NextTrack,
    PrevTrack,

    // Playback clock
    Play,
    Pause,
    Seek(f64),

    // Lyrics intents
    StartEdit,
    CancelEdit,
    SetDraft(String),
    AppendDraftLine(String),
    Save,
    Fetch,
    ShowLyrics,
}
