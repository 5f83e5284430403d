pub mod actions;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::library::Track;
use crate::lyrics::{self, Effect, FetchRequest, LrclibClient, LyricsError};
use crate::player::{ClockCommand, PlaybackClock};
use crate::storage::StorageHandle;
use crate::view::View;
use actions::Action;
use events::{Event, InputEvent, LyricsEvent, PlayerEvent};
use state::AppState;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct App {
    cfg: Config,
    state: AppState,
    lrclib: LrclibClient,
    storage: StorageHandle,
    clock: Option<PlaybackClock>,
}

impl App {
    pub fn new(cfg: Config, tracks: Vec<Track>) -> anyhow::Result<Self> {
        let lrclib = LrclibClient::new(&cfg.lyrics)?;
        let storage = StorageHandle::new(cfg.paths.database());
        // Fail early on an unusable database instead of on the first song.
        storage.count()?;

        Ok(Self {
            cfg,
            state: AppState::new(tracks),
            lrclib,
            storage,
            clock: None,
        })
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());
        let tick = Duration::from_millis(self.cfg.player.tick_ms);
        self.clock = Some(PlaybackClock::spawn(tx.clone(), tick));

        let mut view = View::new(
            std::io::stdout(),
            Duration::from_secs(self.cfg.ui.notice_secs),
        );
        view.print_tracks(&self.state)?;
        view.message("type 'help' for commands")?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(InputEvent::Line(line)) if line.trim().is_empty() => {}
                Event::Input(input_ev) => match input::map_input_to_action(input_ev) {
                    Some(action) => self.handle_action(action, &tx, &mut view)?,
                    None => view.message("unknown command (try 'help')")?,
                },
                Event::Player(pe) => self.handle_player(pe),
                Event::Lyrics(le) => self.handle_lyrics(le),
            }

            if self.state.should_quit {
                break;
            }

            view.draw(&mut self.state)?;
        }

        tracing::info!("session closed");
        Ok(())
    }

    fn handle_action<W: Write>(
        &mut self,
        action: Action,
        tx: &mpsc::Sender<Event>,
        view: &mut View<W>,
    ) -> anyhow::Result<()> {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Help => view.message(input::HELP)?,
            Action::Status => view.print_status(&self.state)?,
            Action::ListTracks => view.print_tracks(&self.state)?,
            Action::Select(idx) => {
                if idx < self.state.tracks.len() {
                    self.select(idx, tx);
                } else {
                    view.message("no such track")?;
                }
            }
            Action::NextTrack => {
                if let Some(idx) = self.state.next_index() {
                    self.select(idx, tx);
                }
            }
            Action::PrevTrack => {
                if let Some(idx) = self.state.prev_index() {
                    self.select(idx, tx);
                }
            }
            Action::Play => {
                if self.state.current_track().is_none() {
                    view.message("open a track first")?;
                } else {
                    self.state.playing = true;
                    self.send_clock(ClockCommand::Play);
                }
            }
            Action::Pause => {
                self.state.playing = false;
                self.send_clock(ClockCommand::Pause);
            }
            Action::Seek(seconds) => self.send_clock(ClockCommand::Seek { seconds }),
            Action::StartEdit => self.state.lyrics.start_edit(),
            Action::CancelEdit => self.state.lyrics.cancel_edit(),
            Action::SetDraft(text) => self.state.lyrics.update_draft(text),
            Action::AppendDraftLine(line) => {
                let text = self.state.lyrics.draft().map(|draft| {
                    if draft.is_empty() {
                        line
                    } else {
                        format!("{draft}\n{line}")
                    }
                });
                if let Some(text) = text {
                    self.state.lyrics.update_draft(text);
                }
            }
            Action::Save => {
                let effect = self.state.lyrics.save();
                self.execute(effect, tx);
            }
            Action::Fetch => {
                let effect = self.state.lyrics.fetch();
                self.execute(effect, tx);
            }
            Action::ShowLyrics => view.print_lyrics(&self.state.lyrics)?,
        }
        Ok(())
    }

    fn handle_player(&mut self, ev: PlayerEvent) {
        match ev {
            PlayerEvent::Position { seconds } => {
                self.state.position_secs = seconds;
                self.state.lyrics.tick(seconds);
            }
            PlayerEvent::Ended => {
                self.state.playing = false;
                tracing::debug!("playback ended");
            }
        }
    }

    fn handle_lyrics(&mut self, ev: LyricsEvent) {
        let lyrics = &mut self.state.lyrics;
        match ev {
            LyricsEvent::StoredLoaded { path, result } => lyrics.stored_loaded(&path, result),
            LyricsEvent::Fetched { ticket, result } => lyrics.fetch_finished(&ticket, result),
            LyricsEvent::Saved { ticket, result } => lyrics.save_finished(&ticket, result),
        }
    }

    fn select(&mut self, idx: usize, tx: &mpsc::Sender<Event>) {
        let Some(track) = self.state.tracks.get(idx).cloned() else {
            return;
        };
        self.state.selected = Some(idx);
        let duration_secs = track.duration_secs;
        let effect = self.state.lyrics.show(track);
        if effect.is_some() {
            self.state.position_secs = 0.0;
            self.state.playing = false;
            self.send_clock(ClockCommand::Load { duration_secs });
        }
        self.execute(effect, tx);
    }

    fn send_clock(&self, cmd: ClockCommand) {
        if let Some(clock) = &self.clock {
            clock.send(cmd);
        }
    }

    /// Run a session side effect in the background; the result comes back
    /// as a [`LyricsEvent`].
    fn execute(&self, effect: Option<Effect>, tx: &mpsc::Sender<Event>) {
        let Some(effect) = effect else {
            return;
        };
        let storage = self.storage.clone();
        let tx = tx.clone();

        match effect {
            Effect::LoadStored { path } => {
                tokio::spawn(async move {
                    let result = blocking({
                        let path = path.clone();
                        move || storage.get_lyrics(&path)
                    })
                    .await;
                    let _ = tx
                        .send(Event::Lyrics(LyricsEvent::StoredLoaded { path, result }))
                        .await;
                });
            }
            Effect::Fetch(request) => {
                let lrclib = self.lrclib.clone();
                tokio::spawn(async move {
                    let ticket = request.ticket.clone();
                    let result = fetch_and_store(&lrclib, storage, request).await;
                    let _ = tx
                        .send(Event::Lyrics(LyricsEvent::Fetched { ticket, result }))
                        .await;
                });
            }
            Effect::Save { ticket, text } => {
                tokio::spawn(async move {
                    let result = blocking({
                        let path = ticket.path.clone();
                        move || storage.save_lyrics(&path, &text)
                    })
                    .await;
                    let _ = tx
                        .send(Event::Lyrics(LyricsEvent::Saved { ticket, result }))
                        .await;
                });
            }
        }
    }
}

/// Look lyrics up online and persist them before reporting success.
async fn fetch_and_store(
    lrclib: &LrclibClient,
    storage: StorageHandle,
    request: FetchRequest,
) -> Result<Option<String>, LyricsError> {
    let duration = (request.duration_secs > 0).then_some(request.duration_secs);
    let found = lyrics::fetch_lyrics(
        lrclib,
        &request.title,
        &request.artist,
        request.album.as_deref(),
        duration,
    )
    .await
    .map_err(|e| LyricsError::network(&e))?;

    let Some(text) = found else {
        return Ok(None);
    };
    let path = request.ticket.path;
    blocking({
        let text = text.clone();
        move || storage.save_lyrics(&path, &text)
    })
    .await?;
    Ok(Some(text))
}

async fn blocking<T, F>(f: F) -> Result<T, LyricsError>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(LyricsError::storage(&e)),
        Err(e) => Err(LyricsError::Storage(format!("storage task failed: {e}"))),
    }
}
