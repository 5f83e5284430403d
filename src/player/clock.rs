use crate::app::events::{Event, PlayerEvent};
use std::time::Duration;
use tokio::{sync::mpsc, time::Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockCommand {
    Load { duration_secs: f64 },
    Play,
    Pause,
    Seek { seconds: f64 },
}

/// Position bookkeeping for the clock task.
#[derive(Debug, Clone, Default, PartialEq)]
struct ClockState {
    position: f64,
    duration: f64,
    playing: bool,
}

impl ClockState {
    fn apply(&mut self, cmd: ClockCommand) {
        match cmd {
            ClockCommand::Load { duration_secs } => {
                self.duration = duration_secs.max(0.0);
                self.position = 0.0;
                self.playing = false;
            }
            ClockCommand::Play => self.playing = true,
            ClockCommand::Pause => self.playing = false,
            ClockCommand::Seek { seconds } => {
                self.position = self.clamp(seconds);
            }
        }
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }

    /// Move forward while playing; unknown duration never ends.
    fn advance(&mut self, elapsed: Duration) -> Option<PlayerEvent> {
        if !self.playing {
            return None;
        }
        self.position += elapsed.as_secs_f64();
        if self.duration > 0.0 && self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            return Some(PlayerEvent::Ended);
        }
        Some(PlayerEvent::Position {
            seconds: self.position,
        })
    }

    /// Like [`advance`](Self::advance) but reports only the end of the track.
    fn bank(&mut self, elapsed: Duration) -> Option<PlayerEvent> {
        self.advance(elapsed).filter(|ev| matches!(ev, PlayerEvent::Ended))
    }
}

/// Simulated playback position, reported as player events.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    cmd_tx: mpsc::UnboundedSender<ClockCommand>,
}

impl PlaybackClock {
    pub fn spawn(event_tx: mpsc::Sender<Event>, tick: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_clock(cmd_rx, event_tx, tick));
        Self { cmd_tx }
    }

    pub fn send(&self, cmd: ClockCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!(?cmd, "playback clock stopped");
        }
    }
}

async fn run_clock(
    mut cmd_rx: mpsc::UnboundedReceiver<ClockCommand>,
    event_tx: mpsc::Sender<Event>,
    tick: Duration,
) {
    let mut state = ClockState::default();
    let mut interval = tokio::time::interval(tick.max(Duration::from_millis(10)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                // Bank time played so far before the command takes effect.
                if let Some(ended) = state.bank(last.elapsed())
                    && event_tx.send(Event::Player(ended)).await.is_err()
                {
                    break;
                }
                state.apply(cmd);
                last = Instant::now();
                let ev = PlayerEvent::Position { seconds: state.position };
                if event_tx.send(Event::Player(ev)).await.is_err() {
                    break;
                }
            }
            _ = interval.tick(), if state.playing => {
                let now = Instant::now();
                let ev = state.advance(now - last);
                last = now;
                if let Some(ev) = ev
                    && event_tx.send(Event::Player(ev)).await.is_err()
                {
                    break;
                }
            }
        }
    }
}
