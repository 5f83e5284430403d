use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use std::io::BufRead;
use tokio::sync::mpsc;

pub const HELP: &str = "\
commands:
  ls                 list tracks
  open N | n | p     show track N / next / previous
  play | pause       control the playback clock
  seek SECS|M:SS     jump to a position
  lyrics             print the current lyrics
  edit | cancel      start or abandon editing
  draft TEXT         replace the draft (\\n for new lines)
  add LINE           append a line to the draft
  save               save the draft
  fetch              download lyrics for the current track
  status | help | quit";

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    spawn_reader(std::io::BufReader::new(std::io::stdin()), tx);
}

/// Forward lines from `reader` until EOF.
///
/// Runs on a detached OS thread: a read blocked on the terminal must not keep
/// the runtime from shutting down after `quit`.
fn spawn_reader<R>(reader: R, tx: mpsc::Sender<Event>) -> std::thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(Event::Input(InputEvent::Line(line))).is_err() {
                return;
            }
        }
        let _ = tx.blocking_send(Event::Input(InputEvent::Closed));
    })
}

pub fn map_input_to_action(ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Closed => Some(Action::Quit),
        InputEvent::Line(line) => parse_command(&line),
    }
}

pub fn parse_command(line: &str) -> Option<Action> {
    let line = line.trim_start();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest),
        None => (line.trim_end(), ""),
    };

    match cmd {
        "q" | "quit" | "exit" => Some(Action::Quit),
        "h" | "help" | "?" => Some(Action::Help),
        "s" | "status" => Some(Action::Status),
        "ls" | "list" => Some(Action::ListTracks),
        "open" | "select" => {
            let n: usize = rest.trim().parse().ok()?;
            n.checked_sub(1).map(Action::Select)
        }
        "n" | "next" => Some(Action::NextTrack),
        "p" | "prev" => Some(Action::PrevTrack),
        "play" => Some(Action::Play),
        "pause" => Some(Action::Pause),
        "seek" => parse_position(rest.trim()).map(Action::Seek),
        "lyrics" | "show" => Some(Action::ShowLyrics),
        "edit" => Some(Action::StartEdit),
        "cancel" => Some(Action::CancelEdit),
        "draft" => Some(Action::SetDraft(rest.replace("\\n", "\n"))),
        "add" => Some(Action::AppendDraftLine(rest.to_string())),
        "save" => Some(Action::Save),
        "fetch" => Some(Action::Fetch),
        _ => None,
    }
}

/// "75", "75.5" or "1:15"
fn parse_position(s: &str) -> Option<f64> {
    let secs = match s.split_once(':') {
        Some((m, sec)) => f64::from(m.parse::<u32>().ok()?) * 60.0 + sec.parse::<f64>().ok()?,
        None => s.parse::<f64>().ok()?,
    };
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}
