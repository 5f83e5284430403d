mod app;
mod config;
mod input;
mod library;
mod lyrics;
mod player;
mod storage;
mod view;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "luma-lyrics", version, about = "Synced lyrics engine for the Luma player")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the library track list (JSON).
    #[arg(long)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive lyrics session (default).
    Session,
    /// Parse a lyrics file and print its lines (headless).
    Parse { file: PathBuf },
    /// Print the line active at a playback position (headless).
    Line { file: PathBuf, seconds: f64 },
    /// Look lyrics up online and print them (headless, nothing is saved).
    Fetch {
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: Option<String>,
        /// Track length in seconds.
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Print the saved lyrics of a track.
    Show { track_path: String },
    /// Delete the saved lyrics of a track.
    Clear { track_path: String },
    /// Print the effective config.
    Config {
        /// Overwrite the config file with defaults first.
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    let config_path = cli.config.clone();
    if let Some(library) = cli.library {
        cfg.paths.library = Some(library);
    }

    match cli.command.unwrap_or(Command::Session) {
        Command::Session => {
            let tracks = library::load(&cfg.paths.library_file()).context("load library")?;
            let mut app = app::App::new(cfg, tracks)?;
            app.run().await?;
        }
        Command::Parse { file } => {
            let parsed = read_lyrics_file(&file)?;
            if parsed.is_empty() {
                println!("No lyrics available");
                return Ok(());
            }
            println!("synced: {}", parsed.synced);
            for line in &parsed.lines {
                if line.is_timed() {
                    println!("[{}] {}", view::format_time(line.time), line.text);
                } else {
                    println!("{}", line.text);
                }
            }
        }
        Command::Line { file, seconds } => {
            let parsed = read_lyrics_file(&file)?;
            if !parsed.synced {
                println!("(lyrics are not synced)");
                return Ok(());
            }
            match lyrics::parser::current_line_index(&parsed.lines, seconds) {
                Some(idx) => println!("{}: {}", idx + 1, parsed.lines[idx].text),
                None => println!("(before first line)"),
            }
        }
        Command::Fetch {
            title,
            artist,
            album,
            duration,
        } => {
            let client = lyrics::LrclibClient::new(&cfg.lyrics)?;
            match lyrics::fetch_lyrics(&client, &title, &artist, album.as_deref(), duration).await? {
                Some(text) => println!("{text}"),
                None => println!("No lyrics found for this song"),
            }
        }
        Command::Show { track_path } => {
            let storage = storage::StorageHandle::new(cfg.paths.database());
            match storage.get_lyrics(&track_path)? {
                Some(text) => println!("{text}"),
                None => println!("No saved lyrics for {track_path}"),
            }
        }
        Command::Clear { track_path } => {
            let storage = storage::StorageHandle::new(cfg.paths.database());
            storage.delete_lyrics(&track_path)?;
            println!("Deleted saved lyrics for {track_path}.");
        }
        Command::Config { reset } => {
            if reset {
                cfg = config::defaults::defaults();
                config::save(&cfg, config_path.as_deref())?;
                tracing::info!("config reset to defaults");
            }
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}

fn read_lyrics_file(path: &std::path::Path) -> anyhow::Result<lyrics::ParsedLyrics> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(lyrics::ParsedLyrics::parse(&raw))
}
