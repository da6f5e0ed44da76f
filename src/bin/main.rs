//! Terminal RSVP player built on the saccade engine.
//!
//! The binary is glue only: CLI parsing, keyboard input, and ANSI word
//! rendering. All tokenization and timing math lives in `saccade-core`.

use std::{
    fs,
    io::{self, Read},
    process::ExitCode,
};

use clap::Parser;
use log::error;
use saccade_core::{
    hyphenator::MAX_CHUNK_LENGTH_DEFAULT,
    orp::ORP_OFFSET_DEFAULT,
    sample_texts::{SAMPLE_TEXTS, sample_by_name},
    session::ReaderSession,
    settings::{ReaderSettings, WPM_DEFAULT},
};

#[path = "main/player.rs"]
mod player;

#[derive(Debug, Parser)]
#[command(name = "saccade", version, about = "RSVP speed reader for the terminal")]
struct Cli {
    /// File to read, or `-` for stdin. Defaults to the built-in
    /// `paragraph` sample.
    path: Option<String>,

    /// Play one of the built-in sample texts (see --list-samples).
    #[arg(long, conflicts_with = "path")]
    sample: Option<String>,

    /// Reading speed in words per minute.
    #[arg(long, default_value_t = WPM_DEFAULT)]
    wpm: u16,

    /// Focal-point offset as a fraction of word length.
    #[arg(long, default_value_t = ORP_OFFSET_DEFAULT)]
    orp_offset: f64,

    /// Maximum word length before hyphenation kicks in.
    #[arg(long, default_value_t = MAX_CHUNK_LENGTH_DEFAULT)]
    chunk_length: usize,

    /// Disable length- and punctuation-aware pacing.
    #[arg(long)]
    no_dynamic_pacing: bool,

    /// List the built-in sample texts and exit.
    #[arg(long)]
    list_samples: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_samples {
        for (name, _) in SAMPLE_TEXTS {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let text = match load_text(&cli) {
        Ok(text) => text,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let settings = ReaderSettings {
        base_wpm: cli.wpm,
        orp_offset: cli.orp_offset,
        dynamic_pacing: !cli.no_dynamic_pacing,
        max_chunk_length: cli.chunk_length,
    };

    let notifications = player::UiNotifications::default();
    let mut session = ReaderSession::new(settings, notifications.clone());
    if let Err(err) = session.load_text(&text) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match player::run(&mut session, &notifications) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("terminal player failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_text(cli: &Cli) -> Result<String, String> {
    if let Some(name) = &cli.sample {
        return sample_by_name(name)
            .map(str::to_string)
            .ok_or_else(|| format!("unknown sample '{name}', try --list-samples"));
    }

    match cli.path.as_deref() {
        None => Ok(sample_by_name("paragraph")
            .expect("built-in sample")
            .to_string()),
        Some("-") => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("reading stdin: {err}"))?;
            Ok(text)
        }
        Some(path) => fs::read_to_string(path).map_err(|err| format!("reading {path}: {err}")),
    }
}
