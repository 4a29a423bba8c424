//! Command-line front end: transform an audio file's pitch and speed, then
//! write a WAV or play the result.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use semitone::{CancelToken, TransformParams};

#[derive(Parser, Debug)]
#[command(name = "semitone")]
#[command(about = "Shift the pitch and change the speed of an audio file")]
#[command(version)]
struct Cli {
    /// Input audio file (WAV, MP3, M4A/AAC, FLAC, or OGG)
    input: PathBuf,

    /// Pitch shift in semitones (fractional and negative values allowed)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    semitones: f64,

    /// Speed factor (>1 faster, <1 slower; pitch is unaffected)
    #[arg(short = 'v', long, default_value_t = 1.0)]
    speed: f64,

    /// Output WAV path; when omitted, the result is played instead
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip loudness normalization
    #[arg(long)]
    no_normalize: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> semitone::error::Result<()> {
    let params = TransformParams::new()
        .with_semitones(cli.semitones)
        .with_speed(cli.speed)
        .with_normalize(!cli.no_normalize);

    match &cli.output {
        Some(output) => {
            let result = semitone::transform_file(&cli.input, output, &params)?;
            println!(
                "Wrote {} ({:.2}s, {} Hz, {} channel(s))",
                output.display(),
                result.duration_secs(),
                result.sample_rate,
                result.channels
            );
            Ok(())
        }
        None => {
            let cancel = CancelToken::new();
            let listener = spawn_key_listener(cancel.clone());

            println!("Playing audio... press 'q' to stop.");
            let result = semitone::transform_and_play(&cli.input, &params, &cancel);

            // Unblock the listener thread if playback ended on its own.
            cancel.cancel();
            let _ = listener.join();
            result
        }
    }
}

/// Watches the keyboard in raw mode and cancels on 'q' or Ctrl-C.
fn spawn_key_listener(cancel: CancelToken) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        if enable_raw_mode().is_err() {
            // Not a terminal; playback just runs to completion.
            return;
        }
        while !cancel.is_cancelled() {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => {
                    if let Ok(Event::Key(key)) = event::read() {
                        let quit = matches!(key.code, KeyCode::Char('q'))
                            || (matches!(key.code, KeyCode::Char('c'))
                                && key.modifiers.contains(KeyModifiers::CONTROL));
                        if quit {
                            cancel.cancel();
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
        let _ = disable_raw_mode();
    })
}
