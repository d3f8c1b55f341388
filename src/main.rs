use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use arcade_snake::app::App;
use arcade_snake::audio::{AudioSink, BellSink, SoundSettings};
use arcade_snake::clock::MonotonicClock;
use arcade_snake::config::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, FRAME_INTERVAL, GridSize, THEME,
};
use arcade_snake::input::poll_intent;
use arcade_snake::renderer;
use arcade_snake::score::{JsonLedger, scores_path};
use arcade_snake::terminal_runtime::{TerminalGuard, install_panic_hook};
use clap::Parser;
use log::{LevelFilter, info};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Playfield width in cells.
    #[arg(
        long,
        default_value_t = DEFAULT_GRID_WIDTH,
        value_parser = clap::value_parser!(u16).range(8..=200)
    )]
    width: u16,

    /// Playfield height in cells.
    #[arg(
        long,
        default_value_t = DEFAULT_GRID_HEIGHT,
        value_parser = clap::value_parser!(u16).range(6..=100)
    )]
    height: u16,

    /// Seed for a reproducible run; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,

    /// High-score file; defaults to the platform data directory.
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Write diagnostics to this file (filter with RUST_LOG).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Start with sound and music switched off.
    #[arg(long)]
    mute: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    // Resolve the ledger before raw mode so warnings stay readable.
    let path = cli.scores_file.clone().unwrap_or_else(scores_path);
    let ledger = JsonLedger::open(&path).unwrap_or_else(|error| {
        eprintln!("Ignoring high scores in {}: {error}", path.display());
        JsonLedger::empty(&path)
    });

    let bounds = GridSize {
        width: cli.width,
        height: cli.height,
    };
    let seed = cli.seed.unwrap_or_else(time_seed);
    let sound = if cli.mute {
        SoundSettings::muted()
    } else {
        SoundSettings::default()
    };
    let app = App::new(bounds, seed, ledger, MonotonicClock::start())
        .map_err(io::Error::other)?
        .with_sound(sound);
    info!("starting on {}x{} grid with seed {seed}", bounds.width, bounds.height);

    install_panic_hook();
    let mut guard = TerminalGuard::enter()?;
    run(&mut guard, app)
}

fn run(guard: &mut TerminalGuard, mut app: App<JsonLedger, MonotonicClock>) -> io::Result<()> {
    let mut sink = BellSink;

    while !app.should_quit() {
        guard
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &app.snapshot(), &THEME))?;

        if let Some(intent) = poll_intent(Duration::ZERO, app.input_mode())? {
            app.handle_intent(intent);
        }
        app.update();

        let sound = *app.sound();
        for cue in app.drain_cues() {
            sink.play(cue, &sound);
        }

        thread::sleep(FRAME_INTERVAL);
    }

    info!("quit requested");
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    match log_file {
        Some(path) => {
            builder
                .filter_level(LevelFilter::Info)
                .target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.parse_default_env().init();
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}
