use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{LevelFilter, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::{Config, WriteLogger};
use wrap_snake::config::{GameConfig, grid_size_for_terminal};
use wrap_snake::display::FrameSink;
use wrap_snake::game::{Game, GameOverReason, TickOutcome};
use wrap_snake::grid::Grid;
use wrap_snake::scheduler::Ticker;
use wrap_snake::terminal_runtime::{self, TerminalSession};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the per-user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds between snake moves.
    #[arg(long = "move-ms")]
    move_interval_ms: Option<u64>,

    /// Milliseconds between redraws.
    #[arg(long = "render-ms")]
    render_interval_ms: Option<u64>,

    /// Leading segments ignored by the self-collision check.
    #[arg(long)]
    collision_skip: Option<usize>,

    /// Fixed seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Play-field width; defaults to the terminal width.
    #[arg(long)]
    width: Option<u16>,

    /// Play-field height; defaults to the terminal height minus one row.
    #[arg(long)]
    height: Option<u16>,

    /// Redraw only changed cells instead of clearing the screen every frame.
    #[arg(long)]
    no_clear: bool,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(ms) = self.move_interval_ms {
            config.move_interval_ms = ms;
        }
        if let Some(ms) = self.render_interval_ms {
            config.render_interval_ms = ms;
        }
        if let Some(skip) = self.collision_skip {
            config.collision_skip = skip;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_clear {
            config.clear_each_frame = false;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let logger = File::create(path)
            .map_err(|error| error.to_string())
            .and_then(|file| {
                WriteLogger::init(cli.log_level, Config::default(), file)
                    .map_err(|error| error.to_string())
            });
        if let Err(error) = logger {
            eprintln!("Failed to open log file {}: {error}", path.display());
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(reason) => {
            info!("game over: {reason:?}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("{error}");
            eprintln!("wrap-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> wrap_snake::Result<GameOverReason> {
    let mut config = GameConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let (columns, rows) = terminal_runtime::terminal_size()?;
    let (default_width, default_height) = grid_size_for_terminal(columns, rows)?;
    let grid = Grid::new(
        cli.width.unwrap_or(default_width),
        cli.height.unwrap_or(default_height),
    )?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(grid, &config, Box::new(rng))?;

    terminal_runtime::install_panic_hook();
    let mut session = TerminalSession::enter(config.clear_each_frame)?;
    let reason = game_loop(&mut game, &mut session, &config)?;
    drop(session);

    info!(
        "session ended after {} ticks, {} food eaten",
        game.ticks(),
        game.foods_eaten()
    );
    Ok(reason)
}

fn game_loop<S: FrameSink>(
    game: &mut Game,
    sink: &mut S,
    config: &GameConfig,
) -> wrap_snake::Result<GameOverReason> {
    let start = Instant::now();
    let mut movement = Ticker::new(config.move_interval(), start);
    let mut redraw = Ticker::new(config.render_interval(), start);

    game.display().present(sink)?;

    let reason = loop {
        let now = Instant::now();
        let timeout = [movement.time_until_due(now), redraw.time_until_due(now)]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or_else(|| config.render_interval());

        if let Some(input) = terminal_runtime::poll_input(timeout)? {
            if let Some(TickOutcome::GameOver(reason)) = game.handle_input(input) {
                break reason;
            }
        }

        let now = Instant::now();
        if movement.poll(now) {
            if let TickOutcome::GameOver(reason) = game.tick() {
                break reason;
            }
        }
        if redraw.poll(now) {
            game.display().present(sink)?;
        }
    };

    movement.stop();
    redraw.stop();
    Ok(reason)
}
