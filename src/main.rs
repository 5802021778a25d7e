//! falltris — falling-block puzzle game in the terminal.

mod app;
mod board;
mod catalog;
mod game;
mod input;
mod logging;
mod piece;
mod theme;
mod ui;

use anyhow::{Result, ensure};
use app::App;
use catalog::CatalogRange;
use clap::Parser;
use log::{LevelFilter, info, warn};
use std::time::Duration;

/// Smallest width where every catalog shape fits at the centre spawn anchor.
const MIN_WIDTH: u16 = 6;
const MIN_HEIGHT: u16 = 4;
/// Upper bounds keep the drawn board well inside `u16` terminal coordinates.
const MAX_WIDTH: u16 = 200;
const MAX_HEIGHT: u16 = 200;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub tick_interval: Duration,
    pub catalog: CatalogRange,
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        ensure!(args.width >= MIN_WIDTH, "--width must be at least {MIN_WIDTH}, got {}", args.width);
        ensure!(args.height >= MIN_HEIGHT, "--height must be at least {MIN_HEIGHT}, got {}", args.height);
        ensure!(args.width <= MAX_WIDTH, "--width must be at most {MAX_WIDTH}, got {}", args.width);
        ensure!(args.height <= MAX_HEIGHT, "--height must be at most {MAX_HEIGHT}, got {}", args.height);
        ensure!(args.interval_ms > 0, "--interval-ms must be positive");
        Ok(Self {
            width: args.width as usize,
            height: args.height as usize,
            tick_interval: Duration::from_millis(args.interval_ms),
            catalog: if args.full_catalog { CatalogRange::Full } else { CatalogRange::Legacy },
            seed: args.seed,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::from_args(&args)?;
    logging::init_log(args.log_level, args.log_file.as_deref())?;
    info!("starting: {}x{} board, {:?} tick, catalog {}", config.width, config.height, config.tick_interval, config.catalog);
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_else(|e| {
        warn!("theme not loaded, using default: {e}");
        theme::Theme::default()
    });
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "falltris",
    version,
    about = "Falling-block puzzle in the terminal. Complete a row to clear it; each row scores one point.",
    long_about = "falltris is a terminal falling-block puzzle game.\n\n\
        Pieces fall one row per tick. Move and rotate them as they fall; a piece locks when it \
        cannot fall further. Every completed row is cleared and scores one point. The game ends \
        when a new piece has no room to spawn.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move   z  Rotate left   x  Rotate right\n  \
        r  Restart (after game over)   q / Esc  Quit\n\n\
        A held key acts once; press again to repeat."
)]
pub struct Args {
    /// Board width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: u16,

    /// Milliseconds between game ticks (one row of gravity per tick).
    #[arg(long, default_value = "150", value_name = "MS")]
    pub interval_ms: u64,

    /// Seed for the piece generator; random when unset.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Draw pieces from the whole catalog. By default the last catalog shape
    /// (S) is never generated.
    #[arg(long)]
    pub full_catalog: bool,

    /// Path to theme file (btop-style theme[key]="value").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Write logs to this file. No logging when unset.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,

    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: LevelFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("falltris").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_are_classic_board() {
        let config = GameConfig::from_args(&parse(&[])).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 20);
        assert_eq!(config.tick_interval, Duration::from_millis(150));
        assert_eq!(config.catalog, CatalogRange::Legacy);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn flags_flow_into_config() {
        let args = parse(&["--width", "12", "--height", "24", "--interval-ms", "80", "--seed", "9", "--full-catalog"]);
        let config = GameConfig::from_args(&args).unwrap();
        assert_eq!((config.width, config.height), (12, 24));
        assert_eq!(config.tick_interval, Duration::from_millis(80));
        assert_eq!(config.catalog, CatalogRange::Full);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn rejects_too_small_board() {
        assert!(GameConfig::from_args(&parse(&["--width", "5"])).is_err());
        assert!(GameConfig::from_args(&parse(&["--height", "3"])).is_err());
        assert!(GameConfig::from_args(&parse(&["--interval-ms", "0"])).is_err());
    }

    #[test]
    fn rejects_oversized_board() {
        assert!(GameConfig::from_args(&parse(&["--width", "40000"])).is_err());
        assert!(GameConfig::from_args(&parse(&["--height", "201"])).is_err());
        assert!(GameConfig::from_args(&parse(&["--width", "200", "--height", "200"])).is_ok());
    }

    #[test]
    fn log_level_parses() {
        assert_eq!(parse(&["--log-level", "debug"]).log_level, LevelFilter::Debug);
        assert!(Args::try_parse_from(["falltris", "--log-level", "loud"]).is_err());
    }
}
