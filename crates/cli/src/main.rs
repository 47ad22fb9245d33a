//! Walkschool CLI - drive the walk-to-school progress store from a terminal.
//!
//! State lives for the length of one session. Commands are read one per
//! line from a script file or stdin.

mod session;

use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkschool_core::Coordinate;
use walkschool_progress::{
    FixedClock, LocationFix, ProgressStore, StaticLocation, StoreConfig,
};

use crate::session::{Flow, Session};

#[derive(Parser)]
#[command(name = "walkschool")]
#[command(about = "Walk to school: routes, points and your pet", long_about = None)]
struct Cli {
    /// JSON config file for the store
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Starting location as "lat,lon"; omit to start with permission denied
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    location: Option<Coordinate>,

    /// How many recent arrivals `recent` lists (overrides the config file)
    #[arg(long)]
    recent: Option<usize>,

    /// strftime pattern for route dates (overrides the config file)
    #[arg(long)]
    date_format: Option<String>,

    /// Log store operations
    #[arg(short, long)]
    verbose: bool,
}

fn parse_coordinate(raw: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {raw:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    Ok(Coordinate::new(lat, lon))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(limit) = cli.recent {
        config = config.with_recent_display_limit(limit);
    }
    if let Some(format) = cli.date_format {
        config = config.with_date_format(format);
    }
    config.validate().context("invalid command-line settings")?;

    let mut store = ProgressStore::new().with_config(config);
    if let Some(date) = cli.today {
        store = store.with_clock(FixedClock::new(date));
    }

    let fix = match cli.location {
        Some(at) => LocationFix::Resolved(at),
        None => LocationFix::Denied,
    };
    store.locate(&mut StaticLocation(fix));

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    info!("Session started at {}", store.map_center());
    let mut session = Session::new(store);

    for line in input.lines() {
        let line = line.context("reading command")?;
        match session.run_line(&line) {
            Flow::Continue(out) if out.is_empty() => {}
            Flow::Continue(out) => println!("{}", out),
            Flow::Quit => break,
        }
    }

    info!(
        "Session ended with {} points and {} saved routes",
        session.store().points(),
        session.store().saved_routes().len()
    );
    Ok(())
}
