pub mod bus;
pub mod config;
pub mod game;
pub mod scheduler;

use std::io;
use std::time::Duration;

use color_eyre::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::bus::{BusTiming, MonotonicClock};
use crate::config::PadConfig;
use crate::game::BoxGame;
use crate::scheduler::{PollScheduler, SchedulerSettings};

fn main() -> Result<()> {
    setup()?;

    let config = PadConfig::load_or_default()?;
    info!("Starting with config: {:?}", config);

    let mut bus = bus::open(config.pins, BusTiming::default())?;

    let settings = SchedulerSettings {
        tick_period: Duration::from_micros(config.tick_period_us),
    };
    let scheduler = PollScheduler::new(settings, MonotonicClock::new());

    let mut game = BoxGame::new();
    let mut stdout = io::stdout();
    scheduler.run(&mut bus, move |snapshot| {
        if let Err(e) = game.frame(&snapshot, &mut stdout) {
            error!("Failed to draw frame: {}", e);
        }
    })
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    // Frames own stdout; keep the log stream on stderr.
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .pretty()
        .init();
}
