//! Main application entry point (native).

use std::path::PathBuf;

use clap::Parser;
use handmix_app::{DEFAULT_FRAME_INTERVAL_MS, Pacing};

#[derive(Debug, Parser)]
#[command(name = "handmix")]
#[command(about = "Drive gesture controls from a JSON-lines hand landmark stream")]
struct Cli {
    /// Configuration file (JSON). Defaults apply when omitted.
    config: Option<PathBuf>,
    /// Recorded frames, one JSON object per line. Reads stdin when omitted.
    frames: Option<PathBuf>,
    /// Spacing of recorded frames that carry no `timestamp_ms`.
    #[arg(long = "frame-interval-ms", default_value_t = DEFAULT_FRAME_INTERVAL_MS)]
    frame_interval_ms: f64,
    /// Stamp frames from the file on arrival, as for stdin.
    #[arg(long)]
    live: bool,
}

impl Cli {
    fn pacing(&self) -> Pacing {
        if self.frames.is_some() && !self.live {
            Pacing::Replay {
                frame_interval_ms: self.frame_interval_ms,
            }
        } else {
            Pacing::Live
        }
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::init();
    log::info!("Starting Handmix");

    if let Err(e) = handmix_app::run(cli.config.as_deref(), cli.frames.as_deref(), cli.pacing()) {
        log::error!("{}", e);
        eprintln!("handmix: {}", e);
        std::process::exit(1);
    }
}
