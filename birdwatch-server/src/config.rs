//! Command line configuration.

use birdwatch_core::Position;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub const DEFAULT_DRONES_URL: &str = "http://assignments.reaktor.com/birdnest/drones";
pub const DEFAULT_PILOTS_URL: &str = "http://assignments.reaktor.com/birdnest/pilots";

#[derive(Parser, Clone, Debug)]
#[command(
    name = "birdwatch-server",
    about = "Monitors a drone position feed and streams no-fly-zone violations to subscribers"
)]
pub struct Args {
    /// Port for the HTTP listener (SSE stream and liveness probe)
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Upstream drone position feed (XML report endpoint)
    #[arg(long, default_value = DEFAULT_DRONES_URL)]
    pub drones_url: String,

    /// Pilot registry base URL; the drone serial is appended per lookup
    #[arg(long, default_value = DEFAULT_PILOTS_URL)]
    pub pilots_url: String,

    /// X coordinate of the nest in millimeters
    #[arg(long, default_value_t = 250_000.0)]
    pub nest_x: f64,

    /// Y coordinate of the nest in millimeters
    #[arg(long, default_value_t = 250_000.0)]
    pub nest_y: f64,

    /// No-fly-zone radius in millimeters
    #[arg(long, default_value_t = 100_000.0)]
    pub radius: f64,

    /// Trailing violation history window in seconds
    #[arg(long, default_value_t = 600)]
    pub window_secs: u64,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub interval_ms: u64,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Args {
    pub fn nest(&self) -> Position {
        Position::new(self.nest_x, self.nest_y)
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.window_secs as i64)
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }
}
