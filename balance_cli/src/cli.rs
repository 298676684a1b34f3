//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "balance", version, about = "Ball-and-beam balancer")]
pub struct Cli {
    /// Path to config TOML; built-in rig defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON lines (telemetry on stdout, logs on stderr) instead of pretty text
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Command source for the actuator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    /// State feedback from the observer estimate
    Feedback,
    /// Open-loop ramp between the actuator limits
    Sweep,
}

impl From<ModeArg> for balance_core::ControlMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Feedback => balance_core::ControlMode::Feedback,
            ModeArg::Sweep => balance_core::ControlMode::Sweep,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop against the simulated rig
    Run {
        /// Stop after N ticks (overrides loop.max_ticks; 0 = until Ctrl-C)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Physics speed-up while running (overrides loop.time_scale)
        #[arg(long, value_name = "X")]
        time_scale: Option<f64>,
        /// Control tick rate in Hz (overrides loop.tick_hz)
        #[arg(long, value_name = "HZ")]
        tick_hz: Option<u32>,
        /// Command source (overrides controller.mode)
        #[arg(long, value_enum, value_name = "MODE")]
        mode: Option<ModeArg>,
        /// With --json, print a telemetry line every N ticks
        #[arg(long, value_name = "N", default_value_t = 1)]
        every: u64,
        /// Print tick timing stats on completion
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Validate config and run one tick against the simulator
    SelfCheck,
    /// Health check for operational monitoring (JSON)
    Health,
}
