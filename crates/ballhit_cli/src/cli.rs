//! Command-line interface for `ballhit`.
//!
//! # Examples
//!
//! ```bash
//! # Two 20 g metal balls, right one released from 30°
//! ballhit run
//!
//! # Heavy metal striker against a light plasticine ball, as JSON
//! ballhit run --left 0 --right 14 --angle 60 --format json
//!
//! # Draw the bench with both balls hung and the arm pulled back
//! ballhit snapshot --left 2 --right 3 --angle 45 -o bench.svg
//!
//! # Print the default lab configuration as TOML
//! ballhit config
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

/// Tick cap for runs when `--max-ticks` is not given.
pub const DEFAULT_MAX_TICKS: u64 = 1_000_000;

/// Ballistic pendulum bench.
///
/// Hang two balls on the pendulums, pull the right one back, let it go and
/// watch momentum change hands.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ballhit",
    author,
    version,
    about = "Ballistic pendulum bench: elastic and inelastic ball collisions",
    long_about = "Simulates two pendulums: the right ball is released from an angle and \
                  strikes the left one. Metal pairs collide elastically, anything with \
                  plasticine sticks together."
)]
pub struct Cli {
    /// Lab configuration file (TOML)
    ///
    /// Missing fields keep their default values
    #[arg(long, short = 'c', global = true, env = "BALLHIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run one collision experiment and report the outcome
    Run(RunArgs),

    /// Draw the bench as an SVG image
    Snapshot(SnapshotArgs),

    /// List the balls in the rack
    Rack,

    /// Print the effective lab configuration as TOML
    Config,
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Rack index of the ball on the left (target) arm
    #[arg(long, short = 'l', default_value_t = 2)]
    pub left: usize,

    /// Rack index of the ball on the right (released) arm
    #[arg(long, short = 'r', default_value_t = 3)]
    pub right: usize,

    /// Release angle of the right arm in degrees
    #[arg(long, short = 'a', default_value_t = 30.0)]
    pub angle: f64,

    /// Tick length in milliseconds (defaults to the configured interval)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: Option<u64>,

    /// Sleep between ticks and step by the measured wall-clock time
    #[arg(long)]
    pub realtime: bool,

    /// Give up after this many ticks
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    pub max_ticks: u64,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Record both arm angles after every tick
    #[arg(long)]
    pub trace: bool,
}

impl RunArgs {
    /// Tick length, falling back to `default` when not given.
    pub fn tick(&self, default: Duration) -> Duration {
        self.tick_ms.map_or(default, Duration::from_millis)
    }
}

/// Arguments for the snapshot subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SnapshotArgs {
    /// Output file path (stdout if not given)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Rack index of a ball to hang on the left arm
    #[arg(long, short = 'l')]
    pub left: Option<usize>,

    /// Rack index of a ball to hang on the right arm
    #[arg(long, short = 'r')]
    pub right: Option<usize>,

    /// Pull the right arm back to this angle
    #[arg(long, short = 'a')]
    pub angle: Option<f64>,

    /// Rack index of a ball to put on the scale
    #[arg(long, short = 'w')]
    pub weigh: Option<usize>,

    /// Run the experiment to the end before drawing
    #[arg(long, requires_all = ["left", "right", "angle"])]
    pub after_run: bool,

    /// Give up on --after-run after this many ticks
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    pub max_ticks: u64,
}

/// Report formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Command::Run(args) => args,
            other => panic!("Expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_run_defaults() {
        let cli = Cli::try_parse_from(["ballhit", "run"]).unwrap();
        assert!(cli.config.is_none());

        let args = run_args(cli);
        assert_eq!(args.left, 2);
        assert_eq!(args.right, 3);
        assert!((args.angle - 30.0).abs() < f64::EPSILON);
        assert!(args.tick_ms.is_none());
        assert!(!args.realtime);
        assert_eq!(args.max_ticks, 1_000_000);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.trace);
    }

    #[test]
    fn cli_parses_run_options() {
        let cli = Cli::try_parse_from([
            "ballhit", "run", "-l", "0", "-r", "14", "--angle", "75.5", "--tick-ms", "5",
            "--format", "json", "--trace", "--max-ticks", "10",
        ])
        .unwrap();

        let args = run_args(cli);
        assert_eq!(args.left, 0);
        assert_eq!(args.right, 14);
        assert!((args.angle - 75.5).abs() < f64::EPSILON);
        assert_eq!(args.tick(Duration::from_millis(2)), Duration::from_millis(5));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.trace);
        assert_eq!(args.max_ticks, 10);
    }

    #[test]
    fn cli_rejects_zero_tick() {
        let err = Cli::try_parse_from(["ballhit", "run", "--tick-ms", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let args = run_args(Cli::try_parse_from(["ballhit", "run", "--tick-ms", "1"]).unwrap());
        assert_eq!(args.tick(Duration::from_millis(2)), Duration::from_millis(1));
    }

    #[test]
    fn tick_falls_back_to_config() {
        let args = run_args(Cli::try_parse_from(["ballhit", "run"]).unwrap());
        assert_eq!(args.tick(Duration::from_millis(2)), Duration::from_millis(2));
    }

    #[test]
    fn cli_parses_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["ballhit", "rack", "--config", "/tmp/lab.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lab.toml")));
        assert!(matches!(cli.command, Command::Rack));
    }

    #[test]
    fn cli_parses_verbose() {
        let cli = Cli::try_parse_from(["ballhit", "config"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_level(), LogLevel::Warn);

        let cli = Cli::try_parse_from(["ballhit", "-v", "config"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Info);

        let cli = Cli::try_parse_from(["ballhit", "config", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Debug);

        let cli = Cli::try_parse_from(["ballhit", "-vvvv", "config"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Trace);
        assert_eq!(cli.log_level().as_directive(), "trace");
    }

    #[test]
    fn cli_parses_snapshot() {
        let cli = Cli::try_parse_from([
            "ballhit", "snapshot", "-o", "/tmp/bench.svg", "-l", "2", "-r", "3", "-a", "40",
            "-w", "15",
        ])
        .unwrap();

        match cli.command {
            Command::Snapshot(args) => {
                assert_eq!(args.output, Some(PathBuf::from("/tmp/bench.svg")));
                assert_eq!(args.left, Some(2));
                assert_eq!(args.right, Some(3));
                assert_eq!(args.angle, Some(40.0));
                assert_eq!(args.weigh, Some(15));
                assert!(!args.after_run);
                assert_eq!(args.max_ticks, DEFAULT_MAX_TICKS);
            }
            other => panic!("Expected Snapshot command, got {other:?}"),
        }
    }

    #[test]
    fn after_run_needs_a_loaded_bench() {
        let result = Cli::try_parse_from(["ballhit", "snapshot", "--after-run"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "ballhit", "snapshot", "--after-run", "-l", "2", "-r", "3", "-a", "30",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["ballhit", "run", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["ballhit"]).is_err());
    }

    #[test]
    fn cli_help_works() {
        let result = Cli::try_parse_from(["ballhit", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
