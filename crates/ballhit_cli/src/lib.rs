#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

//! # Ballhit CLI
//!
//! Library half of the `ballhit` binary. Every subcommand is a function from
//! parsed arguments to the text it prints, which keeps them testable without
//! spawning a process.
//!
//! ```rust
//! use ballhit::LabConfig;
//! use ballhit_cli::{RunOptions, run};
//!
//! let report = run(LabConfig::default(), &RunOptions::default()).unwrap();
//! assert!((report.left_angle - 30.0).abs() < 1.0);
//! ```

pub mod cli;
mod driver;
mod error;
mod svg;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ballhit::{Lab, LabConfig, Side};
use tracing::{debug, info};

use crate::cli::{Cli, Command, OutputFormat, RunArgs, SnapshotArgs};

pub use driver::{
    BallSummary, RunOptions, RunReport, Sample, ball_id, hang, hang_pair, pull, run,
};
pub use error::{CliError, Result};
pub use svg::SvgCanvas;

/// Reads a lab configuration, or returns the default one without a path.
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid TOML, or describes an
/// invalid lab.
pub fn load_config(path: Option<&Path>) -> Result<LabConfig> {
    let Some(path) = path else {
        return Ok(LabConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config: LabConfig = toml::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    debug!(path = %path.display(), balls = config.balls.len(), "Loaded config");
    Ok(config)
}

/// Runs the selected subcommand and returns what it prints.
///
/// # Errors
///
/// Returns the first [`CliError`] the command hits.
pub fn execute(cli: &Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Run(args) => run_command(config, args),
        Command::Snapshot(args) => snapshot_command(config, args),
        Command::Rack => rack_command(config),
        Command::Config => Ok(toml::to_string_pretty(&config)?),
    }
}

fn run_command(config: LabConfig, args: &RunArgs) -> Result<String> {
    let options = RunOptions {
        left: args.left,
        right: args.right,
        angle: args.angle,
        tick: args.tick(config.tick_interval()),
        realtime: args.realtime,
        max_ticks: args.max_ticks,
        trace: args.trace,
    };
    let report = run(config, &options)?;
    match args.format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&report)?)),
    }
}

/// Sets the bench up as requested and draws it.
///
/// # Errors
///
/// Fails on unknown ball indices, when the bench ignores a requested setup
/// step, or when a requested run cannot start or does not finish within
/// `max_ticks`.
pub fn snapshot(config: LabConfig, args: &SnapshotArgs) -> Result<String> {
    let mut lab = Lab::new(config)?;

    if let (Some(left), Some(right)) = (args.left, args.right) {
        hang_pair(&mut lab, left, right)?;
    } else if let Some(left) = args.left {
        hang(&mut lab, Side::Left, left)?;
    } else if let Some(right) = args.right {
        hang(&mut lab, Side::Right, right)?;
    }

    if let Some(index) = args.weigh {
        let id = ball_id(&lab, index)?;
        if !lab.weigh(id) {
            return Err(CliError::Refused(format!("put ball #{index} on the scale")));
        }
    }

    if let Some(angle) = args.angle {
        pull(&mut lab, angle)?;
    }

    if args.after_run {
        lab.start()?;
        let mut ticks = 0u64;
        while !lab.simulation_finished() {
            if ticks >= args.max_ticks {
                return Err(CliError::Timeout { ticks });
            }
            lab.tick(lab.tick_interval());
            ticks += 1;
        }
    }

    let mut canvas = SvgCanvas::default();
    lab.draw(&mut canvas);
    Ok(canvas.finish())
}

fn snapshot_command(config: LabConfig, args: &SnapshotArgs) -> Result<String> {
    let svg = snapshot(config, args)?;
    match &args.output {
        Some(path) => {
            fs::write(path, svg).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Snapshot written");
            Ok(format!("Wrote {}\n", path.display()))
        }
        None => Ok(svg),
    }
}

fn rack_command(config: LabConfig) -> Result<String> {
    let lab = Lab::new(config)?;
    let mut out = String::from("index  mass (kg)  material\n");
    for (id, ball) in lab.balls().iter() {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{:>5}  {:>9.3}  {}",
            id.index(),
            ball.mass(),
            ball.material()
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn rack_lists_every_ball() {
        let out = execute(&parse(&["ballhit", "rack"])).unwrap();
        assert_eq!(out.lines().count(), 17);
        assert!(out.contains("    0      0.020  plasticine"), "{out}");
        assert!(out.contains("   15      0.050  metal"), "{out}");
    }

    #[test]
    fn config_prints_toml_that_loads_back() {
        let out = execute(&parse(&["ballhit", "config"])).unwrap();
        assert!(out.contains("arm_length = 150.0"), "{out}");

        let back: LabConfig = toml::from_str(&out).unwrap();
        assert_eq!(back, LabConfig::default());
    }

    #[test]
    fn partial_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_start_angle = 2.0\ntick_interval_ms = 5").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!((config.min_start_angle - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.tick_interval_ms, 5);
        assert_eq!(config.balls.len(), 16);
    }

    #[test]
    fn broken_config_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "arm_length = \"long\"").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(CliError::ParseConfig { .. })
        ));
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "effective_length = 0.0").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(CliError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ReadConfig { .. }));
    }

    #[test]
    fn snapshot_draws_hung_balls_rotated() {
        let cli = parse(&["ballhit", "snapshot", "-l", "2", "-r", "3", "-a", "40", "-w", "15"]);
        let Command::Snapshot(args) = &cli.command else {
            panic!("Expected Snapshot command");
        };
        let svg = snapshot(LabConfig::default(), args).unwrap();
        assert!(svg.contains("rotate(-40 207 150)"), "{svg}");
        assert!(svg.contains(">0.050</text>"));
        assert!(svg.contains(">0.0000</text>"));
    }

    #[test]
    fn snapshot_refuses_to_pull_a_single_ball() {
        let cli = parse(&["ballhit", "snapshot", "-r", "3", "-a", "40"]);
        let Command::Snapshot(args) = &cli.command else {
            panic!("Expected Snapshot command");
        };
        let err = snapshot(LabConfig::default(), args).unwrap_err();
        assert!(matches!(err, CliError::Refused(_)));
        assert!(err.to_string().contains("pull the right arm"), "{err}");
    }

    #[test]
    fn snapshot_after_run_respects_the_tick_cap() {
        let cli = parse(&[
            "ballhit", "snapshot", "--after-run", "-l", "2", "-r", "3", "-a", "30",
            "--max-ticks", "5",
        ]);
        let Command::Snapshot(args) = &cli.command else {
            panic!("Expected Snapshot command");
        };
        assert!(matches!(
            snapshot(LabConfig::default(), args),
            Err(CliError::Timeout { ticks: 5 })
        ));
    }

    #[test]
    fn snapshot_after_run_shows_the_timer() {
        let cli = parse(&[
            "ballhit", "snapshot", "--after-run", "-l", "2", "-r", "3", "-a", "30",
        ]);
        let Command::Snapshot(args) = &cli.command else {
            panic!("Expected Snapshot command");
        };
        let svg = snapshot(LabConfig::default(), args).unwrap();

        let mut lab = Lab::default();
        hang_pair(&mut lab, 2, 3).unwrap();
        lab.pull_right_arm(30.0);
        lab.start().unwrap();
        while !lab.simulation_finished() {
            lab.tick(lab.tick_interval());
        }
        assert!(lab.timer_reading() > 0.0);
        let timer = format!(">{:.4}</text>", lab.timer_reading());
        assert!(svg.contains(&timer), "missing {timer}");
    }

    #[test]
    fn json_run_output_is_valid_json() {
        let out = execute(&parse(&["ballhit", "run", "--format", "json"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["finish"], "settled");
    }
}
