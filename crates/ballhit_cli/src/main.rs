#![forbid(unsafe_code)]

//! # Ballhit
//!
//! Ballistic pendulum bench on the command line.
//!
//! ## Usage
//!
//! ```bash
//! ballhit run                         # Two 20 g metal balls from 30°
//! ballhit run -l 0 -r 14 -a 60        # Plasticine target, heavy striker
//! ballhit snapshot -o bench.svg       # Draw the bench
//! ballhit rack                        # List the available balls
//! ```

use ballhit_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = ballhit_cli::execute(&cli)?;
    print!("{output}");
    Ok(())
}
