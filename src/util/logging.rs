//! stderr diagnostics via `tracing`.
//!
//! stdout is reserved for the output path printed on success.

use crate::constants;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count; `quiet` wins over verbosity.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `ROUTE_REPORT_LOG` overrides the flags.
/// A second call is a no-op.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_CRATE_NAME"),
            level_for(verbose, quiet)
        ))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, false), "warn");
        assert_eq!(level_for(1, false), "info");
        assert_eq!(level_for(2, false), "debug");
        assert_eq!(level_for(7, false), "trace");
        assert_eq!(level_for(3, true), "error");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0, false);
        init(2, false);
    }
}
