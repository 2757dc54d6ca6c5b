// src/types.rs

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// How the supervised program is (re)started.
///
/// - `Build`: run the build command, wait for it, then start the built
///   executable (default).
/// - `Run`: start the run command directly, e.g. `go run ./wiki.go`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStrategy {
    Build,
    Run,
}

impl Default for LaunchStrategy {
    fn default() -> Self {
        LaunchStrategy::Build
    }
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchStrategy::Build => f.write_str("build"),
            LaunchStrategy::Run => f.write_str("run"),
        }
    }
}

impl FromStr for LaunchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "build" => Ok(LaunchStrategy::Build),
            "run" => Ok(LaunchStrategy::Run),
            other => Err(format!(
                "invalid launch strategy: {other} (expected \"build\" or \"run\")"
            )),
        }
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("5d").is_err());
    }

    #[test]
    fn launch_strategy_from_str() {
        assert_eq!("build".parse::<LaunchStrategy>(), Ok(LaunchStrategy::Build));
        assert_eq!(" RUN ".parse::<LaunchStrategy>(), Ok(LaunchStrategy::Run));
        assert!("compile".parse::<LaunchStrategy>().is_err());
    }
}
