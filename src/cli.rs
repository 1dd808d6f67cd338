use clap::Parser;
use regex::Regex;
use strum::{Display, EnumString};
use tracing_subscriber::filter::LevelFilter;

use crate::select::SelectionCriteria;

/// Assemble an issue-tracker comment from your pushed commits
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cnote")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Limit the selection to the last N commits by the current identity
    #[arg(short = 'n', long, value_name = "N")]
    pub number: Option<usize>,

    /// Keep only commits whose message matches PATTERN (a regular expression)
    #[arg(short = 'g', long, value_name = "PATTERN", value_parser = parse_pattern)]
    pub grep: Option<String>,

    /// Print the comment to standard output instead of the clipboard
    ///
    /// Implies errors-only logging and requires an upstream tracking
    /// branch, so the output stays redirectable.
    #[arg(long)]
    pub standard_output: bool,

    /// Suppress all log output
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Set the log verbosity explicitly
    #[arg(short = 'l', long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

fn parse_pattern(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("the pattern must not be empty".to_owned());
    }
    Regex::new(s).map_err(|e| e.to_string())?;
    Ok(s.to_owned())
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> LevelFilter {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Where the assembled comment goes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutputMode {
    Clipboard,
    Stdout,
}

/// The immutable per-run configuration, constructed once from the parsed
/// arguments and passed by reference into every component.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub criteria: SelectionCriteria,
    pub output: OutputMode,
    /// Resolved verbosity; `None` silences logging entirely.
    pub verbosity: Option<LogLevel>,
}

impl RunConfig {
    pub fn from_args(args: &Args) -> RunConfig {
        let criteria = match (args.number, args.grep.as_ref()) {
            (Some(number), Some(pattern)) => SelectionCriteria::LastMatching {
                number,
                pattern: pattern.clone(),
            },
            (Some(number), None) => SelectionCriteria::Last(number),
            (None, Some(pattern)) => SelectionCriteria::Matching(pattern.clone()),
            (None, None) => SelectionCriteria::Interactive,
        };

        let output = if args.standard_output {
            OutputMode::Stdout
        } else {
            OutputMode::Clipboard
        };

        // --silent beats everything; an explicit level beats the errors-only
        // raise implied by --standard-output.
        let verbosity = if args.silent {
            None
        } else if let Some(level) = args.log_level {
            Some(level)
        } else if args.standard_output {
            Some(LogLevel::Error)
        } else {
            Some(LogLevel::Info)
        };

        RunConfig {
            criteria,
            output,
            verbosity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn criteria_from_flags() {
        let args = Args::try_parse_from(["cnote", "-n", "5", "-g", "FOO"]).unwrap();
        let cfg = RunConfig::from_args(&args);
        assert_eq!(
            cfg.criteria,
            SelectionCriteria::LastMatching {
                number: 5,
                pattern: "FOO".to_owned()
            }
        );

        let args = Args::try_parse_from(["cnote", "--number", "3"]).unwrap();
        assert_eq!(
            RunConfig::from_args(&args).criteria,
            SelectionCriteria::Last(3)
        );

        let args = Args::try_parse_from(["cnote", "--grep", "FOO-123"]).unwrap();
        assert_eq!(
            RunConfig::from_args(&args).criteria,
            SelectionCriteria::Matching("FOO-123".to_owned())
        );

        let args = Args::try_parse_from(["cnote"]).unwrap();
        assert_eq!(
            RunConfig::from_args(&args).criteria,
            SelectionCriteria::Interactive
        );
    }

    #[test]
    fn negative_or_garbage_count_is_a_usage_error() {
        assert!(Args::try_parse_from(["cnote", "-n", "-1"]).is_err());
        assert!(Args::try_parse_from(["cnote", "-n", "many"]).is_err());
    }

    #[test]
    fn empty_or_invalid_pattern_is_a_usage_error() {
        assert!(Args::try_parse_from(["cnote", "-g", ""]).is_err());
        assert!(Args::try_parse_from(["cnote", "-g", "  "]).is_err());
        assert!(Args::try_parse_from(["cnote", "-g", "[unclosed"]).is_err());
    }

    #[test]
    fn unrecognized_flag_is_a_usage_error() {
        assert!(Args::try_parse_from(["cnote", "--frobnicate"]).is_err());
    }

    #[test]
    fn standard_output_selects_stdout_sink() {
        let args = Args::try_parse_from(["cnote", "--standard-output"]).unwrap();
        assert_eq!(RunConfig::from_args(&args).output, OutputMode::Stdout);
    }

    #[test]
    fn verbosity_defaults_to_info() {
        let args = Args::try_parse_from(["cnote"]).unwrap();
        assert_eq!(
            RunConfig::from_args(&args).verbosity,
            Some(LogLevel::Info)
        );
    }

    #[test]
    fn standard_output_implies_errors_only() {
        let args = Args::try_parse_from(["cnote", "--standard-output"]).unwrap();
        assert_eq!(
            RunConfig::from_args(&args).verbosity,
            Some(LogLevel::Error)
        );
    }

    #[test]
    fn explicit_level_beats_the_implied_raise() {
        let args =
            Args::try_parse_from(["cnote", "--standard-output", "-l", "debug"]).unwrap();
        assert_eq!(
            RunConfig::from_args(&args).verbosity,
            Some(LogLevel::Debug)
        );
    }

    #[test]
    fn silent_beats_everything() {
        let args = Args::try_parse_from(["cnote", "-s", "-l", "trace"]).unwrap();
        assert_eq!(RunConfig::from_args(&args).verbosity, None);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
