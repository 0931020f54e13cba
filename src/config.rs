//! Command line options

use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;

use crate::logging::{default_log_level, normalize_level};

pub const DEFAULT_DATA_FILE: &str = "tracker.txt";
pub const DEFAULT_REPORT_FILE: &str = "tracker_report.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    /// `None` when no report should be written
    pub report_file: Option<PathBuf>,
    pub color: bool,
    pub log_level: &'static str,
    /// File logging is enabled only when this is set
    pub log_dir: Option<PathBuf>,
}

fn app() -> App<'static, 'static> {
    App::new("tracker")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep track of tasks, habits and expenses")
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .value_name("PATH")
                .takes_value(true)
                .default_value(DEFAULT_DATA_FILE)
                .help("Data file holding the records"),
        )
        .arg(
            Arg::with_name("report")
                .short("r")
                .long("report")
                .value_name("PATH")
                .takes_value(true)
                .default_value(DEFAULT_REPORT_FILE)
                .help("Where to export the grouped report"),
        )
        .arg(
            Arg::with_name("no-report")
                .long("no-report")
                .help("Do not write the report"),
        )
        .arg(
            Arg::with_name("no-color")
                .long("no-color")
                .help("Plain output without terminal colors"),
        )
        .arg(
            Arg::with_name("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .takes_value(true)
                .help("Write logs to files in DIR"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .takes_value(true)
                .validator(|level| normalize_level(&level).map(|_| ()))
                .help("One of trace, debug, info, warn, error"),
        )
}

impl Config {
    /// Read the options of the current process, exits on invalid arguments
    pub fn from_args() -> Self {
        Self::from_matches(&app().get_matches())
    }

    /// `args` includes the program name
    #[cfg(test)]
    pub fn from_args_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        app().get_matches_from_safe(args).map(|m| Self::from_matches(&m))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let path = |name: &str| matches.value_of_os(name).map(PathBuf::from);
        let report_file = if matches.is_present("no-report") {
            None
        } else {
            path("report")
        };
        let log_level = matches
            .value_of("log-level")
            .and_then(|level| normalize_level(level).ok())
            .unwrap_or_else(default_log_level);
        Self {
            data_file: path("file").unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            report_file,
            color: !matches.is_present("no-color"),
            log_level,
            log_dir: path("log-dir"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::from_args_iter(std::iter::once("tracker").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cfg = parse(&[]).unwrap();
        assert_eq!(cfg.data_file, PathBuf::from("tracker.txt"));
        assert_eq!(cfg.report_file, Some(PathBuf::from("tracker_report.txt")));
        assert!(cfg.color);
        assert_eq!(cfg.log_level, default_log_level());
        assert_eq!(cfg.log_dir, None);
    }

    #[test]
    fn all_options() {
        let cfg = parse(&[
            "-f", "data.txt", "--report", "out.txt", "--no-color",
            "--log-dir", "/tmp/logs", "--log-level", "Warning",
        ])
        .unwrap();
        assert_eq!(cfg.data_file, PathBuf::from("data.txt"));
        assert_eq!(cfg.report_file, Some(PathBuf::from("out.txt")));
        assert!(!cfg.color);
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn disable_report() {
        let cfg = parse(&["--no-report", "-r", "out.txt"]).unwrap();
        assert_eq!(cfg.report_file, None);
    }

    #[test]
    fn reject_unknown_level() {
        assert!(parse(&["--log-level", "loud"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }
}
