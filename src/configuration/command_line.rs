use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use crate::configuration::settings::Settings;
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Fixture file with the suite to run
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,

    /// Runner settings file. Supported: YAML, JSON, TOML, HJSON, INI
    #[structopt(long, short = "c", parse(from_os_str), env = "STACKCHECK_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", env = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    /// Seed of the random solve time generator
    #[structopt(long, short = "s")]
    pub seed: Option<u64>,

    /// Keep executing steps after the first failure of a test
    #[structopt(long)]
    pub continue_on_failure: bool,

    /// Perform sleeps in wall-clock time
    #[structopt(long)]
    pub realtime: bool,

    /// Write the JSON run report to this file
    #[structopt(long, short = "r", parse(from_os_str))]
    pub report: Option<PathBuf>,

    /// Run only tests with these names, any other will be skipped
    #[structopt(long, short = "t")]
    pub only: Vec<String>,
}

impl Opt {
    /// Flags given on the command line win over every other settings layer.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if self.continue_on_failure {
            settings.continue_on_failure = true;
        }
        if self.realtime {
            settings.realtime = true;
        }
        if let Some(report) = &self.report {
            settings.report = Some(report.clone());
        }
        if !self.only.is_empty() {
            settings.only = self.only.clone();
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
