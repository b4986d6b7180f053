use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use opener_core::{delay_from_secs, ConfigError, ConfigPatch, OpenTarget};
use opener_logging::LogDestination;
use serde::{Deserialize, Serialize};

/// Open a list of URLs in batches, with randomized pauses between strides.
///
/// URLs are read one per line from FILE (or stdin). Without `--interactive`
/// one batch is opened and the program exits; with it, commands are read from
/// stdin (type `help`).
#[derive(Debug, Parser)]
#[command(name = "bulk_open", version, about)]
pub struct Cli {
    /// File with one URL per line; `-` or omitted reads stdin
    pub input: Option<PathBuf>,

    /// Open each URL in a new tab or a new window
    #[arg(long, value_enum)]
    pub target: Option<TargetChoice>,

    /// URLs per run; 0 opens everything that remains
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// URLs opened back to back before each pause
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Shortest pause between strides, in seconds
    #[arg(long)]
    pub min_delay: Option<f64>,

    /// Longest pause between strides, in seconds
    #[arg(long)]
    pub max_delay: Option<f64>,

    /// First line to include (1-based)
    #[arg(long)]
    pub range_start: Option<usize>,

    /// Last line to include (1-based, inclusive)
    #[arg(long)]
    pub range_end: Option<usize>,

    /// Keep only URLs matching this case-insensitive regex
    #[arg(short = 'f', long)]
    pub filter: Option<String>,

    /// Query parameters appended to every URL, e.g. `utm_source=list`
    #[arg(short = 'a', long)]
    pub append: Option<String>,

    /// Browser program to launch instead of the system default
    #[arg(long)]
    pub browser: Option<String>,

    /// Log what would be opened without opening anything
    #[arg(long)]
    pub dry_run: bool,

    /// Read commands from stdin instead of exiting after one batch
    #[arg(short, long)]
    pub interactive: bool,

    /// Directory for `export` (default: current directory)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// RON settings file (default: ./bulk_open.ron if present)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Also write logs to this file (default name: bulk_open.log)
    #[arg(long, num_args = 0..=1, default_missing_value = opener_logging::DEFAULT_LOG_FILE)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Keep logs off the terminal; with `--log-file` they only go to the file
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetChoice {
    Tab,
    Window,
}

impl From<TargetChoice> for OpenTarget {
    fn from(choice: TargetChoice) -> Self {
        match choice {
            TargetChoice::Tab => OpenTarget::Tab,
            TargetChoice::Window => OpenTarget::Window,
        }
    }
}

impl Cli {
    /// Where logs go and how much is kept.
    pub fn log_setup(&self) -> (LogDestination, LevelFilter) {
        let level = if self.verbose {
            LevelFilter::Debug
        } else if self.log_file.is_some() {
            LevelFilter::Info
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        };
        let destination = match (&self.log_file, self.quiet) {
            (Some(path), true) => LogDestination::File(path.clone()),
            (Some(path), false) => LogDestination::Both(path.clone()),
            (None, _) => LogDestination::Terminal,
        };
        (destination, level)
    }

    /// Config overrides given on the command line.
    pub fn config_patch(&self) -> Result<ConfigPatch, ConfigError> {
        Ok(ConfigPatch {
            target: self.target.map(Into::into),
            batch_size: self.batch_size,
            concurrency: self.concurrency,
            min_delay: self.min_delay.map(delay_from_secs).transpose()?,
            max_delay: self.max_delay.map(delay_from_secs).transpose()?,
        })
    }

    pub fn reads_stdin(&self) -> bool {
        self.input
            .as_deref()
            .is_none_or(|path| path.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn flags_become_a_config_patch() {
        let cli = Cli::parse_from([
            "bulk_open",
            "urls.txt",
            "--target",
            "window",
            "-b",
            "0",
            "-c",
            "4",
            "--min-delay",
            "0.5",
        ]);
        let patch = cli.config_patch().unwrap();
        assert_eq!(patch.target, Some(OpenTarget::Window));
        assert_eq!(patch.batch_size, Some(0));
        assert_eq!(patch.concurrency, Some(4));
        assert_eq!(patch.min_delay, Some(Duration::from_millis(500)));
        assert_eq!(patch.max_delay, None);
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn negative_delay_is_rejected() {
        let cli = Cli::parse_from(["bulk_open", "--max-delay=-2"]);
        assert!(cli.config_patch().is_err());
        assert!(cli.reads_stdin());
    }

    #[test]
    fn quiet_with_a_log_file_logs_to_the_file_only() {
        let cli = Cli::parse_from(["bulk_open", "--quiet", "--log-file", "run.log"]);
        assert_eq!(
            cli.log_setup(),
            (LogDestination::File(PathBuf::from("run.log")), LevelFilter::Info)
        );

        let cli = Cli::parse_from(["bulk_open", "--log-file"]);
        assert_eq!(
            cli.log_setup(),
            (
                LogDestination::Both(PathBuf::from(opener_logging::DEFAULT_LOG_FILE)),
                LevelFilter::Info
            )
        );

        let cli = Cli::parse_from(["bulk_open", "-q"]);
        assert_eq!(cli.log_setup(), (LogDestination::Terminal, LevelFilter::Error));
    }
}
