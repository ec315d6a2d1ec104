use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crawler_core::SyncSettings;
use crawler_engine::ApiSettings;
use crawler_logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "crawler-console")]
#[command(about = "Operator console for the YouTube and GitHub discovery crawlers", long_about = None)]
pub struct Cli {
    /// Base URL of the crawler control API.
    #[arg(long, default_value = "http://127.0.0.1:8000/api")]
    pub api_url: String,

    /// Directory holding the per-platform configuration records.
    #[arg(long, default_value = "./crawler_data")]
    pub data_dir: PathBuf,

    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_ms: u64,

    /// How long a start/stop is trusted before the remote must confirm it.
    #[arg(long, default_value_t = 20_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub grace_ms: u64,

    /// Slider inactivity before a value commits.
    #[arg(long, default_value_t = 300)]
    pub quiet_ms: u64,

    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_ms: u64,

    /// Also push saved configurations to the remote `config` endpoint.
    #[arg(long)]
    pub mirror_remote: bool,

    #[arg(long, default_value = "./crawler_console.log")]
    pub log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log_to: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            frame_delay: Duration::from_millis(self.frame_ms),
            quiet_period: Duration::from_millis(self.quiet_ms),
            grace_period: Duration::from_millis(self.grace_ms),
            mirror_remote: self.mirror_remote,
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_url.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..ApiSettings::default()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let cli = Cli::try_parse_from(["crawler-console"]).unwrap();
        assert_eq!(cli.sync_settings(), SyncSettings::default());
        assert_eq!(cli.poll_interval(), Duration::from_secs(10));
        assert_eq!(cli.api_settings().base_url, ApiSettings::default().base_url);
        assert_eq!(cli.log_to, LogTarget::File);
    }

    #[test]
    fn flags_override_timings() {
        let cli = Cli::try_parse_from([
            "crawler-console",
            "--grace-ms",
            "5000",
            "--quiet-ms",
            "100",
            "--mirror-remote",
            "--log-to",
            "both",
        ])
        .unwrap();
        let settings = cli.sync_settings();
        assert_eq!(settings.grace_period, Duration::from_secs(5));
        assert_eq!(settings.quiet_period, Duration::from_millis(100));
        assert!(settings.mirror_remote);
        assert_eq!(LogDestination::from(cli.log_to), LogDestination::Both);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        assert!(Cli::try_parse_from(["crawler-console", "--poll-interval-ms", "0"]).is_err());
    }
}
