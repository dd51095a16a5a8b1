//! # Command Line
//!
//! Argument parsing for the smoke-test binary and the mapping from a finished
//! run to a process exit code, for use in post-deployment pipelines.

use std::process::ExitCode;

use clap::Parser;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::testing::RunReport;

const ABOUT: &str = "BPM Smoke Test";

const LONG_ABOUT: &str = "BPM Smoke Test

Enter the host (domain and optional port) of the BPM instance you want to test. \
This test will ensure that the BPM instance running on that host is minimally functional.";

const VERBOSITY_HELP: &str = "Output verbosity:
  0: Quiet - prints only failure details and the number of tests executed
  1: Minimal - (default) prints a dot for each success and an F for each failure
  2: Verbose - prints the description and result of each test";

/// Command-line arguments parsed by clap.
#[derive(Parser, Debug, Clone)]
#[command(name = "bpm-smoke-tests", version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct CliArgs {
    /// Domain with optional port number of the BPM host you want to test
    #[arg(env = "BPM_HOST")]
    pub bpm_host: String,

    /// Optional. If present, will test additional authenticated endpoints using the specified token
    #[arg(env = "BPM_USER_TOKEN", hide_env_values = true)]
    pub user_token: Option<String>,

    /// Optional Azure subscription id. If present, will test retrieving Azure managed apps
    /// using the specified id
    #[arg(long = "azure_sub_id", visible_alias = "azure-sub-id", value_name = "ID")]
    pub azure_sub_id: Option<String>,

    /// Output verbosity (0, 1 or 2)
    #[arg(
        short = 'v',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=2),
        long_help = VERBOSITY_HELP
    )]
    pub verbosity: u8,

    /// Per-request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

/// Exit codes reported to the calling pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Passed = 0,
    TestsFailed = 1,
    Fatal = 2,
}

impl ExitStatus {
    pub fn from_report(report: &RunReport) -> Self {
        if report.was_successful() {
            ExitStatus::Passed
        } else {
            ExitStatus::TestsFailed
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}
