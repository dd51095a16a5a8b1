mod auth;
mod cli;
mod config;
mod error;
mod http;
mod target;
mod testing;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use auth::TokenVerifier;
use cli::{CliArgs, ExitStatus};
use config::{RunConfig, Verbosity};
use error::Result;
use http::{HttpCaller, ReqwestBackend};
use testing::RunReport;
use testing::runner::run_smoke_tests;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let verbosity = Verbosity::from_level(args.verbosity);
    let env = env_logger::Env::default()
        .default_filter_or(verbosity.log_filter());
    env_logger::Builder::from_env(env).init();

    match run(&args).await {
        Ok(report) => ExitStatus::from_report(&report).into(),
        Err(err) => {
            error!("{err}");
            ExitStatus::Fatal.into()
        }
    }
}

async fn run(args: &CliArgs) -> Result<RunReport> {
    let config = RunConfig::from_args(args)?;
    let caller = HttpCaller::new(ReqwestBackend::new(config.timeout)?);
    let verifier = TokenVerifier::default();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_smoke_tests(&config, &caller, &verifier, &mut out).await
}
