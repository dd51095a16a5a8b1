use std::io::Write;
use std::time::Instant;

use log::{debug, info};

use crate::auth::TokenVerifier;
use crate::config::{RunConfig, Verbosity};
use crate::error::Result;
use crate::http::HttpCaller;
use crate::target::Target;

use super::cases::SmokeCase;
use super::suite;
use super::{Outcome, RunReport, TestResult};

const SEPARATOR_HEAVY: &str =
    "======================================================================";
const SEPARATOR_LIGHT: &str =
    "----------------------------------------------------------------------";

/// Resolve the target, verify the token, then run every case the
/// configuration selects.
///
/// Configuration and token errors are returned before any case runs. Case
/// failures never stop the run; they end up in the report.
pub async fn run_smoke_tests(
    config: &RunConfig,
    caller: &HttpCaller,
    verifier: &TokenVerifier,
    out: &mut dyn Write,
) -> Result<RunReport> {
    let target = Target::new(&config.host)?;
    info!("testing BPM at {}", target.base());

    if let Some(token) = &config.user_token {
        verifier.verify(caller, token).await?;
    }

    let cases = suite::assemble(config);
    let report = run_suite(&cases, &target, caller, config.verbosity, out).await?;
    debug!("{} distinct requests issued", caller.cached_calls().await);
    Ok(report)
}

/// Run `cases` one after another, streaming progress to `out`.
pub async fn run_suite(
    cases: &[SmokeCase],
    target: &Target,
    caller: &HttpCaller,
    verbosity: Verbosity,
    out: &mut dyn Write,
) -> Result<RunReport> {
    let started = Instant::now();
    let mut report = RunReport::default();

    for case in cases {
        if verbosity == Verbosity::Verbose {
            write!(out, "{} ({}) ... ", case.name(), case.description())?;
            out.flush()?;
        }

        let case_started = Instant::now();
        let outcome = Outcome::from(case.run(target, caller).await);
        let result = TestResult {
            name: case.name(),
            description: case.description(),
            outcome,
            duration: case_started.elapsed(),
        };

        match verbosity {
            Verbosity::Quiet => {}
            Verbosity::Minimal => {
                write!(out, "{}", progress_mark(&result.outcome))?;
                out.flush()?;
            }
            Verbosity::Verbose => writeln!(
                out,
                "{} ({:.3}s)",
                outcome_word(&result.outcome),
                result.duration.as_secs_f64()
            )?,
        }

        report.record(result);
    }

    report.duration = started.elapsed();
    if verbosity == Verbosity::Minimal && !cases.is_empty() {
        writeln!(out)?;
    }
    write_summary(&report, out)?;
    Ok(report)
}

/// Failure and error details, then the closing `Ran N tests` block.
///
/// Details are written at every verbosity; only per-case progress depends on it.
pub fn write_summary(report: &RunReport, out: &mut dyn Write) -> Result<()> {
    for result in &report.results {
        let (label, message) = match &result.outcome {
            Outcome::Passed => continue,
            Outcome::Failed(message) => ("FAIL", message),
            Outcome::Errored(message) => ("ERROR", message),
        };
        writeln!(out, "{SEPARATOR_HEAVY}")?;
        writeln!(out, "{label}: {} ({})", result.name, result.description)?;
        writeln!(out, "{SEPARATOR_LIGHT}")?;
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }

    writeln!(out, "{SEPARATOR_LIGHT}")?;
    let noun = if report.total == 1 { "test" } else { "tests" };
    writeln!(
        out,
        "Ran {} {noun} in {:.3}s",
        report.total,
        report.duration.as_secs_f64()
    )?;
    writeln!(out)?;

    if report.was_successful() {
        writeln!(out, "OK")?;
    } else {
        let mut counts = Vec::new();
        if report.failed > 0 {
            counts.push(format!("failures={}", report.failed));
        }
        if report.errored > 0 {
            counts.push(format!("errors={}", report.errored));
        }
        writeln!(out, "FAILED ({})", counts.join(", "))?;
    }
    Ok(())
}

fn progress_mark(outcome: &Outcome) -> char {
    match outcome {
        Outcome::Passed => '.',
        Outcome::Failed(_) => 'F',
        Outcome::Errored(_) => 'E',
    }
}

fn outcome_word(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "ok",
        Outcome::Failed(_) => "FAIL",
        Outcome::Errored(_) => "ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmokeError;
    use crate::http::fake::FakeBackend;
    use crate::target::{BILLING_PROFILES_PATH, MANAGED_APPS_PATH, STATUS_PATH};

    const TOKENINFO_PATH: &str = "/oauth2/v1/tokeninfo";
    const HEALTHY_STATUS: &str = r#"{"systems": {"postgres": {"ok": true}, "sam": {"ok": true}}}"#;
    const DEGRADED_STATUS: &str = r#"{"systems": {"db": {"ok": true}, "cache": {"ok": false}}}"#;

    fn render(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    async fn run(config: &RunConfig, backend: FakeBackend) -> (Result<RunReport>, String) {
        let caller = HttpCaller::new(backend);
        let mut out = Vec::new();
        let result = run_smoke_tests(config, &caller, &TokenVerifier::default(), &mut out).await;
        (result, render(out))
    }

    fn full_backend(status: &str) -> FakeBackend {
        FakeBackend::new()
            .route(TOKENINFO_PATH, 200, "{}")
            .route(STATUS_PATH, 200, status)
            .route(BILLING_PROFILES_PATH, 200, "[]")
            .route(MANAGED_APPS_PATH, 200, r#"{"managedApps": []}"#)
    }

    #[tokio::test]
    async fn unauthenticated_run_passes() {
        let config = RunConfig::new("bpm.example.org").unwrap();
        let backend = full_backend(HEALTHY_STATUS);
        let calls = backend.calls();

        let (result, output) = run(&config, backend).await;
        let report = result.unwrap();

        assert_eq!(report.total, 2);
        assert!(report.was_successful());
        assert_eq!(calls.paths(), vec![STATUS_PATH]);
        assert!(output.starts_with("..\n"), "{output}");
        assert!(output.contains("Ran 2 tests in"), "{output}");
        assert!(output.trim_end().ends_with("OK"), "{output}");
    }

    #[tokio::test]
    async fn full_run_covers_every_tier() {
        let config = RunConfig::new("bpm.example.org")
            .unwrap()
            .with_token("ya29.token")
            .with_azure_subscription("sub-123");
        let backend = full_backend(HEALTHY_STATUS);
        let calls = backend.calls();

        let (result, _) = run(&config, backend).await;
        let report = result.unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 4);
        assert_eq!(
            calls.paths(),
            vec![TOKENINFO_PATH, STATUS_PATH, BILLING_PROFILES_PATH, MANAGED_APPS_PATH]
        );
    }

    #[tokio::test]
    async fn invalid_token_aborts_before_any_case() {
        let config = RunConfig::new("bpm.example.org")
            .unwrap()
            .with_token("ya29.expired");
        let backend = full_backend(HEALTHY_STATUS).route(TOKENINFO_PATH, 400, "{}");
        let calls = backend.calls();

        let (result, output) = run(&config, backend).await;

        assert!(matches!(result, Err(SmokeError::InvalidToken { status: 400 })));
        assert_eq!(calls.paths(), vec![TOKENINFO_PATH]);
        assert!(output.is_empty(), "{output}");
    }

    #[tokio::test]
    async fn missing_host_fails_before_any_request() {
        let mut config = RunConfig::new("bpm.example.org").unwrap();
        config.host.clear();
        let backend = full_backend(HEALTHY_STATUS);
        let calls = backend.calls();

        let (result, _) = run(&config, backend).await;

        assert!(matches!(result, Err(SmokeError::MissingHost)));
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn failures_and_errors_do_not_stop_the_run() {
        let config = RunConfig::new("bpm.example.org")
            .unwrap()
            .with_token("ya29.token")
            .with_azure_subscription("sub-123");
        let backend = FakeBackend::new()
            .route(TOKENINFO_PATH, 200, "{}")
            .route(STATUS_PATH, 200, DEGRADED_STATUS)
            .route(MANAGED_APPS_PATH, 200, r#"{"managedApps": []}"#);

        let (result, output) = run(&config, backend).await;
        let report = result.unwrap();

        assert_eq!((report.passed, report.failed, report.errored), (2, 1, 1));
        assert!(output.starts_with(".FE.\n"), "{output}");
        assert!(output.contains("FAIL: status::subsystems"), "{output}");
        assert!(output.contains("cache is not OK"), "{output}");
        assert!(
            output.contains("ERROR: billing_profiles::retrieving_billing_profiles"),
            "{output}"
        );
        assert!(output.trim_end().ends_with("FAILED (failures=1, errors=1)"), "{output}");
    }

    #[tokio::test]
    async fn verbose_output_lists_each_case() {
        let target = Target::new("bpm.example.org").unwrap();
        let caller = HttpCaller::new(full_backend(HEALTHY_STATUS));
        let mut out = Vec::new();

        run_suite(
            &[SmokeCase::StatusCode, SmokeCase::Subsystems],
            &target,
            &caller,
            Verbosity::Verbose,
            &mut out,
        )
        .await
        .unwrap();

        let output = render(out);
        let expected = "status::status_code_is_200 (BPM status endpoint answers 200) ... ok (";
        assert!(output.contains(expected), "{output}");
        assert!(
            output.contains("status::subsystems (every BPM subsystem reports ok) ... ok ("),
            "{output}"
        );
    }

    #[tokio::test]
    async fn quiet_output_still_names_failures() {
        let target = Target::new("bpm.example.org").unwrap();
        let caller = HttpCaller::new(full_backend(DEGRADED_STATUS));
        let mut out = Vec::new();

        let report = run_suite(
            &[SmokeCase::StatusCode, SmokeCase::Subsystems],
            &target,
            &caller,
            Verbosity::Quiet,
            &mut out,
        )
        .await
        .unwrap();

        let output = render(out);
        assert_eq!(report.failed, 1);
        assert!(output.starts_with(SEPARATOR_HEAVY), "{output}");
        assert!(!output.contains(" ... "), "{output}");
        assert!(output.contains("FAIL: status::subsystems"), "{output}");
        assert!(output.contains("cache is not OK"), "{output}");
        assert!(output.trim_end().ends_with("FAILED (failures=1)"), "{output}");
    }
}
