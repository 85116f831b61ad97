//! login-e2e: run the login browser suite from the command line
//!
//! ## Usage
//!
//! ```bash
//! LOGIN_E2E_USERNAME=jane LOGIN_E2E_PASSWORD=... login-e2e --base-url http://localhost:3000
//! login-e2e --list                          # Show scenarios
//! login-e2e --filter mobile --headed        # One scenario, visible browser
//! login-e2e --config ci.yaml --format json  # Machine-readable report
//! ```

use clap::Parser;
use login_e2e::{Credentials, Scenario, SuiteConfig, SuiteReport};
use login_e2e_cli::{
    resolve_suite_config, Cli, CliConfig, CliError, CliResult, ReportRenderer,
};
use std::process::ExitCode;
use tracing::warn;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    init_tracing(&config);

    let renderer = ReportRenderer::new(config.format, config.color.should_color());

    if cli.list {
        print!("{}", renderer.render_list(config.filter.as_deref())?);
        return Ok(true);
    }

    // Abort before any browser work when the account is not configured
    let credentials = Credentials::new(cli.username.clone(), cli.password.clone())?;
    let suite = resolve_suite_config(&cli)?;
    if let Some(filter) = &config.filter {
        if !Scenario::ALL.iter().any(|s| s.name().contains(filter.as_str())) {
            return Err(CliError::invalid_argument(format!(
                "no scenario matches {filter:?} (see --list)"
            )));
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(run_suite(&config, &suite, credentials))?;

    print!("{}", renderer.render(&report)?);
    Ok(report.is_success())
}

fn init_tracing(config: &CliConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.verbosity.filter_directive().into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .init();
}

#[cfg(feature = "browser")]
async fn run_suite(
    config: &CliConfig,
    suite: &SuiteConfig,
    credentials: Credentials,
) -> CliResult<SuiteReport> {
    use login_e2e::{ChromiumLauncher, SuiteRunner};
    use tracing::info;

    info!(base_url = %suite.base_url, headless = suite.headless, "launching Chromium");
    let launcher = ChromiumLauncher::launch(suite.driver_config(), &suite.base_url).await?;

    let mut runner = SuiteRunner::new(launcher, credentials)
        .with_element_timeout(suite.element_timeout())
        .with_failure_mode(config.failure_mode);
    if let Some(filter) = &config.filter {
        runner = runner.with_filter(filter)?;
    }

    let report = runner.run().await;
    info!(summary = %report.summary(), "suite finished");

    if let Err(e) = runner.into_factory().close().await {
        warn!(error = %e, "failed to close Chromium");
    }
    Ok(report)
}

#[cfg(not(feature = "browser"))]
async fn run_suite(
    _config: &CliConfig,
    _suite: &SuiteConfig,
    _credentials: Credentials,
) -> CliResult<SuiteReport> {
    warn!("built without a browser driver");
    Err(CliError::config(
        "browser support not enabled. Rebuild with --features browser",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_error_maps_to_cli_error() {
        let err: CliError = Credentials::new(Some("u".into()), None).unwrap_err().into();
        assert!(err.to_string().contains("Missing password value"));
    }
}
