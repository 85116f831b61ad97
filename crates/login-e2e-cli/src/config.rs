//! CLI configuration
//!
//! Settings are layered: built-in defaults, then the YAML file given with
//! `--config`, then individual flags (or their environment variables).

use crate::commands::{Cli, ColorArg, FormatArg};
use crate::error::{CliError, CliResult};
use login_e2e::{FailureMode, SuiteConfig};
use serde::{Deserialize, Serialize};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - warnings and errors only
    Quiet,
    /// Normal - scenario progress
    #[default]
    Normal,
    /// Verbose - every driver command
    Verbose,
    /// Debug - everything, including dependencies
    Debug,
}

impl Verbosity {
    /// Derive from `-q` / `-v` counts
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "login_e2e=warn,login_e2e_cli=warn",
            Self::Normal => "login_e2e=info,login_e2e_cli=info",
            Self::Verbose => "login_e2e=debug,login_e2e_cli=debug",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// How the CLI itself behaves, as opposed to the browser settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Report format
    pub format: FormatArg,
    /// Stop on the first failure
    pub failure_mode: FailureMode,
    /// Scenario name filter
    pub filter: Option<String>,
}

impl CliConfig {
    /// Build from parsed arguments
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.into(),
            format: cli.format,
            failure_mode: if cli.fail_fast {
                FailureMode::FailFast
            } else {
                FailureMode::CollectAll
            },
            filter: cli.filter.clone(),
        }
    }
}

/// Resolve browser settings: defaults, then `--config`, then flags
pub fn resolve_suite_config(cli: &Cli) -> CliResult<SuiteConfig> {
    let mut config = match &cli.config {
        Some(path) => SuiteConfig::load(path).map_err(|e| {
            CliError::config(format!("failed to load {}: {e}", path.display()))
        })?,
        None => SuiteConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(headless) = cli.headless_override() {
        config.headless = headless;
    }
    if let Some(path) = &cli.chromium_path {
        config.chromium_path = Some(path.display().to_string());
    }
    if cli.no_sandbox {
        config.sandbox = false;
    }
    if let Some(ms) = cli.timeout_ms {
        if ms == 0 {
            return Err(CliError::invalid_argument("--timeout-ms must be positive"));
        }
        config.element_timeout_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("login-e2e").chain(args.iter().copied())).unwrap()
    }

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 0), Verbosity::Quiet);
        }

        #[test]
        fn test_filter_directive() {
            assert!(Verbosity::Normal.filter_directive().contains("login_e2e=info"));
            assert!(Verbosity::Verbose.filter_directive().contains("login_e2e=debug"));
            assert!(Verbosity::Quiet.filter_directive().contains("login_e2e=warn"));
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }

        #[test]
        fn test_from_arg() {
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        }
    }

    mod cli_config_tests {
        use super::*;

        #[test]
        fn test_fail_fast_maps_to_failure_mode() {
            let config = CliConfig::from_cli(&parse(&["--fail-fast"]));
            assert_eq!(config.failure_mode, FailureMode::FailFast);
            let config = CliConfig::from_cli(&parse(&[]));
            assert_eq!(config.failure_mode, FailureMode::CollectAll);
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_flags_override_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "base_url: http://staging.test\nheadless: true\nelement_timeout_ms: 9000"
            )
            .unwrap();
            let path = file.path().to_str().unwrap();

            let config = resolve_suite_config(&parse(&["--config", path])).unwrap();
            assert_eq!(config.element_timeout_ms, 9000);
            assert!(config.headless);

            let config = resolve_suite_config(&parse(&[
                "--config",
                path,
                "--headed",
                "--timeout-ms",
                "100",
                "--base-url",
                "https://prod.test",
                "--no-sandbox",
            ]))
            .unwrap();
            assert!(!config.headless);
            assert_eq!(config.element_timeout_ms, 100);
            assert_eq!(config.base_url, "https://prod.test");
            assert!(!config.sandbox);
        }

        #[test]
        fn test_zero_timeout_rejected() {
            let err = resolve_suite_config(&parse(&["--timeout-ms", "0"])).unwrap_err();
            assert!(matches!(err, CliError::InvalidArgument { .. }));
        }

        #[test]
        fn test_bad_base_url_rejected() {
            let err = resolve_suite_config(&parse(&["--base-url", "ftp://x"])).unwrap_err();
            assert!(err.to_string().contains("http or https"));
        }

        #[test]
        fn test_missing_file() {
            let err =
                resolve_suite_config(&parse(&["--config", "/nonexistent/login-e2e.yaml"]))
                    .unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }
    }
}
