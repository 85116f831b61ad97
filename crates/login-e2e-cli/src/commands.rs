//! CLI definition using clap

use clap::{ArgAction, Parser, ValueEnum};
use login_e2e::config::{BASE_URL_ENV, PASSWORD_ENV, USERNAME_ENV};
use std::path::PathBuf;

/// Run the login end-to-end browser suite against a deployed application
#[derive(Parser, Debug)]
#[command(name = "login-e2e")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Application base URL (overrides the config file)
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    /// Account username for the happy-path scenarios
    #[arg(long, env = USERNAME_ENV)]
    pub username: Option<String>,

    /// Account password for the happy-path scenarios. Prefer setting
    /// LOGIN_E2E_PASSWORD: a value passed here is visible in process listings
    #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// YAML file with browser settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, overrides_with = "headed")]
    pub headless: bool,

    /// Show the browser window
    #[arg(long, overrides_with = "headless")]
    pub headed: bool,

    /// Chromium executable (auto-detected when omitted)
    #[arg(long, value_name = "PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Disable the Chromium sandbox (needed in most containers)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Element wait and assertion timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Only run scenarios whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop at the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// List scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorArg,
}

impl Cli {
    /// Headless override from `--headless` / `--headed`, if either was given
    #[must_use]
    pub const fn headless_override(&self) -> Option<bool> {
        if self.headless {
            Some(true)
        } else if self.headed {
            Some(false)
        } else {
            None
        }
    }
}

/// Report format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("login-e2e").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--username", "u", "--password", "p"]);
        assert_eq!(cli.format, FormatArg::Text);
        assert_eq!(cli.color, ColorArg::Auto);
        assert!(!cli.fail_fast);
        assert!(!cli.list);
        assert_eq!(cli.headless_override(), None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_headless_flags_last_one_wins() {
        assert_eq!(parse(&["--headed"]).headless_override(), Some(false));
        assert_eq!(parse(&["--headless"]).headless_override(), Some(true));
        assert_eq!(
            parse(&["--headless", "--headed"]).headless_override(),
            Some(false)
        );
    }

    #[test]
    fn test_run_flags() {
        let cli = parse(&[
            "--filter",
            "mobile",
            "--fail-fast",
            "--format",
            "json",
            "--timeout-ms",
            "250",
            "--no-sandbox",
            "-vv",
        ]);
        assert_eq!(cli.filter.as_deref(), Some("mobile"));
        assert!(cli.fail_fast);
        assert_eq!(cli.format, FormatArg::Json);
        assert_eq!(cli.timeout_ms, Some(250));
        assert!(cli.no_sandbox);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["login-e2e", "-q", "-v"]);
        assert!(result.is_err());
    }
}
