//! Suite configuration: credentials and browser settings.
//!
//! Credentials only ever come from the environment (or the CLI flags backed by
//! it). Browser settings can additionally be loaded from a YAML file.

use crate::driver::{DriverConfig, DEFAULT_ELEMENT_TIMEOUT_MS, DEFAULT_NAVIGATION_TIMEOUT_MS};
use crate::result::{LoginE2eError, LoginE2eResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the account username
pub const USERNAME_ENV: &str = "LOGIN_E2E_USERNAME";

/// Environment variable holding the account password
pub const PASSWORD_ENV: &str = "LOGIN_E2E_PASSWORD";

/// Environment variable holding the application base URL
pub const BASE_URL_ENV: &str = "LOGIN_E2E_BASE_URL";

/// Account the happy-path scenarios sign in with
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate a username/password pair.
    ///
    /// Both must be present and non-empty; the error names the variable to set.
    pub fn new(username: Option<String>, password: Option<String>) -> LoginE2eResult<Self> {
        let username = username.filter(|u| !u.is_empty()).ok_or_else(|| {
            LoginE2eError::config(format!("Missing username value, set using {USERNAME_ENV}=..."))
        })?;
        let password = password.filter(|p| !p.is_empty()).ok_or_else(|| {
            LoginE2eError::config(format!("Missing password value, set using {PASSWORD_ENV}=..."))
        })?;
        Ok(Self { username, password })
    }

    /// Read credentials from `LOGIN_E2E_USERNAME` / `LOGIN_E2E_PASSWORD`
    pub fn from_env() -> LoginE2eResult<Self> {
        Self::new(env_var(USERNAME_ENV)?, env_var(PASSWORD_ENV)?)
    }

    /// Account username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

fn env_var(name: &str) -> LoginE2eResult<Option<String>> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(LoginE2eError::config(format!(
            "{name} must be a valid UTF-8 string"
        ))),
    }
}

/// Browser and application settings for a suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Origin the application is served from
    pub base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Chromium executable (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Keep the Chromium sandbox on (disable in containers)
    pub sandbox: bool,
    /// Element wait / assertion timeout
    pub element_timeout_ms: u64,
    /// Page load timeout
    pub navigation_timeout_ms: u64,
    /// Desktop viewport width
    pub viewport_width: u32,
    /// Desktop viewport height
    pub viewport_height: u32,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let driver = DriverConfig::default();
        Self {
            base_url: "http://localhost:3000".to_string(),
            headless: driver.headless,
            chromium_path: None,
            sandbox: driver.sandbox,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            viewport_width: driver.viewport_width,
            viewport_height: driver.viewport_height,
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document; omitted keys keep their defaults
    pub fn from_yaml(yaml: &str) -> LoginE2eResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML config file
    pub fn load(path: &Path) -> LoginE2eResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Set the application base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the element timeout
    #[must_use]
    pub const fn with_element_timeout_ms(mut self, ms: u64) -> Self {
        self.element_timeout_ms = ms;
        self
    }

    /// Check the settings can be used to drive a browser
    pub fn validate(&self) -> LoginE2eResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            LoginE2eError::config(format!("invalid base_url {:?}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LoginE2eError::config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(LoginE2eError::config("viewport dimensions must be non-zero"));
        }
        Ok(())
    }

    /// Element wait / assertion timeout
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    /// Driver settings derived from this config
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        let mut config = DriverConfig::new()
            .headless(self.headless)
            .viewport(self.viewport_width, self.viewport_height)
            .element_timeout(self.element_timeout())
            .navigation_timeout(Duration::from_millis(self.navigation_timeout_ms));
        if let Some(path) = &self.chromium_path {
            config = config.executable_path(path.as_str());
        }
        if !self.sandbox {
            config = config.no_sandbox();
        }
        config
    }
}
