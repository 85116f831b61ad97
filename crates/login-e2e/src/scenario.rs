//! Login test scenarios and the runner that executes them.
//!
//! Every scenario gets a fresh browser session from a [`SessionFactory`],
//! starts on the login route and drives a [`LoginPage`] through its steps.
//! Credentials are a validated [`Credentials`] value, so a runner cannot be
//! built at all when they are missing.

use crate::command::login;
use crate::config::Credentials;
use crate::driver::{BrowserDriver, DeviceDescriptor, DEFAULT_ELEMENT_TIMEOUT_MS};
use crate::page_object::LoginPage;
use crate::reporter::{FailureMode, ScenarioOutcome, SuiteReport};
use crate::result::{LoginE2eError, LoginE2eResult};
use crate::selectors::{routes, Element};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Username no account is registered under
pub const INVALID_USERNAME: &str = "invalidUsername";

/// Password no account uses
pub const INVALID_PASSWORD: &str = "invalidPassword";

/// Device the mobile scenario emulates
pub const MOBILE_DEVICE: DeviceDescriptor = DeviceDescriptor::IPHONE_8;

/// Source of isolated browser sessions, one per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Session type handed to scenarios
    type Session: BrowserDriver;

    /// Open a new session
    async fn open(&self) -> LoginE2eResult<Self::Session>;
}

/// The login scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Desktop happy path with password reveal, profile and logout checks
    SuccessfulLogin,
    /// Wrong password, wrong username and both wrong
    InvalidCredentials,
    /// Happy path on a mobile viewport
    SuccessfulMobileLogin,
    /// Login attempt while the cookie banner still covers the form
    CookieBannerBlocksLogin,
}

impl Scenario {
    /// Every scenario, in execution order
    pub const ALL: [Self; 4] = [
        Self::SuccessfulLogin,
        Self::InvalidCredentials,
        Self::SuccessfulMobileLogin,
        Self::CookieBannerBlocksLogin,
    ];

    /// Stable identifier used for filtering and reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SuccessfulLogin => "successful_login",
            Self::InvalidCredentials => "invalid_credentials",
            Self::SuccessfulMobileLogin => "successful_mobile_login",
            Self::CookieBannerBlocksLogin => "cookie_banner_blocks_login",
        }
    }

    /// What the scenario exercises
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SuccessfulLogin => "Try a successful login",
            Self::InvalidCredentials => "Try to login with an invalid username and/or password",
            Self::SuccessfulMobileLogin => "Try a successful login on a mobile device",
            Self::CookieBannerBlocksLogin => {
                "Try to click the login button without accepting the cookies banner"
            }
        }
    }

    /// Run the scenario on a page already showing the login route
    pub async fn run<D: BrowserDriver + ?Sized>(
        self,
        page: &LoginPage<'_, D>,
        credentials: &Credentials,
    ) -> LoginE2eResult<()> {
        match self {
            Self::SuccessfulLogin => successful_login(page, credentials).await,
            Self::InvalidCredentials => invalid_credentials(page, credentials).await,
            Self::SuccessfulMobileLogin => successful_mobile_login(page, credentials).await,
            Self::CookieBannerBlocksLogin => cookie_banner_blocks_login(page, credentials).await,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

async fn successful_login<D: BrowserDriver + ?Sized>(
    page: &LoginPage<'_, D>,
    credentials: &Credentials,
) -> LoginE2eResult<()> {
    page.accept_cookies()
        .await?
        .enter_username(credentials.username())
        .await?
        .enter_password(credentials.password())
        .await?;

    page.click_password_reveal_button().await?;
    page.assert_password_is_displayed(credentials.password())
        .await?;

    page.submit().await?;
    assert_signed_in_then_logout(page, credentials).await
}

async fn invalid_credentials<D: BrowserDriver + ?Sized>(
    page: &LoginPage<'_, D>,
    credentials: &Credentials,
) -> LoginE2eResult<()> {
    page.accept_cookies().await?;

    let attempts = [
        (credentials.username(), INVALID_PASSWORD),
        (INVALID_USERNAME, credentials.password()),
        (INVALID_USERNAME, INVALID_PASSWORD),
    ];
    for (username, password) in attempts {
        login(page, username, password).await?;
        page.assert_error_message_is_displayed().await?;
        page.assert_url_includes(routes::LOGIN).await?;
    }
    Ok(())
}

async fn successful_mobile_login<D: BrowserDriver + ?Sized>(
    page: &LoginPage<'_, D>,
    credentials: &Credentials,
) -> LoginE2eResult<()> {
    page.driver().set_viewport(&MOBILE_DEVICE).await?;
    page.accept_cookies().await?;
    login(page, credentials.username(), credentials.password()).await?;
    assert_signed_in_then_logout(page, credentials).await
}

async fn cookie_banner_blocks_login<D: BrowserDriver + ?Sized>(
    page: &LoginPage<'_, D>,
    credentials: &Credentials,
) -> LoginE2eResult<()> {
    page.assert_visible(Element::AcceptCookiesButton).await?;
    let attempt = page
        .attempt_login_behind_cookie_banner(credentials.username(), credentials.password())
        .await?;
    if !attempt.is_blocked() {
        return Err(LoginE2eError::assertion(
            "login form accepted input while the cookie banner was displayed",
        ));
    }
    page.assert_url_includes(routes::LOGIN).await
}

/// Redirect, profile and logout checks shared by the happy paths
async fn assert_signed_in_then_logout<D: BrowserDriver + ?Sized>(
    page: &LoginPage<'_, D>,
    credentials: &Credentials,
) -> LoginE2eResult<()> {
    let username = credentials.username();
    page.assert_url_is(routes::HOME).await?;

    page.visit_profile(username).await?;
    page.assert_url_includes(username).await?;
    page.assert_username_is_displayed(username).await?;
    page.assert_empty_message_state_is_displayed().await?;

    page.logout().await?;
    page.assert_url_includes(routes::LOGIN).await
}

/// Runs scenarios sequentially, one fresh session each
#[derive(Debug)]
pub struct SuiteRunner<F: SessionFactory> {
    factory: F,
    credentials: Credentials,
    element_timeout: Duration,
    scenarios: Vec<Scenario>,
    failure_mode: FailureMode,
}

impl<F: SessionFactory> SuiteRunner<F> {
    /// Runner for all scenarios
    pub fn new(factory: F, credentials: Credentials) -> Self {
        Self {
            factory,
            credentials,
            element_timeout: Duration::from_millis(DEFAULT_ELEMENT_TIMEOUT_MS),
            scenarios: Scenario::ALL.to_vec(),
            failure_mode: FailureMode::default(),
        }
    }

    /// Runner whose credentials come from the environment
    pub fn from_env(factory: F) -> LoginE2eResult<Self> {
        Ok(Self::new(factory, Credentials::from_env()?))
    }

    /// Set the element wait / assertion timeout
    #[must_use]
    pub const fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Keep only scenarios whose name contains `pattern`
    pub fn with_filter(mut self, pattern: &str) -> LoginE2eResult<Self> {
        self.scenarios.retain(|s| s.name().contains(pattern));
        if self.scenarios.is_empty() {
            return Err(LoginE2eError::config(format!(
                "no scenario matches {pattern:?}"
            )));
        }
        Ok(self)
    }

    /// Scenarios this runner will execute
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Give back the session factory, e.g. to shut the browser down
    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Run every selected scenario and collect the outcomes
    pub async fn run(&self) -> SuiteReport {
        let mut report = SuiteReport::new();
        let mut stopped = false;

        for &scenario in &self.scenarios {
            if stopped {
                report.push(ScenarioOutcome::skipped(scenario.name()));
                continue;
            }

            info!(%scenario, "{}", scenario.description());
            let start = Instant::now();
            let result = self.run_one(scenario).await;
            let duration = start.elapsed();

            match result {
                Ok(()) => {
                    info!(%scenario, ?duration, "passed");
                    report.push(ScenarioOutcome::passed(scenario.name(), duration));
                }
                Err(e) => {
                    error!(%scenario, ?duration, error = %e, "failed");
                    report.push(ScenarioOutcome::failed(
                        scenario.name(),
                        duration,
                        e.to_string(),
                    ));
                    stopped = self.failure_mode == FailureMode::FailFast;
                }
            }
        }
        report
    }

    async fn run_one(&self, scenario: Scenario) -> LoginE2eResult<()> {
        let session = self.factory.open().await?;
        let result = async {
            let page = LoginPage::new(&session, self.element_timeout);
            page.visit_login().await?;
            scenario.run(&page, &self.credentials).await
        }
        .await;

        if let Err(e) = session.close().await {
            warn!(%scenario, error = %e, "failed to close browser session");
        }
        result
    }
}
