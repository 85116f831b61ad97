//! Page Object Model for the login workflow.
//!
//! [`LoginPage`] wraps the selector registry with one method per user action
//! or assertion. It holds nothing but a borrowed browser session, so a fresh
//! page object can be created per scenario at no cost. Action methods return
//! `&Self` so calls chain:
//!
//! ```ignore
//! let page = LoginPage::new(&session, config.element_timeout);
//! page.visit_login().await?;
//! page.accept_cookies()
//!     .await?
//!     .enter_username("jane")
//!     .await?
//!     .enter_password("s3cret")
//!     .await?
//!     .submit()
//!     .await?;
//! page.assert_url_is(routes::HOME).await?;
//! ```

use crate::driver::{BrowserDriver, ElementHandle};
use crate::result::{LoginE2eError, LoginE2eResult};
use crate::selectors::{messages, routes, Element};
use crate::wait::{retry_assertion, retry_interaction, wait_for, WaitOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A page or component of the application under test
pub trait PageObject {
    /// Route this page lives at
    fn url_pattern(&self) -> &str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Step of the login sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStep {
    /// Typing the username
    EnterUsername,
    /// Typing the password
    EnterPassword,
    /// Clicking the login button
    Submit,
}

impl std::fmt::Display for LoginStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::EnterUsername => "enter username",
            Self::EnterPassword => "enter password",
            Self::Submit => "submit",
        })
    }
}

/// Outcome of a login attempt that is allowed to be obstructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginAttempt {
    /// All three steps went through
    Completed,
    /// The page refused an interaction
    Blocked {
        /// Step that could not be performed
        step: LoginStep,
        /// Error reported by the driver
        reason: String,
    },
}

impl LoginAttempt {
    /// Whether the page refused the attempt
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Login screen page object, bound to one browser session
#[derive(Debug)]
pub struct LoginPage<'a, D: BrowserDriver + ?Sized> {
    driver: &'a D,
    wait: WaitOptions,
}

impl<D: BrowserDriver + ?Sized> PageObject for LoginPage<'_, D> {
    fn url_pattern(&self) -> &str {
        routes::LOGIN
    }

    fn page_name(&self) -> &str {
        "login page"
    }
}

impl<'a, D: BrowserDriver + ?Sized> LoginPage<'a, D> {
    /// Bind a page object to `driver`; waits and assertions give up after `timeout`
    pub fn new(driver: &'a D, timeout: Duration) -> Self {
        Self {
            driver,
            wait: WaitOptions::new(timeout),
        }
    }

    /// Override the polling options
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Session this page object drives
    pub const fn driver(&self) -> &'a D {
        self.driver
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Open the login route
    pub async fn visit_login(&self) -> LoginE2eResult<&Self> {
        self.driver.navigate(self.url_pattern()).await?;
        Ok(self)
    }

    /// Open `username`'s profile page
    pub async fn visit_profile(&self, username: &str) -> LoginE2eResult<&Self> {
        self.driver.navigate(&routes::profile(username)).await?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Dismiss the cookie banner shown on every new session
    pub async fn accept_cookies(&self) -> LoginE2eResult<&Self> {
        self.wait_visible(Element::AcceptCookiesButton).await?;
        self.click(Element::AcceptCookiesButton).await?;
        Ok(self)
    }

    /// Replace the username field's content with `username`
    pub async fn enter_username(&self, username: &str) -> LoginE2eResult<&Self> {
        self.fill(Element::UsernameInput, username).await?;
        Ok(self)
    }

    /// Replace the password field's content with `password`
    pub async fn enter_password(&self, password: &str) -> LoginE2eResult<&Self> {
        self.fill(Element::PasswordInput, password).await?;
        Ok(self)
    }

    /// Toggle the show/hide control inside the password input
    pub async fn click_password_reveal_button(&self) -> LoginE2eResult<&Self> {
        self.click(Element::PasswordRevealButton).await?;
        Ok(self)
    }

    /// Click the login button. The outcome is left to the caller to assert.
    pub async fn submit(&self) -> LoginE2eResult<&Self> {
        self.click(Element::SubmitButton).await?;
        Ok(self)
    }

    /// Open the avatar menu and click its logout entry
    pub async fn logout(&self) -> LoginE2eResult<&Self> {
        self.click(Element::UserAvatar).await?;
        self.click(Element::LogoutButton).await?;
        Ok(self)
    }

    /// Try the three login steps while the cookie banner may still cover the
    /// form. A target that stays covered or hidden until the timeout ends the
    /// attempt and is reported as [`LoginAttempt::Blocked`]. Any other error,
    /// including a form field that never renders, still propagates.
    pub async fn attempt_login_behind_cookie_banner(
        &self,
        username: &str,
        password: &str,
    ) -> LoginE2eResult<LoginAttempt> {
        let attempt = async {
            self.enter_username(username)
                .await
                .map_err(|e| (LoginStep::EnterUsername, e))?;
            self.enter_password(password)
                .await
                .map_err(|e| (LoginStep::EnterPassword, e))?;
            self.submit().await.map_err(|e| (LoginStep::Submit, e))?;
            Ok::<(), (LoginStep, LoginE2eError)>(())
        }
        .await;

        match attempt {
            Ok(()) => Ok(LoginAttempt::Completed),
            Err((step, e @ LoginE2eError::NotActionable { .. })) => {
                warn!(%step, error = %e, "failed to interact with login form");
                Ok(LoginAttempt::Blocked {
                    step,
                    reason: e.to_string(),
                })
            }
            Err((_, e)) => Err(e),
        }
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Assert the password input renders as plain text holding `expected`
    pub async fn assert_password_is_displayed(&self, expected: &str) -> LoginE2eResult<()> {
        let selector = Element::RevealedPasswordInput.selector();
        retry_assertion(self.wait, || async move {
            Ok(match self.driver.query_selector(selector).await? {
                None => Err("password input is still masked".to_string()),
                Some(el) if el.value.as_deref() == Some(expected) => Ok(()),
                Some(el) => Err(format!(
                    "revealed password is {:?}, expected {expected:?}",
                    el.value.unwrap_or_default()
                )),
            })
        })
        .await
    }

    /// Assert the profile page shows `username`
    pub async fn assert_username_is_displayed(&self, username: &str) -> LoginE2eResult<()> {
        self.assert_contains_text(Element::ProfileUsername, username)
            .await
    }

    /// Assert the "no data yet" indicator is visible
    pub async fn assert_empty_message_state_is_displayed(&self) -> LoginE2eResult<()> {
        self.assert_visible(Element::EmptyMessageState).await
    }

    /// Assert the login error banner carries the rejected-credentials copy
    pub async fn assert_error_message_is_displayed(&self) -> LoginE2eResult<()> {
        self.assert_contains_text(Element::ErrorBanner, messages::INCORRECT_CREDENTIALS)
            .await
    }

    /// Assert the current URL path equals `path`
    pub async fn assert_url_is(&self, path: &str) -> LoginE2eResult<()> {
        retry_assertion(self.wait, || async move {
            let url = self.driver.current_url().await?;
            Ok(if url_path(&url) == path {
                Ok(())
            } else {
                Err(format!("expected URL path {path:?}, got {url}"))
            })
        })
        .await
    }

    /// Assert the current URL contains `fragment`
    pub async fn assert_url_includes(&self, fragment: &str) -> LoginE2eResult<()> {
        retry_assertion(self.wait, || async move {
            let url = self.driver.current_url().await?;
            Ok(if url.contains(fragment) {
                Ok(())
            } else {
                Err(format!("expected URL to include {fragment:?}, got {url}"))
            })
        })
        .await
    }

    /// Assert `element` is rendered
    pub async fn assert_visible(&self, element: Element) -> LoginE2eResult<()> {
        retry_assertion(self.wait, || async move {
            Ok(match self.driver.query_selector(element.selector()).await? {
                Some(el) if el.visible => Ok(()),
                Some(_) => Err(format!("{element} exists but is not visible")),
                None => Err(format!("{element} not found")),
            })
        })
        .await
    }

    /// Assert `element`'s text contains `expected`
    pub async fn assert_contains_text(&self, element: Element, expected: &str) -> LoginE2eResult<()> {
        retry_assertion(self.wait, || async move {
            Ok(match self.driver.query_selector(element.selector()).await? {
                Some(el) if el.text().contains(expected) => Ok(()),
                Some(el) => Err(format!(
                    "{element} text {:?} does not contain {expected:?}",
                    el.text()
                )),
                None => Err(format!("{element} not found")),
            })
        })
        .await
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn wait_visible(&self, element: Element) -> LoginE2eResult<ElementHandle> {
        wait_for(self.wait, element.name(), || async move {
            Ok(self
                .driver
                .query_selector(element.selector())
                .await?
                .filter(|el| el.visible))
        })
        .await
    }

    async fn click(&self, element: Element) -> LoginE2eResult<()> {
        debug!(%element, "click");
        let selector = element.selector();
        retry_interaction(self.wait, || self.driver.click(selector)).await
    }

    async fn fill(&self, element: Element, value: &str) -> LoginE2eResult<()> {
        debug!(%element, len = value.len(), "fill");
        let selector = element.selector();
        retry_interaction(self.wait, || self.driver.clear(selector)).await?;
        retry_interaction(self.wait, || self.driver.type_text(selector, value)).await
    }
}

/// Path component of `url`; relative inputs are returned unchanged
fn url_path(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string())
}
