//! login-e2e: end-to-end browser suite for a login workflow
//!
//! A page-object layer over the application's `data-testid` selectors, a
//! login shortcut command, and four scenarios that drive a real browser (or the
//! in-memory [`SimulatedLoginApp`]) and assert on URLs, text and error banners.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ Scenario   │    │ LoginPage  │    │ BrowserDriver      │    │
//! │   │ + login()  │───►│ selectors  │───►│ Chromium (CDP) or  │    │
//! │   │            │    │            │    │ SimulatedLoginApp  │    │
//! │   └────────────┘    └────────────┘    └────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! let launcher = ChromiumLauncher::launch(config.driver_config(), &config.base_url).await?;
//! let report = SuiteRunner::from_env(launcher)?.run().await;
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod browser;
pub mod command;
pub mod config;
mod driver;
pub mod mock;
mod page_object;
mod reporter;
mod result;
pub mod scenario;
pub mod selectors;
mod wait;

#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumLauncher};
pub use command::login;
pub use config::{Credentials, SuiteConfig};
pub use driver::{
    BrowserDriver, DeviceDescriptor, DriverConfig, ElementHandle, DEFAULT_ELEMENT_TIMEOUT_MS,
    DEFAULT_NAVIGATION_TIMEOUT_MS,
};
pub use mock::{AppBehavior, SimulatedLoginApp, SimulatedSession};
pub use page_object::{LoginAttempt, LoginPage, LoginStep, PageObject};
pub use reporter::{FailureMode, ScenarioOutcome, ScenarioStatus, SuiteReport};
pub use result::{LoginE2eError, LoginE2eResult};
pub use scenario::{Scenario, SessionFactory, SuiteRunner};
pub use selectors::{messages, routes, Element};
pub use wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        login, messages, routes, BrowserDriver, Credentials, DeviceDescriptor, Element,
        FailureMode, LoginAttempt, LoginE2eError, LoginE2eResult, LoginPage, PageObject, Scenario,
        SessionFactory, SimulatedLoginApp, SuiteConfig, SuiteReport, SuiteRunner,
    };
    #[cfg(feature = "browser")]
    pub use super::{ChromiumDriver, ChromiumLauncher};
}
