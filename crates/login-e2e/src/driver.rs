//! Abstract browser driver.
//!
//! The page objects never talk to a browser directly. They drive a
//! [`BrowserDriver`], which is implemented by the Chromium CDP driver for real
//! runs and by [`crate::mock::SimulatedLoginApp`] for the crate's own tests.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌─────────────────────────┐
//! │  Scenario    │───►│  LoginPage   │───►│  BrowserDriver          │
//! │              │    │  (selectors) │    │  ├─ ChromiumDriver      │
//! │              │    │              │    │  └─ SimulatedLoginApp   │
//! └──────────────┘    └──────────────┘    └─────────────────────────┘
//! ```

use crate::result::LoginE2eResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cypress-compatible default for element waits
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 4_000;

/// Default page load timeout
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Snapshot of one DOM element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Selector the element was found with
    pub selector: String,
    /// Element tag name (lowercase)
    pub tag_name: String,
    /// Rendered text content
    pub text_content: Option<String>,
    /// Current `value` for form controls
    pub value: Option<String>,
    /// Whether the element is rendered with a non-empty box
    pub visible: bool,
    /// Whether the element would receive a click at its centre
    pub actionable: bool,
}

impl ElementHandle {
    /// Create a visible, actionable element handle
    #[must_use]
    pub fn new(selector: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag_name: tag_name.into(),
            text_content: None,
            value: None,
            visible: true,
            actionable: true,
        }
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Set the form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark the element hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self.actionable = false;
        self
    }

    /// Mark the element covered by another element
    #[must_use]
    pub const fn covered(mut self) -> Self {
        self.actionable = false;
        self
    }

    /// Text content, or an empty string
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().unwrap_or_default()
    }
}

/// Mobile or desktop device profile for viewport emulation
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    /// Device name, as Cypress spells it
    pub name: &'static str,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Device scale factor
    pub device_scale_factor: f64,
    /// Is mobile device
    pub is_mobile: bool,
    /// Has touch support
    pub has_touch: bool,
    /// Default user agent
    pub user_agent: &'static str,
}

impl DeviceDescriptor {
    /// iPhone 8 (Cypress `iphone-8` preset)
    pub const IPHONE_8: Self = Self {
        name: "iphone-8",
        viewport_width: 375,
        viewport_height: 667,
        device_scale_factor: 2.0,
        is_mobile: true,
        has_touch: true,
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 13_2_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.0.3 Mobile/15E148 Safari/604.1",
    };
}

/// Browser configuration for driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Timeout for element queries and assertions
    pub element_timeout: Duration,
    /// Executable path override
    pub executable_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            element_timeout: Duration::from_millis(DEFAULT_ELEMENT_TIMEOUT_MS),
            executable_path: None,
            sandbox: true,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Navigation timeout in whole milliseconds, saturating
    #[must_use]
    pub fn navigation_timeout_ms(&self) -> u64 {
        u64::try_from(self.navigation_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Set element timeout
    #[must_use]
    pub const fn element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    /// Set chromium executable
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// One browser session the suite can drive.
///
/// All methods take `&self`; a session is exclusively owned by the scenario
/// currently running, which awaits every command before issuing the next.
/// Interaction methods (`click`, `clear`, `type_text`) fail with
/// `NotActionable` when the element is hidden or covered, and with
/// `ElementNotFound` when nothing matches.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to an application path or absolute URL
    async fn navigate(&self, url: &str) -> LoginE2eResult<()>;

    /// Absolute URL of the current page
    async fn current_url(&self) -> LoginE2eResult<String>;

    /// Query the first element matching `selector`
    async fn query_selector(&self, selector: &str) -> LoginE2eResult<Option<ElementHandle>>;

    /// Click the element
    async fn click(&self, selector: &str) -> LoginE2eResult<()>;

    /// Clear a form control's value
    async fn clear(&self, selector: &str) -> LoginE2eResult<()>;

    /// Type text into the element, appending to its current value
    async fn type_text(&self, selector: &str, text: &str) -> LoginE2eResult<()>;

    /// Emulate a device viewport
    async fn set_viewport(&self, device: &DeviceDescriptor) -> LoginE2eResult<()>;

    /// Close the session
    async fn close(&self) -> LoginE2eResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let elem = ElementHandle::new("#btn", "button");
            assert_eq!(elem.selector, "#btn");
            assert_eq!(elem.tag_name, "button");
            assert!(elem.visible);
            assert!(elem.actionable);
            assert_eq!(elem.text(), "");
        }

        #[test]
        fn test_hidden_is_not_actionable() {
            let elem = ElementHandle::new("#x", "div").hidden();
            assert!(!elem.visible);
            assert!(!elem.actionable);
        }

        #[test]
        fn test_covered_stays_visible() {
            let elem = ElementHandle::new("#x", "input").covered();
            assert!(elem.visible);
            assert!(!elem.actionable);
        }

        #[test]
        fn test_with_text_and_value() {
            let elem = ElementHandle::new("#x", "input")
                .with_text("hello")
                .with_value("secret");
            assert_eq!(elem.text(), "hello");
            assert_eq!(elem.value.as_deref(), Some("secret"));
        }
    }

    mod device_descriptor_tests {
        use super::*;

        #[test]
        fn test_iphone_8() {
            let device = DeviceDescriptor::IPHONE_8;
            assert_eq!(device.viewport_width, 375);
            assert_eq!(device.viewport_height, 667);
            assert!(device.is_mobile);
            assert!(device.has_touch);
        }

        #[test]
        fn test_iphone_8_is_retina() {
            assert_eq!(DeviceDescriptor::IPHONE_8.name, "iphone-8");
            assert!((DeviceDescriptor::IPHONE_8.device_scale_factor - 2.0).abs() < f64::EPSILON);
        }
    }

    mod driver_config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = DriverConfig::default();
            assert!(config.headless);
            assert!(config.sandbox);
            assert_eq!(config.element_timeout, Duration::from_millis(4_000));
            assert_eq!(config.navigation_timeout, Duration::from_secs(30));
        }

        #[test]
        fn test_config_builder() {
            let config = DriverConfig::new()
                .headless(false)
                .viewport(800, 600)
                .element_timeout(Duration::from_millis(250))
                .executable_path("/usr/bin/chromium")
                .no_sandbox();

            assert!(!config.headless);
            assert!(!config.sandbox);
            assert_eq!(config.viewport_width, 800);
            assert_eq!(config.viewport_height, 600);
            assert_eq!(config.element_timeout, Duration::from_millis(250));
            assert_eq!(config.executable_path.as_deref(), Some("/usr/bin/chromium"));
        }

        #[test]
        fn test_navigation_timeout_ms_saturates() {
            assert_eq!(DriverConfig::default().navigation_timeout_ms(), 30_000);
            let config = DriverConfig::new().navigation_timeout(Duration::MAX);
            assert_eq!(config.navigation_timeout_ms(), u64::MAX);
        }
    }
}
