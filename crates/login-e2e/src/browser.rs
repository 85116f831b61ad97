//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! [`ChromiumLauncher`] owns one Chromium process and hands out
//! [`ChromiumDriver`] sessions, each in its own browser context so cookies
//! (and with them the consent banner) never leak between scenarios.
//!
//! Before every click or keystroke the driver checks that the target is
//! visible and is the topmost element at its centre point, so an overlay
//! such as the cookie banner surfaces as `NotActionable` instead of the click
//! silently landing on the overlay.

use crate::driver::{BrowserDriver, DeviceDescriptor, DriverConfig, ElementHandle};
use crate::result::{LoginE2eError, LoginE2eResult};
use crate::scenario::SessionFactory;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetTouchEmulationEnabledParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

fn page_error(e: impl std::fmt::Display) -> LoginE2eError {
    LoginE2eError::PageError {
        message: e.to_string(),
    }
}

fn input_error(e: impl std::fmt::Display) -> LoginE2eError {
    LoginE2eError::InputError {
        message: e.to_string(),
    }
}

/// Running Chromium instance
#[derive(Debug)]
pub struct ChromiumLauncher {
    config: DriverConfig,
    base_url: Url,
    inner: Arc<Mutex<CdpBrowser>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ChromiumLauncher {
    /// Launch Chromium; relative navigations resolve against `base_url`
    pub async fn launch(config: DriverConfig, base_url: &str) -> LoginE2eResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LoginE2eError::config(format!("invalid base URL {base_url:?}: {e}")))?;

        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.navigation_timeout);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| LoginE2eError::BrowserLaunchError { message })?;

        let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
            LoginE2eError::BrowserLaunchError {
                message: e.to_string(),
            }
        })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            config,
            base_url,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Get the driver configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Close the browser
    pub async fn close(self) -> LoginE2eResult<()> {
        let mut browser = self.inner.lock().await;
        browser.close().await.map_err(page_error)?;
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "failed to reap Chromium process");
        }
        drop(browser);
        self.handle.abort();
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for ChromiumLauncher {
    type Session = ChromiumDriver;

    async fn open(&self) -> LoginE2eResult<ChromiumDriver> {
        let mut browser = self.inner.lock().await;
        let context = browser
            .create_browser_context(CreateBrowserContextParams::default())
            .await
            .map_err(page_error)?;
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context.clone())
            .build()
            .map_err(page_error)?;
        let page = browser.new_page(target).await.map_err(page_error)?;
        debug!(context = ?context, "opened browser session");

        Ok(ChromiumDriver {
            page,
            context,
            browser: Arc::clone(&self.inner),
            base_url: self.base_url.clone(),
            config: self.config.clone(),
        })
    }
}

/// One isolated Chromium tab
#[derive(Debug)]
pub struct ChromiumDriver {
    page: CdpPage,
    context: BrowserContextId,
    browser: Arc<Mutex<CdpBrowser>>,
    base_url: Url,
    config: DriverConfig,
}

/// Element snapshot taken in the page, serialised as JSON
const LOOKUP_SCRIPT: &str = r"(sel) => {
    const el = document.querySelector(sel);
    if (!el) return JSON.stringify(null);
    const style = window.getComputedStyle(el);
    let rect = el.getBoundingClientRect();
    const visible = rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
    let actionable = false;
    if (visible) {
        el.scrollIntoView({ block: 'center', inline: 'center' });
        rect = el.getBoundingClientRect();
        const top = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
        actionable = !!top && (top === el || el.contains(top));
    }
    return JSON.stringify({
        selector: sel,
        tag_name: el.tagName.toLowerCase(),
        text_content: el.textContent,
        value: 'value' in el ? String(el.value) : null,
        visible,
        actionable,
    });
}";

/// Empty a form control the way a user would, so framework listeners fire
const CLEAR_SCRIPT: &str = r"(sel) => {
    const el = document.querySelector(sel);
    const proto = Object.getPrototypeOf(el);
    const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
    setter.call(el, '');
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
}";

impl ChromiumDriver {
    fn resolve(&self, url: &str) -> LoginE2eResult<Url> {
        self.base_url
            .join(url)
            .map_err(|e| LoginE2eError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn call(&self, function: &str, selector: &str) -> LoginE2eResult<serde_json::Value> {
        let literal = serde_json::to_string(selector)?;
        let params = EvaluateParams::builder()
            .expression(format!("({function})({literal})"))
            .return_by_value(true)
            .build()
            .map_err(page_error)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(page_error)?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn lookup(&self, selector: &str) -> LoginE2eResult<Option<ElementHandle>> {
        let json = self.call(LOOKUP_SCRIPT, selector).await?;
        let text = json.as_str().ok_or_else(|| LoginE2eError::PageError {
            message: format!("unexpected lookup result for {selector}: {json}"),
        })?;
        Ok(serde_json::from_str(text)?)
    }

    async fn require_actionable(&self, selector: &str) -> LoginE2eResult<()> {
        let element = self
            .lookup(selector)
            .await?
            .ok_or_else(|| LoginE2eError::ElementNotFound {
                selector: selector.to_string(),
            })?;
        if !element.visible {
            return Err(LoginE2eError::NotActionable {
                selector: selector.to_string(),
                reason: "element is not visible".to_string(),
            });
        }
        if !element.actionable {
            return Err(LoginE2eError::NotActionable {
                selector: selector.to_string(),
                reason: "element is covered by another element".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> LoginE2eResult<()> {
        let target = self.resolve(url)?;
        debug!(url = %target, "navigate");
        let navigation = self.page.goto(target.as_str());
        match tokio::time::timeout(self.config.navigation_timeout, navigation).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(LoginE2eError::NavigationError {
                url: target.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(LoginE2eError::Timeout {
                what: format!("navigation to {target}"),
                ms: self.config.navigation_timeout_ms(),
            }),
        }
    }

    async fn current_url(&self) -> LoginE2eResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(page_error)?
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn query_selector(&self, selector: &str) -> LoginE2eResult<Option<ElementHandle>> {
        self.lookup(selector).await
    }

    async fn click(&self, selector: &str) -> LoginE2eResult<()> {
        self.require_actionable(selector).await?;
        let element = self.page.find_element(selector).await.map_err(page_error)?;
        element.click().await.map_err(input_error)?;
        Ok(())
    }

    async fn clear(&self, selector: &str) -> LoginE2eResult<()> {
        self.require_actionable(selector).await?;
        self.call(CLEAR_SCRIPT, selector).await?;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> LoginE2eResult<()> {
        self.require_actionable(selector).await?;
        let element = self.page.find_element(selector).await.map_err(page_error)?;
        element
            .focus()
            .await
            .map_err(input_error)?
            .type_str(text)
            .await
            .map_err(input_error)?;
        Ok(())
    }

    async fn set_viewport(&self, device: &DeviceDescriptor) -> LoginE2eResult<()> {
        debug!(device = device.name, "set viewport");
        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(device.viewport_width))
            .height(i64::from(device.viewport_height))
            .device_scale_factor(device.device_scale_factor)
            .mobile(device.is_mobile)
            .build()
            .map_err(page_error)?;
        self.page.execute(metrics).await.map_err(page_error)?;
        self.page
            .execute(SetTouchEmulationEnabledParams::new(device.has_touch))
            .await
            .map_err(page_error)?;
        self.page
            .execute(SetUserAgentOverrideParams::new(device.user_agent))
            .await
            .map_err(page_error)?;
        Ok(())
    }

    async fn close(&self) -> LoginE2eResult<()> {
        self.page.clone().close().await.map_err(page_error)?;
        let mut browser = self.browser.lock().await;
        browser
            .dispose_browser_context(self.context.clone())
            .await
            .map_err(page_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_are_functions() {
        assert!(LOOKUP_SCRIPT.starts_with("(sel) =>"));
        assert!(CLEAR_SCRIPT.starts_with("(sel) =>"));
        assert!(LOOKUP_SCRIPT.contains("elementFromPoint"));
    }

    #[test]
    fn test_lookup_json_matches_element_handle() {
        let json = r##"{"selector":"#a","tag_name":"input","text_content":"","value":"x","visible":true,"actionable":false}"##;
        let handle: ElementHandle = serde_json::from_str(json).unwrap();
        assert_eq!(handle.value.as_deref(), Some("x"));
        assert!(handle.visible);
        assert!(!handle.actionable);

        let missing: Option<ElementHandle> = serde_json::from_str("null").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_selector_literal_escaping() {
        let literal = serde_json::to_string(r#"[data-testid="password"] ~ button"#).unwrap();
        assert_eq!(literal, r#""[data-testid=\"password\"] ~ button""#);
    }
}
