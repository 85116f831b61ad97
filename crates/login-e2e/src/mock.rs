//! In-memory stand-in for the application under test.
//!
//! [`SimulatedLoginApp`] models the login screen, cookie banner, profile page
//! and account menu closely enough to exercise every scenario without a
//! browser. Each [`SimulatedSession`] is one isolated browser session.
//!
//! Behaviour switches on [`AppBehavior`] let tests break the application in
//! the ways the suite is supposed to catch.

use crate::driver::{BrowserDriver, DeviceDescriptor, ElementHandle};
use crate::result::{LoginE2eError, LoginE2eResult};
use crate::scenario::SessionFactory;
use crate::selectors::{messages, routes, Element};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Knobs that make the simulated application misbehave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppBehavior {
    /// Cookie banner overlays the login form until accepted
    pub banner_blocks_form: bool,
    /// Reveal toggle switches the password input to `type="text"`
    pub reveal_toggle_works: bool,
    /// Logout navigates back to the login route
    pub logout_redirects: bool,
    /// Rejected logins render the error banner
    pub shows_login_error: bool,
    /// Login route renders the form; when off only the cookie banner shows
    pub renders_login_form: bool,
}

impl Default for AppBehavior {
    fn default() -> Self {
        Self {
            banner_blocks_form: true,
            reveal_toggle_works: true,
            logout_redirects: true,
            shows_login_error: true,
            renders_login_form: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Account {
    username: String,
    password: String,
    has_data: bool,
}

/// Template for simulated sessions: accounts and behaviour
#[derive(Debug, Clone)]
pub struct SimulatedLoginApp {
    base_url: Url,
    accounts: Vec<Account>,
    behavior: AppBehavior,
}

impl SimulatedLoginApp {
    /// Create an application served from `base_url` with no accounts
    pub fn new(base_url: &str) -> LoginE2eResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            LoginE2eError::config(format!("invalid base URL {base_url:?}: {e}"))
        })?;
        Ok(Self {
            base_url,
            accounts: Vec::new(),
            behavior: AppBehavior::default(),
        })
    }

    /// Register a new account with no prior data
    #[must_use]
    pub fn with_account(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.accounts.push(Account {
            username: username.into(),
            password: password.into(),
            has_data: false,
        });
        self
    }

    /// Register an account that already has data (no empty state)
    #[must_use]
    pub fn with_populated_account(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.accounts.push(Account {
            username: username.into(),
            password: password.into(),
            has_data: true,
        });
        self
    }

    /// Override the behaviour switches
    #[must_use]
    pub const fn with_behavior(mut self, behavior: AppBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Open an isolated session on `about:blank`
    #[must_use]
    pub fn open_session(&self) -> SimulatedSession {
        SimulatedSession {
            app: self.clone(),
            state: Mutex::new(SessionState::default()),
        }
    }

    fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }
}

#[async_trait]
impl SessionFactory for SimulatedLoginApp {
    type Session = SimulatedSession;

    async fn open(&self) -> LoginE2eResult<Self::Session> {
        Ok(self.open_session())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Home,
    Profile(String),
    NotFound,
}

#[derive(Debug)]
struct SessionState {
    screen: Screen,
    path: String,
    cookies_accepted: bool,
    username_value: String,
    password_value: String,
    password_revealed: bool,
    error_visible: bool,
    signed_in_as: Option<String>,
    menu_open: bool,
    viewport: Option<DeviceDescriptor>,
    closed: bool,
    history: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            screen: Screen::Blank,
            path: String::new(),
            cookies_accepted: false,
            username_value: String::new(),
            password_value: String::new(),
            password_revealed: false,
            error_visible: false,
            signed_in_as: None,
            menu_open: false,
            viewport: None,
            closed: false,
            history: Vec::new(),
        }
    }
}

impl SessionState {
    fn go_to(&mut self, path: &str) {
        self.path = path.to_string();
        self.username_value.clear();
        self.password_value.clear();
        self.password_revealed = false;
        self.error_visible = false;
        self.menu_open = false;

        let trimmed = path.trim_matches('/');
        self.screen = if trimmed == "login" {
            Screen::Login
        } else if trimmed.is_empty() {
            Screen::Home
        } else if trimmed.contains('/') {
            Screen::NotFound
        } else if self.signed_in_as.is_some() {
            Screen::Profile(trimmed.to_string())
        } else {
            // Profiles require a session
            self.path = routes::LOGIN.to_string();
            Screen::Login
        };
    }
}

/// One simulated browser session
#[derive(Debug)]
pub struct SimulatedSession {
    app: SimulatedLoginApp,
    state: Mutex<SessionState>,
}

impl SimulatedSession {
    fn state(&self) -> LoginE2eResult<MutexGuard<'_, SessionState>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(LoginE2eError::PageError {
                message: "session already closed".to_string(),
            });
        }
        Ok(state)
    }

    /// Commands issued so far, e.g. `click:[data-testid="login__cta"]`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }

    /// Viewport last applied with `set_viewport`
    #[must_use]
    pub fn viewport(&self) -> Option<DeviceDescriptor> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .viewport
            .clone()
    }

    /// Whether `close` has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    fn resolve(&self, state: &SessionState, selector: &str) -> Option<(Element, ElementHandle)> {
        let banner_up = !state.cookies_accepted;
        let blocked = banner_up && self.app.behavior.banner_blocks_form;
        let cover = |handle: ElementHandle| if blocked { handle.covered() } else { handle };

        if selector == Element::AcceptCookiesButton.selector() {
            return banner_up.then(|| {
                (
                    Element::AcceptCookiesButton,
                    ElementHandle::new(selector, "button").with_text("Accept all"),
                )
            });
        }

        let signed_in = state.signed_in_as.is_some();
        let found = match &state.screen {
            Screen::Login => self.resolve_login(state, selector),
            Screen::Profile(name) if selector == Element::ProfileUsername.selector() => Some((
                Element::ProfileUsername,
                ElementHandle::new(selector, "h1").with_text(name.as_str()),
            )),
            Screen::Profile(name) if selector == Element::EmptyMessageState.selector() => self
                .app
                .account(name)
                .map_or(true, |a| !a.has_data)
                .then(|| {
                    (
                        Element::EmptyMessageState,
                        ElementHandle::new(selector, "div")
                            .with_text("You don't have any activity yet"),
                    )
                }),
            Screen::Home | Screen::Profile(_) if signed_in => self.resolve_menu(state, selector),
            _ => None,
        };
        found.map(|(element, handle)| (element, cover(handle)))
    }

    fn resolve_login(&self, state: &SessionState, selector: &str) -> Option<(Element, ElementHandle)> {
        if !self.app.behavior.renders_login_form {
            return None;
        }
        let element = Element::ALL
            .into_iter()
            .find(|e| e.selector() == selector && *e != Element::ProfileUsername)?;
        let handle = ElementHandle::new(selector, "input");
        let found = match element {
            Element::UsernameInput => Some(handle.with_value(state.username_value.as_str())),
            Element::PasswordInput => Some(handle.with_value(state.password_value.as_str())),
            Element::RevealedPasswordInput => state
                .password_revealed
                .then(|| handle.with_value(state.password_value.as_str())),
            Element::PasswordRevealButton | Element::SubmitButton => {
                Some(ElementHandle::new(selector, "button"))
            }
            Element::ErrorBanner => state.error_visible.then(|| {
                ElementHandle::new(selector, "div").with_text(messages::INCORRECT_CREDENTIALS)
            }),
            _ => None,
        };
        found.map(|h| (element, h))
    }

    fn resolve_menu(&self, state: &SessionState, selector: &str) -> Option<(Element, ElementHandle)> {
        if selector == Element::UserAvatar.selector() {
            let initials = state
                .signed_in_as
                .as_deref()
                .and_then(|u| u.chars().next())
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default();
            return Some((
                Element::UserAvatar,
                ElementHandle::new(selector, "button").with_text(initials),
            ));
        }
        (selector == Element::LogoutButton.selector() && state.menu_open).then(|| {
            (
                Element::LogoutButton,
                ElementHandle::new(selector, "a").with_text("Log out"),
            )
        })
    }

    fn actionable(&self, state: &SessionState, selector: &str) -> LoginE2eResult<Element> {
        let (element, handle) =
            self.resolve(state, selector)
                .ok_or_else(|| LoginE2eError::ElementNotFound {
                    selector: selector.to_string(),
                })?;
        if !handle.visible {
            return Err(LoginE2eError::NotActionable {
                selector: selector.to_string(),
                reason: "element is not visible".to_string(),
            });
        }
        if !handle.actionable {
            return Err(LoginE2eError::NotActionable {
                selector: selector.to_string(),
                reason: "element is covered by the cookie banner".to_string(),
            });
        }
        Ok(element)
    }

    fn submit(&self, state: &mut SessionState) {
        let accepted = self.app.account(&state.username_value).filter(|a| {
            a.password == state.password_value
        });
        if let Some(account) = accepted {
            state.signed_in_as = Some(account.username.clone());
            state.go_to(routes::HOME);
        } else {
            state.error_visible = self.app.behavior.shows_login_error;
        }
    }
}

#[async_trait]
impl BrowserDriver for SimulatedSession {
    async fn navigate(&self, url: &str) -> LoginE2eResult<()> {
        let mut state = self.state()?;
        state.history.push(format!("navigate:{url}"));
        let target = self
            .app
            .base_url
            .join(url)
            .map_err(|e| LoginE2eError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        state.go_to(target.path());
        Ok(())
    }

    async fn current_url(&self) -> LoginE2eResult<String> {
        let state = self.state()?;
        if state.screen == Screen::Blank {
            return Ok("about:blank".to_string());
        }
        self.app
            .base_url
            .join(&state.path)
            .map(String::from)
            .map_err(|e| LoginE2eError::PageError {
                message: e.to_string(),
            })
    }

    async fn query_selector(&self, selector: &str) -> LoginE2eResult<Option<ElementHandle>> {
        let state = self.state()?;
        Ok(self.resolve(&state, selector).map(|(_, handle)| handle))
    }

    async fn click(&self, selector: &str) -> LoginE2eResult<()> {
        let mut state = self.state()?;
        state.history.push(format!("click:{selector}"));
        match self.actionable(&state, selector)? {
            Element::AcceptCookiesButton => state.cookies_accepted = true,
            Element::PasswordRevealButton if self.app.behavior.reveal_toggle_works => {
                state.password_revealed = !state.password_revealed;
            }
            Element::SubmitButton => self.submit(&mut state),
            Element::UserAvatar => state.menu_open = !state.menu_open,
            Element::LogoutButton => {
                state.signed_in_as = None;
                state.menu_open = false;
                if self.app.behavior.logout_redirects {
                    state.go_to(routes::LOGIN);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn clear(&self, selector: &str) -> LoginE2eResult<()> {
        let mut state = self.state()?;
        state.history.push(format!("clear:{selector}"));
        match self.actionable(&state, selector)? {
            Element::UsernameInput => state.username_value.clear(),
            Element::PasswordInput | Element::RevealedPasswordInput => {
                state.password_value.clear();
            }
            _ => {
                return Err(LoginE2eError::InputError {
                    message: format!("{selector} is not a text input"),
                })
            }
        }
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> LoginE2eResult<()> {
        let mut state = self.state()?;
        state.history.push(format!("type:{selector}"));
        match self.actionable(&state, selector)? {
            Element::UsernameInput => state.username_value.push_str(text),
            Element::PasswordInput | Element::RevealedPasswordInput => {
                state.password_value.push_str(text);
            }
            _ => {
                return Err(LoginE2eError::InputError {
                    message: format!("{selector} is not a text input"),
                })
            }
        }
        Ok(())
    }

    async fn set_viewport(&self, device: &DeviceDescriptor) -> LoginE2eResult<()> {
        let mut state = self.state()?;
        state.history.push(format!("viewport:{}", device.name));
        state.viewport = Some(device.clone());
        Ok(())
    }

    async fn close(&self) -> LoginE2eResult<()> {
        let mut state = self.state()?;
        state.history.push("close".to_string());
        state.closed = true;
        Ok(())
    }
}
