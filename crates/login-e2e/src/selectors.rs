//! Selector registry for the login workflow.
//!
//! Every element the suite touches is located through a stable `data-testid`
//! attribute exposed by the application. Selectors, routes and user-facing copy
//! live here and nowhere else.

use serde::{Deserialize, Serialize};

/// Logical elements of the login and profile screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Username text input on the login form
    UsernameInput,
    /// Password input on the login form
    PasswordInput,
    /// Password input once switched to plain-text rendering
    RevealedPasswordInput,
    /// Show/hide toggle that sits next to the password input
    PasswordRevealButton,
    /// Login form submit control
    SubmitButton,
    /// Username shown on the profile page
    ProfileUsername,
    /// "No data yet" indicator on the profile page
    EmptyMessageState,
    /// Avatar that opens the account menu
    UserAvatar,
    /// Logout entry in the account menu
    LogoutButton,
    /// Accept-all control on the cookie consent banner
    AcceptCookiesButton,
    /// Server-side error banner on the login form
    ErrorBanner,
}

impl Element {
    /// Every registered element
    pub const ALL: [Self; 11] = [
        Self::UsernameInput,
        Self::PasswordInput,
        Self::RevealedPasswordInput,
        Self::PasswordRevealButton,
        Self::SubmitButton,
        Self::ProfileUsername,
        Self::EmptyMessageState,
        Self::UserAvatar,
        Self::LogoutButton,
        Self::AcceptCookiesButton,
        Self::ErrorBanner,
    ];

    /// CSS query locating this element
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            // Profile page and login form never render together, so they share the test id
            Self::UsernameInput | Self::ProfileUsername => r#"[data-testid="username"]"#,
            Self::PasswordInput => r#"[data-testid="password"]"#,
            Self::RevealedPasswordInput => r#"[data-testid="password"][type="text"]"#,
            Self::PasswordRevealButton => r#"[data-testid="password"] ~ button"#,
            Self::SubmitButton => r#"[data-testid="login__cta"]"#,
            Self::EmptyMessageState => r#"[data-testid="message--empty-state"]"#,
            Self::UserAvatar => r#"[data-testid="avatar__initials"]"#,
            Self::LogoutButton => r#"[data-testid="actionMenu__nav-logoutButton"]"#,
            Self::AcceptCookiesButton => r#"[data-testid="cookieBanner__acceptAllButton"]"#,
            Self::ErrorBanner => r#"[data-testid="login__error--server"]"#,
        }
    }

    /// Human-readable name used in logs and failure messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UsernameInput => "username input",
            Self::PasswordInput => "password input",
            Self::RevealedPasswordInput => "revealed password input",
            Self::PasswordRevealButton => "password reveal button",
            Self::SubmitButton => "login button",
            Self::ProfileUsername => "profile username",
            Self::EmptyMessageState => "empty message state",
            Self::UserAvatar => "user avatar",
            Self::LogoutButton => "logout button",
            Self::AcceptCookiesButton => "accept cookies button",
            Self::ErrorBanner => "login error banner",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Application routes the suite navigates to or expects
pub mod routes {
    /// Login form
    pub const LOGIN: &str = "/login/";

    /// Landing page after a successful login
    pub const HOME: &str = "/";

    /// Profile page of `username`
    #[must_use]
    pub fn profile(username: &str) -> String {
        format!("/{username}")
    }
}

/// Literal copy the suite asserts on
pub mod messages {
    /// Banner text for any rejected username/password combination
    pub const INCORRECT_CREDENTIALS: &str =
        "Incorrect username or password. Check your details and try again.";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_selectors_use_test_ids() {
        for element in Element::ALL {
            assert!(
                element.selector().starts_with("[data-testid="),
                "{element} selector should be test-id based"
            );
        }
    }

    #[test]
    fn test_only_profile_and_form_share_a_selector() {
        let mut seen = HashSet::new();
        let duplicates: Vec<_> = Element::ALL
            .iter()
            .filter(|e| !seen.insert(e.selector()))
            .collect();
        assert_eq!(duplicates, vec![&Element::ProfileUsername]);
    }

    #[test]
    fn test_reveal_button_is_sibling_of_password() {
        assert!(Element::PasswordRevealButton
            .selector()
            .starts_with(Element::PasswordInput.selector()));
        assert!(Element::RevealedPasswordInput
            .selector()
            .starts_with(Element::PasswordInput.selector()));
    }

    #[test]
    fn test_profile_route() {
        assert_eq!(routes::profile("jane"), "/jane");
        assert_eq!(routes::LOGIN, "/login/");
        assert_eq!(routes::HOME, "/");
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Element::SubmitButton.to_string(), "login button");
    }
}
