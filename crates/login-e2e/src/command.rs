//! Reusable login command.

use crate::driver::BrowserDriver;
use crate::page_object::LoginPage;
use crate::result::LoginE2eResult;

/// Fill in both credentials and submit the form.
///
/// Shortcut for scenarios that don't need step-by-step control; the first
/// failing step's error is returned as is.
pub async fn login<D: BrowserDriver + ?Sized>(
    page: &LoginPage<'_, D>,
    username: &str,
    password: &str,
) -> LoginE2eResult<()> {
    page.enter_username(username)
        .await?
        .enter_password(password)
        .await?
        .submit()
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::SimulatedLoginApp;
    use crate::result::LoginE2eError;
    use crate::selectors::{routes, Element};
    use proptest::prelude::*;
    use std::time::Duration;

    fn app() -> SimulatedLoginApp {
        SimulatedLoginApp::new("http://app.test")
            .unwrap()
            .with_account("jane", "s3cret")
    }

    #[tokio::test]
    async fn test_login_command_signs_in() {
        let session = app().open_session();
        let page = LoginPage::new(&session, Duration::from_millis(50));
        page.visit_login().await.unwrap();
        page.accept_cookies().await.unwrap();
        login(&page, "jane", "s3cret").await.unwrap();
        page.assert_url_is(routes::HOME).await.unwrap();

        let history = session.history();
        let submit = format!("click:{}", Element::SubmitButton.selector());
        assert_eq!(history.last(), Some(&submit));
    }

    #[tokio::test]
    async fn test_login_command_propagates_blocked_step() {
        let session = app().open_session();
        let page = LoginPage::new(&session, Duration::from_millis(50));
        page.visit_login().await.unwrap();
        let err = login(&page, "jane", "s3cret").await.unwrap_err();
        assert!(matches!(err, LoginE2eError::NotActionable { .. }));
        assert!(!session
            .history()
            .iter()
            .any(|c| c.contains(Element::SubmitButton.selector())));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_credentials_are_forwarded_verbatim(user in ".{0,24}", pass in ".{0,24}") {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let (typed_user, typed_pass) = runtime.block_on(async {
                let session = app().open_session();
                let page = LoginPage::new(&session, Duration::from_millis(20));
                page.visit_login().await.unwrap();
                page.accept_cookies().await.unwrap();
                page.enter_username(&user).await.unwrap();
                page.enter_password(&pass).await.unwrap();
                let value = |e: Element| {
                    let session = &session;
                    async move {
                        session.query_selector(e.selector()).await.unwrap().unwrap().value
                    }
                };
                (value(Element::UsernameInput).await, value(Element::PasswordInput).await)
            });
            prop_assert_eq!(typed_user.as_deref(), Some(user.as_str()));
            prop_assert_eq!(typed_pass.as_deref(), Some(pass.as_str()));
        }
    }
}
