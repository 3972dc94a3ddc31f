//! Page object for the practice login form
//!
//! Every selector the login tests touch lives in [`LOGIN_SELECTORS`]. The page
//! object holds no state of its own: each method queues steps on the
//! [`Session`] it is given, and each element accessor hands out a fresh
//! [`Element`] so nothing is cached across re-renders.

use crate::session::{Element, Session, ValueQuery};

/// Path of the login form, relative to the suite base URL
pub const LOGIN_PATH: &str = "/practice-test-login/";

/// Path segment the site redirects to after a successful login
pub const SUCCESS_PATH: &str = "/logged-in-successfully/";

/// Label of the logout link on the success page
pub const LOGOUT_LABEL: &str = "Log out";

/// CSS selectors for the login form and the success page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginSelectors {
    pub username_input: &'static str,
    pub password_input: &'static str,
    pub submit_button: &'static str,
    pub error_message: &'static str,
    pub success_message: &'static str,
    pub logout_button: &'static str,
}

pub const LOGIN_SELECTORS: LoginSelectors = LoginSelectors {
    username_input: "#username",
    password_input: "#password",
    submit_button: "#submit",
    error_message: "#error",
    success_message: ".post-title",
    logout_button: ".wp-block-button > a.wp-block-button__link",
};

#[derive(Debug, Clone, Copy)]
pub struct LoginPage {
    selectors: LoginSelectors,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            selectors: LOGIN_SELECTORS,
        }
    }

    pub fn selectors(&self) -> &LoginSelectors {
        &self.selectors
    }

    // Elements

    pub fn username_input<'s>(&self, session: &'s mut Session) -> Element<'s> {
        session.get(self.selectors.username_input)
    }

    pub fn password_input<'s>(&self, session: &'s mut Session) -> Element<'s> {
        session.get(self.selectors.password_input)
    }

    pub fn submit_button<'s>(&self, session: &'s mut Session) -> Element<'s> {
        session.get(self.selectors.submit_button)
    }

    pub fn error_message<'s>(&self, session: &'s mut Session) -> Element<'s> {
        session.get(self.selectors.error_message)
    }

    pub fn success_message<'s>(&self, session: &'s mut Session) -> Element<'s> {
        session.get(self.selectors.success_message)
    }

    pub fn logout_button<'s>(&self, session: &'s mut Session) -> Element<'s> {
        session.get(self.selectors.logout_button)
    }

    // Actions

    /// Open the login form; starts every test from a logged-out page
    pub fn visit(&self, session: &mut Session) {
        session.visit(LOGIN_PATH);
    }

    /// Reload whatever page the session is on
    pub fn reload(&self, session: &mut Session) {
        session.reload();
    }

    /// Replace the username field's content. Any string is accepted as is;
    /// the remote form decides what is valid.
    pub fn enter_username(&self, session: &mut Session, username: &str) {
        self.username_input(session).clear().type_text(username);
    }

    /// Replace the password field's content
    pub fn enter_password(&self, session: &mut Session, password: &str) {
        self.password_input(session).clear().type_text(password);
    }

    pub fn click_submit(&self, session: &mut Session) {
        self.submit_button(session).click();
    }

    /// Fill the non-empty fields and submit. An empty username or password
    /// leaves that field untouched, which submits a partial form.
    pub fn login(&self, session: &mut Session, username: &str, password: &str) {
        if !username.is_empty() {
            self.enter_username(session, username);
        }
        if !password.is_empty() {
            self.enter_password(session, password);
        }
        self.click_submit(session);
    }

    pub fn click_logout(&self, session: &mut Session) {
        self.logout_button(session).click();
    }

    pub fn clear_username(&self, session: &mut Session) {
        self.username_input(session).clear();
    }

    pub fn clear_password(&self, session: &mut Session) {
        self.password_input(session).clear();
    }

    pub fn username_value<'s>(&self, session: &'s mut Session) -> ValueQuery<'s> {
        self.username_input(session).value()
    }

    pub fn password_value<'s>(&self, session: &'s mut Session) -> ValueQuery<'s> {
        self.password_input(session).value()
    }

    // Verifications

    pub fn verify_error_message(&self, session: &mut Session, expected: &str) {
        self.error_message(session)
            .should_be_visible()
            .should_contain_text(expected);
    }

    pub fn verify_success_message(&self, session: &mut Session, expected: &str) {
        self.success_message(session)
            .should_be_visible()
            .should_contain_text(expected);
    }

    pub fn verify_logout_button_visible(&self, session: &mut Session) {
        self.logout_button(session)
            .should_be_visible()
            .should_contain_text(LOGOUT_LABEL);
    }

    pub fn verify_successful_login_url(&self, session: &mut Session) {
        session.url().should_include(SUCCESS_PATH);
    }

    pub fn verify_not_logged_in_url(&self, session: &mut Session) {
        session.url().should_not_include(SUCCESS_PATH);
    }

    pub fn verify_form_elements_visible(&self, session: &mut Session) {
        self.username_input(session).should_be_visible();
        self.password_input(session).should_be_visible();
        self.submit_button(session)
            .should_be_visible()
            .should_be_enabled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{ElementChecks, TestStep};

    fn clear(selector: &str) -> TestStep {
        TestStep::Clear {
            selector: selector.to_string(),
        }
    }

    fn type_text(selector: &str, text: &str) -> TestStep {
        TestStep::Type {
            selector: selector.to_string(),
            text: text.to_string(),
        }
    }

    fn submit() -> TestStep {
        TestStep::Click {
            selector: "#submit".to_string(),
        }
    }

    #[test]
    fn test_login_fills_both_fields_then_submits() {
        let page = LoginPage::new();
        let mut session = Session::new("login");
        page.login(&mut session, "student", "Password123");

        assert_eq!(
            session.steps(),
            &[
                clear("#username"),
                type_text("#username", "student"),
                clear("#password"),
                type_text("#password", "Password123"),
                submit(),
            ]
        );
    }

    #[test]
    fn test_login_skips_empty_fields() {
        let page = LoginPage::new();

        let mut session = Session::new("no-password");
        page.login(&mut session, "onlyusername", "");
        assert_eq!(
            session.steps(),
            &[clear("#username"), type_text("#username", "onlyusername"), submit()]
        );

        let mut session = Session::new("empty");
        page.login(&mut session, "", "");
        assert_eq!(session.steps(), &[submit()]);
    }

    #[test]
    fn test_enter_username_accepts_empty_and_special_strings() {
        let page = LoginPage::new();
        let mut session = Session::new("special");
        page.enter_username(&mut session, "");
        page.enter_username(&mut session, "user@test.com");

        assert_eq!(
            session.steps(),
            &[
                clear("#username"),
                type_text("#username", ""),
                clear("#username"),
                type_text("#username", "user@test.com"),
            ]
        );
    }

    #[test]
    fn test_clear_username_after_entry_expects_empty_value() {
        let page = LoginPage::new();
        for input in ["user@test.com", "user12345", "P@ssw0rd!#$%"] {
            let mut session = Session::new("clear");
            page.enter_username(&mut session, input);
            page.clear_username(&mut session);
            page.username_value(&mut session).should_equal("");

            assert_eq!(
                session.steps(),
                &[
                    clear("#username"),
                    type_text("#username", input),
                    clear("#username"),
                    TestStep::Assert {
                        selector: "#username".to_string(),
                        checks: ElementChecks {
                            value: Some(String::new()),
                            ..Default::default()
                        },
                    },
                ]
            );
        }
    }

    #[test]
    fn test_verify_error_message_checks_visibility_then_text() {
        let page = LoginPage::new();
        let mut session = Session::new("error");
        page.verify_error_message(&mut session, "Your username is invalid!");

        assert_eq!(
            session.steps(),
            &[
                TestStep::Assert {
                    selector: "#error".to_string(),
                    checks: ElementChecks {
                        visible: Some(true),
                        ..Default::default()
                    },
                },
                TestStep::Assert {
                    selector: "#error".to_string(),
                    checks: ElementChecks {
                        text_contains: Some("Your username is invalid!".to_string()),
                        ..Default::default()
                    },
                },
            ]
        );
    }

    #[test]
    fn test_form_elements_visible_includes_enabled_submit() {
        let page = LoginPage::new();
        let mut session = Session::new("form");
        page.verify_form_elements_visible(&mut session);

        assert_eq!(session.steps().len(), 4);
        assert_eq!(
            session.steps()[3],
            TestStep::Assert {
                selector: "#submit".to_string(),
                checks: ElementChecks {
                    enabled: Some(true),
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn test_visit_and_url_checks() {
        let page = LoginPage::new();
        let mut session = Session::new("urls");
        page.visit(&mut session);
        page.verify_successful_login_url(&mut session);
        page.verify_not_logged_in_url(&mut session);

        assert_eq!(
            session.steps(),
            &[
                TestStep::Navigate {
                    url: LOGIN_PATH.to_string(),
                    wait_for_selector: None,
                },
                TestStep::AssertUrl {
                    contains: Some(SUCCESS_PATH.to_string()),
                    not_contains: None,
                },
                TestStep::AssertUrl {
                    contains: None,
                    not_contains: Some(SUCCESS_PATH.to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_logout_targets_logout_link() {
        let page = LoginPage::new();
        let mut session = Session::new("logout");
        page.click_logout(&mut session);
        assert_eq!(
            session.steps(),
            &[TestStep::Click {
                selector: ".wp-block-button > a.wp-block-button__link".to_string()
            }]
        );
    }
}
