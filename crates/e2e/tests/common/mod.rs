//! Shared setup for the integration tests

#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::EnvFilter;

use practice_qa_common::{LoginData, SuiteConfig};
use practice_qa_e2e::{LoginPage, PlaywrightConfig, PlaywrightDriver, Session};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn suite_config() -> SuiteConfig {
    SuiteConfig::from_env().expect("suite config")
}

pub fn login_data() -> LoginData {
    LoginData::embedded().expect("login fixture")
}

/// Driver for tests that open a real browser
pub fn driver() -> PlaywrightDriver {
    init_tracing();
    PlaywrightDriver::new(PlaywrightConfig::from(&suite_config()))
        .expect("Playwright must be installed to run browser tests")
}

/// Fresh page object and session, starting on the login form
pub fn start(name: &str) -> (LoginPage, Session) {
    let page = LoginPage::new();
    let mut session = Session::new(name);
    page.visit(&mut session);
    (page, session)
}
