//! Error types for E2E testing

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install playwright @playwright/test && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("Assertion failed at step {step} ({name}): {message}{}", screenshot_note(.screenshot))]
    AssertionFailed {
        step: usize,
        name: String,
        message: String,
        screenshot: Option<PathBuf>,
    },

    #[error("Timed out at step {step} ({name}): {message}{}", screenshot_note(.screenshot))]
    Timeout {
        step: usize,
        name: String,
        message: String,
        screenshot: Option<PathBuf>,
    },

    #[error("Assertion failed: {0}")]
    Expectation(String),

    #[error("Request to {url} timed out")]
    RequestTimeout { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] practice_qa_common::Error),
}

fn screenshot_note(screenshot: &Option<PathBuf>) -> String {
    match screenshot {
        Some(path) => format!(" (screenshot: {})", path.display()),
        None => String::new(),
    }
}

impl E2eError {
    /// True for the two failure classes a test can produce on its own:
    /// a condition that did not hold and a condition that never resolved
    pub fn is_test_failure(&self) -> bool {
        matches!(
            self,
            E2eError::AssertionFailed { .. }
                | E2eError::Timeout { .. }
                | E2eError::Expectation(_)
                | E2eError::RequestTimeout { .. }
        )
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
