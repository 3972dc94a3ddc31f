//! Login test data
//!
//! The fixture file is embedded at compile time so every test binary sees the
//! same data without depending on the working directory. A different file can
//! be loaded with [`LoginData::from_file`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

const EMBEDDED_LOGIN_DATA: &str = include_str!("../fixtures/login-data.json");

/// Credentials that the remote login page accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidUser {
    pub username: String,
    pub password: String,
}

/// A credential pair the login page must reject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidCredential {
    /// Human-readable label, also used to name the generated test
    pub test_case: String,
    pub username: String,
    pub password: String,
    pub expected_error: String,
}

/// The whole login fixture file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub valid_user: ValidUser,
    pub invalid_credentials: Vec<InvalidCredential>,
    pub success_message: String,
    pub logout_message: String,
}

/// Terminal state a credential submission is expected to reach
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutcome {
    Success,
    Error(String),
}

/// One parameterized login attempt and its single expected outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialCase {
    pub label: String,
    pub username: String,
    pub password: String,
    pub expected: ExpectedOutcome,
}

impl LoginData {
    /// Parse login data from a JSON string and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Parse login data from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading login fixture from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The fixture shipped with the crate
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_LOGIN_DATA)
    }

    /// Look up an invalid credential entry by its label
    pub fn invalid_case(&self, label: &str) -> Option<&InvalidCredential> {
        self.invalid_credentials.iter().find(|c| c.test_case == label)
    }

    /// All cases in the fixture, the valid user first
    pub fn credential_cases(&self) -> Vec<CredentialCase> {
        let mut cases = Vec::with_capacity(self.invalid_credentials.len() + 1);
        cases.push(CredentialCase {
            label: "valid user".to_string(),
            username: self.valid_user.username.clone(),
            password: self.valid_user.password.clone(),
            expected: ExpectedOutcome::Success,
        });
        cases.extend(self.invalid_credentials.iter().map(InvalidCredential::to_case));
        cases
    }

    fn validate(&self) -> Result<()> {
        if self.valid_user.username.is_empty() || self.valid_user.password.is_empty() {
            return Err(Error::InvalidFixture(
                "validUser must have a username and a password".to_string(),
            ));
        }
        if self.success_message.trim().is_empty() {
            return Err(Error::InvalidFixture("successMessage is empty".to_string()));
        }

        let mut labels = HashSet::new();
        for case in &self.invalid_credentials {
            if case.expected_error.trim().is_empty() {
                return Err(Error::InvalidFixture(format!(
                    "case '{}' has no expectedError",
                    case.test_case
                )));
            }
            if !labels.insert(case.test_case.as_str()) {
                return Err(Error::InvalidFixture(format!(
                    "duplicate testCase label '{}'",
                    case.test_case
                )));
            }
        }
        Ok(())
    }
}

impl InvalidCredential {
    pub fn to_case(&self) -> CredentialCase {
        CredentialCase {
            label: self.test_case.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            expected: ExpectedOutcome::Error(self.expected_error.clone()),
        }
    }
}
