//! Practice QA Common Library
//!
//! Shared fixtures, API record types and configuration for the practice-qa
//! suite.

pub mod api_types;
pub mod config;
pub mod error;
pub mod fixtures;

// Re-export commonly used types
pub use api_types::{ApiResponse, Comment, CreatePostRequest, Post, UpdatePostRequest, User};
pub use config::{Browser, ReportConfig, SuiteConfig, Viewport};
pub use error::{Error, Result};
pub use fixtures::{CredentialCase, ExpectedOutcome, InvalidCredential, LoginData, ValidUser};

/// Suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
