//! Practice QA E2E Test Framework
//!
//! This crate provides a Rust-controlled E2E and API testing layer that:
//! - Models the practice login form as a page object over a command queue
//! - Controls Playwright by rendering each queue into one Node script
//! - Wraps the JSONPlaceholder resource API in a typed client
//! - Runs declarative YAML scenarios and writes JSON/HTML reports
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Tests (tests/*.rs)                      │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │  LoginPage                   │  JsonPlaceholderApi          │
//! │    ├── visit / login         │    ├── get / create / update │
//! │    └── verify_* assertions   │    └── verify_*_structure    │
//! ├──────────────────────────────┤                              │
//! │  Session (ordered steps)     │  reqwest                     │
//! │    └── run(driver)           │                              │
//! ├──────────────────────────────┤                              │
//! │  PlaywrightDriver            │                              │
//! │    └── steps -> node script  │                              │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```

pub mod api;
pub mod error;
pub mod pages;
pub mod playwright;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod session;

pub use api::JsonPlaceholderApi;
pub use error::{E2eError, E2eResult};
pub use pages::LoginPage;
pub use playwright::{PlaywrightConfig, PlaywrightDriver};
pub use runner::TestRunner;
pub use scenario::{Scenario, TestStep};
pub use session::Session;
