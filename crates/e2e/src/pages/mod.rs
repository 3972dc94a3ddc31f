//! Page objects

pub mod login;

pub use login::{LoginPage, LoginSelectors, LOGIN_SELECTORS};
