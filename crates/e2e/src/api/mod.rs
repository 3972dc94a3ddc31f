//! Resource API client and its structural checks

pub mod client;
pub mod validate;

pub use client::{EmptyBody, JsonPlaceholderApi};
pub use validate::{verify_comment_structure, verify_post_structure};
