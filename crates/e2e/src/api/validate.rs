//! Shallow structural checks on API records
//!
//! These look at the JSON as received, so a missing field or a field of the
//! wrong primitive type fails the check even when the typed record could not
//! have been built at all.

use serde_json::Value;

use crate::error::{E2eError, E2eResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Number,
    String,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Number => "a number",
            Kind::String => "a string",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Number => value.is_number(),
            Kind::String => value.is_string(),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn expect_field<'v>(record: &'v Value, field: &str, kind: Kind) -> E2eResult<&'v Value> {
    let object = record.as_object().ok_or_else(|| {
        E2eError::Expectation(format!("expected an object but got {}", describe(record)))
    })?;
    let value = object.get(field).ok_or_else(|| {
        E2eError::Expectation(format!("expected record to have property '{}'", field))
    })?;
    if !kind.matches(value) {
        return Err(E2eError::Expectation(format!(
            "expected property '{}' to be {} but got {}",
            field,
            kind.name(),
            describe(value)
        )));
    }
    Ok(value)
}

/// `userId`, `id` numeric; `title`, `body` strings
pub fn verify_post_structure(post: &Value) -> E2eResult<()> {
    expect_field(post, "userId", Kind::Number)?;
    expect_field(post, "id", Kind::Number)?;
    expect_field(post, "title", Kind::String)?;
    expect_field(post, "body", Kind::String)?;
    Ok(())
}

/// `postId`, `id` numeric; `name`, `email`, `body` strings; `email` contains `@`
pub fn verify_comment_structure(comment: &Value) -> E2eResult<()> {
    expect_field(comment, "postId", Kind::Number)?;
    expect_field(comment, "id", Kind::Number)?;
    expect_field(comment, "name", Kind::String)?;
    let email = expect_field(comment, "email", Kind::String)?;
    if !email.as_str().is_some_and(|e| e.contains('@')) {
        return Err(E2eError::Expectation(format!(
            "expected email {} to include '@'",
            email
        )));
    }
    expect_field(comment, "body", Kind::String)?;
    Ok(())
}
