// Copyright 2023 Remi Bernotavicius

use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}: {}", .messages.join(", "))]
    Server { status: u16, messages: Vec<String> },

    #[error("invalid server URL {0:?}")]
    InvalidUrl(String),
}

impl Error {
    /// The lines to show the user for this error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Server { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    pub fn from_response_body(status: reqwest::StatusCode, body: &str) -> Self {
        let mut messages = messages_from_body(body);
        if messages.is_empty() {
            messages.push(
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned(),
            );
        }
        Self::Server {
            status: status.as_u16(),
            messages,
        }
    }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

fn value_to_message(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Pulls the user-facing messages out of an error response. Every entry of `errors` wins over
/// `message`.
pub fn messages_from_body(body: &str) -> Vec<String> {
    let Ok(body) = serde_json::from_str::<ErrorBody>(body) else {
        return vec![];
    };

    let from_errors: Vec<String> = match body.errors {
        Some(serde_json::Value::Object(map)) => {
            map.into_iter().filter_map(|(_, v)| value_to_message(v)).collect()
        }
        Some(serde_json::Value::Array(list)) => {
            list.into_iter().filter_map(value_to_message).collect()
        }
        Some(other) => value_to_message(other).into_iter().collect(),
        None => vec![],
    };

    if !from_errors.is_empty() {
        from_errors
    } else {
        body.message.into_iter().collect()
    }
}

#[test]
fn messages_from_errors_object() {
    let body = r#"{
        "message": "Bad Request",
        "errors": {"name": "Name is required", "cuisine": "Cuisine is required"}
    }"#;
    assert_eq!(
        messages_from_body(body),
        vec!["Name is required", "Cuisine is required"]
    );
}

#[test]
fn messages_from_errors_array() {
    let body = r#"{"errors": ["Ingredient already exists"]}"#;
    assert_eq!(messages_from_body(body), vec!["Ingredient already exists"]);
}

#[test]
fn messages_fall_back_to_message() {
    let body = r#"{"message": "Food couldn't be found"}"#;
    assert_eq!(messages_from_body(body), vec!["Food couldn't be found"]);

    assert!(messages_from_body("<html>gateway timeout</html>").is_empty());
}

#[test]
fn server_error_uses_status_reason_without_body() {
    let error = Error::from_response_body(reqwest::StatusCode::FORBIDDEN, "");
    assert_eq!(error.messages(), vec!["Forbidden"]);
}
