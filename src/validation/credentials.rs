//! Credential payload decoding.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning a request body into credentials.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body could not be read: {0}")]
    Read(#[from] axum::Error),

    #[error("request body is not valid JSON credentials: {0}")]
    Json(#[from] serde_json::Error),
}

/// Credentials submitted to `/register` or `/login`.
///
/// Fields keep whatever JSON value the client sent. Absent fields stay
/// `None`, an explicit `null` is `Some(Value::Null)`, and two absent
/// passwords compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub confirm_password: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Credentials {
    /// Decode a JSON or URL-encoded body.
    ///
    /// Bodies with any other content type are ignored and yield empty
    /// credentials.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Result<Self, BodyError> {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some("application/json") if !body.is_empty() => Ok(serde_json::from_slice(body)?),
            Some("application/x-www-form-urlencoded") => Ok(Self::from_form(body)),
            _ => Ok(Self::default()),
        }
    }

    fn from_form(body: &[u8]) -> Self {
        let mut credentials = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "email" => &mut credentials.email,
                "password" => &mut credentials.password,
                "confirmPassword" => &mut credentials.confirm_password,
                _ => continue,
            };
            *slot = Some(Value::String(value.into_owned()));
        }
        credentials
    }

    /// The email, if one was sent as a string.
    pub fn email(&self) -> Option<&str> {
        self.email.as_ref().and_then(Value::as_str)
    }
}
