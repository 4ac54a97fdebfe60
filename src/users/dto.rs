use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use super::repo_types::UserFields;

/// Uniform result of every gateway operation: data or a message, plus the HTTP status to use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Result { result: T, status: u16 },
    Message { message: String, status: u16 },
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self::Result { result, status: 200 }
    }

    pub fn message(status: StatusCode, message: &str) -> Self {
        Self::Message {
            message: message.to_string(),
            status: status.as_u16(),
        }
    }

    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Result { status, .. } | Self::Message { status, .. } => *status,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// 400 body produced when a payload fails validation.
#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    pub message: Vec<String>,
    pub status: u16,
}

impl ValidationErrors {
    pub fn new(message: Vec<String>) -> Self {
        Self {
            message,
            status: StatusCode::BAD_REQUEST.as_u16(),
        }
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

const FIELDS: [&str; 4] = ["name", "email", "password", "age"];

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks a create/update body and extracts the user fields.
///
/// Every failing constraint is reported, not just the first, so clients can fix a payload in
/// one round trip.
pub fn validate_user_payload(body: &Value) -> Result<UserFields, ValidationErrors> {
    let Some(obj) = body.as_object() else {
        return Err(ValidationErrors::new(vec![
            "request body must be a JSON object.".to_string(),
        ]));
    };

    let mut errors: Vec<String> = obj
        .keys()
        .filter(|k| !FIELDS.contains(&k.as_str()))
        .map(|k| format!("property {k} should not exist."))
        .collect();

    let name = string_field(obj, "name", &mut errors, false);
    let email = string_field(obj, "email", &mut errors, true);
    let password = string_field(obj, "password", &mut errors, false);
    let age = age_field(obj, &mut errors);

    match (name, email, password, age) {
        (Some(name), Some(email), Some(password), Some(age)) if errors.is_empty() => {
            Ok(UserFields {
                name,
                email,
                password,
                age,
            })
        }
        _ => Err(ValidationErrors::new(errors)),
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null)) || value.and_then(Value::as_str) == Some("")
}

fn string_field(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
    email: bool,
) -> Option<String> {
    let value = obj.get(key);
    let as_str = value.and_then(Value::as_str);

    if email && !as_str.is_some_and(is_valid_email) {
        errors.push(format!("{key} must be valid."));
    }
    if as_str.is_none() {
        errors.push(format!("{key} must be a string."));
    }
    if is_empty(value) {
        errors.push(format!("{key} must be provided."));
        return None;
    }
    as_str.map(str::to_string)
}

fn age_field(obj: &Map<String, Value>, errors: &mut Vec<String>) -> Option<i32> {
    let value = obj.get("age");
    let is_number = value.is_some_and(Value::is_number);
    let age = value
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .or_else(|| {
            // 25.0 is still a whole number
            value
                .and_then(Value::as_f64)
                .filter(|f| f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64)
                .map(|f| f as i32)
        });

    if !is_number {
        errors.push("age must be a number.".to_string());
    } else if age.is_none() {
        errors.push("age must be a whole number.".to_string());
    }
    if is_empty(value) {
        errors.push("age must be provided.".to_string());
    }
    age
}
