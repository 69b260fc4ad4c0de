//! Reusable field validators
//!
//! Each validator inspects one field of a toy's wire representation and
//! returns a user-facing message on failure. Validators only judge values of
//! the type they understand and let anything else through; `required()`
//! handles presence.

use serde_json::Value;
use url::Url;

/// Boxed validator as stored in a [`super::ToyValidation`] table
pub type FieldValidator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Validator: field is present (not null, not a blank string)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        let missing = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if missing {
            Err(format!("{} is required", capitalize(field)))
        } else {
            Ok(())
        }
    }
}

/// Validator: string length in characters must be within `[min, max]`
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        let len = s.chars().count();
        if len < min {
            Err(format!(
                "{} must be at least {} characters",
                capitalize(field),
                min
            ))
        } else if len > max {
            Err(format!(
                "{} must be at most {} characters",
                capitalize(field),
                max
            ))
        } else {
            Ok(())
        }
    }
}

/// Validator: number must be within `[min, max]`
pub fn number_range(
    min: f64,
    max: f64,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        let Some(num) = value.as_f64() else {
            return Ok(());
        };
        if num < min {
            Err(format!("{} must be at least {}", capitalize(field), min))
        } else if num > max {
            Err(format!("{} must be at most {}", capitalize(field), max))
        } else {
            Ok(())
        }
    }
}

/// Validator: blank or a well-formed http(s) URL
pub fn optional_url() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_str() {
        Some(s) if !s.trim().is_empty() && !is_valid_url(s) => {
            Err("Must be a valid URL".to_string())
        }
        _ => Ok(()),
    }
}

fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
