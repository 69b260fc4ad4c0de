//! Form-boundary validation for toys
//!
//! Rules are declared per wire field as a list of validators and evaluated
//! against the toy's JSON form, so the messages name the fields the form
//! shows (`name`, `price`, `imgUrl`). All failing fields are reported at
//! once.

pub mod validators;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::toy::Toy;
use serde_json::Value;
use validators::FieldValidator;

/// Ordered table of field rules
pub struct ToyValidation {
    rules: Vec<(&'static str, Vec<FieldValidator>)>,
}

impl ToyValidation {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a validator for `field`
    pub fn rule<F>(mut self, field: &'static str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        match self.rules.iter_mut().find(|(name, _)| *name == field) {
            Some((_, list)) => list.push(Box::new(validator)),
            None => self.rules.push((field, vec![Box::new(validator)])),
        }
        self
    }

    /// Catalog rules: name 2–50 characters, price 1–10000, optional image URL
    pub fn catalog_rules() -> Self {
        Self::new()
            .rule("name", validators::required())
            .rule("name", validators::string_length(2, 50))
            .rule("price", validators::required())
            .rule("price", validators::number_range(1.0, 10000.0))
            .rule("imgUrl", validators::optional_url())
    }

    /// Run every rule; the first failing validator of each field is reported
    pub fn validate(&self, toy: &Toy) -> Result<(), ValidationError> {
        let payload = serde_json::to_value(toy).map_err(|e| ValidationError::InvalidJson {
            message: e.to_string(),
        })?;

        let errors: Vec<FieldValidationError> = self
            .rules
            .iter()
            .filter_map(|(field, validators)| {
                let value = payload.get(*field).unwrap_or(&Value::Null);
                validators
                    .iter()
                    .find_map(|validate| validate(field, value).err())
                    .map(|message| FieldValidationError {
                        field: field.to_string(),
                        message,
                    })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }
}

impl Default for ToyValidation {
    fn default() -> Self {
        Self::catalog_rules()
    }
}

/// Validate a toy against the catalog rules
pub fn validate_toy(toy: &Toy) -> Result<(), ValidationError> {
    ToyValidation::catalog_rules().validate(toy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_toy_passes() {
        let mut toy = Toy::new("Teddy bear", 120.0);
        toy.img_url = Some("https://cdn.example.com/teddy.png".to_string());
        assert!(validate_toy(&toy).is_ok());
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let mut toy = Toy::new("T", 0.0);
        toy.img_url = Some("teddy.png".to_string());
        let err = validate_toy(&toy).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "price", "imgUrl"]);
    }

    #[test]
    fn test_missing_fields_report_required() {
        let err = validate_toy(&Toy::default()).unwrap_err();
        match err {
            ValidationError::FieldErrors(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].message, "Name is required");
                assert_eq!(errors[1].message, "Price is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_custom_rule_table() {
        let strict = ToyValidation::new().rule("name", validators::string_length(5, 10));
        assert!(strict.validate(&Toy::new("Kite", 1.0)).is_err());
        assert!(strict.validate(&Toy::new("Kites!", 1.0)).is_ok());
    }
}
