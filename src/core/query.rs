//! Flat query-string encoding of a [`FilterBy`]
//!
//! The remote service expects flat query parameters. Unset fields are left
//! out so the backend's match-all default applies.
//!
//! # Example
//! ```text
//! GET /api/toy/?sortBy=name&sortDir=asc
//! GET /api/toy/?txt=bear&labels=Doll&labels=Baby&inStock=true&sortBy=price&sortDir=desc
//! ```

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::filter::{FilterBy, SortBy, SortDir};
use crate::core::toy::Label;

/// Query parameters sent to the `toy` resource
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToyQuery {
    /// Name pattern, only present when non-blank
    pub txt: Option<String>,

    /// Repeated `labels` key, one entry per label
    pub labels: Vec<String>,

    /// `"true"` or `"false"`, absent for "all"
    pub in_stock: Option<String>,

    pub sort_by: Option<String>,

    pub sort_dir: Option<String>,
}

impl ToyQuery {
    /// Encode a filter, omitting everything that means "no filtering"
    pub fn from_filter(filter: &FilterBy) -> Self {
        let txt = filter.txt.trim();
        Self {
            txt: (!txt.is_empty()).then(|| txt.to_string()),
            labels: filter
                .labels
                .iter()
                .map(|label| label.as_str().to_string())
                .collect(),
            in_stock: filter.in_stock.map(|b| b.to_string()),
            sort_by: Some(filter.sort_by.as_str().to_string()),
            sort_dir: Some(filter.sort_dir.as_str().to_string()),
        }
    }

    /// Key/value pairs in wire order, ready for a URL query string
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(txt) = &self.txt {
            pairs.push(("txt", txt.clone()));
        }
        for label in &self.labels {
            pairs.push(("labels", label.clone()));
        }
        if let Some(in_stock) = &self.in_stock {
            pairs.push(("inStock", in_stock.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_dir) = &self.sort_dir {
            pairs.push(("sortDir", sort_dir.clone()));
        }
        pairs
    }

    /// Collect raw pairs from a parsed query string. Unknown keys are ignored
    /// and `labels[]` is accepted as an alias of `labels`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = ToyQuery::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "txt" if !value.is_empty() => query.txt = Some(value),
                "labels" | "labels[]" => query.labels.push(value),
                "inStock" => query.in_stock = Some(value),
                "sortBy" if !value.is_empty() => query.sort_by = Some(value),
                "sortDir" if !value.is_empty() => query.sort_dir = Some(value),
                _ => {}
            }
        }
        query
    }

    /// Decode back into a filter, reporting every malformed parameter
    pub fn into_filter(self) -> Result<FilterBy, ValidationError> {
        let mut errors = Vec::new();
        let mut filter = FilterBy {
            txt: self.txt.unwrap_or_default(),
            ..FilterBy::default()
        };

        for raw in &self.labels {
            match raw.parse::<Label>() {
                Ok(label) => {
                    filter.labels.insert(label);
                }
                Err(_) => errors.push(field_error("labels", format!("unknown label '{}'", raw))),
            }
        }

        filter.in_stock = match self.in_stock.as_deref() {
            None | Some("") => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                errors.push(field_error("inStock", format!("expected true or false, got '{}'", other)));
                None
            }
        };

        if let Some(raw) = self.sort_by.as_deref() {
            match raw.parse::<SortBy>() {
                Ok(sort_by) => filter.sort_by = sort_by,
                Err(message) => errors.push(field_error("sortBy", message)),
            }
        }
        if let Some(raw) = self.sort_dir.as_deref() {
            match raw.parse::<SortDir>() {
                Ok(sort_dir) => filter.sort_dir = sort_dir,
                Err(message) => errors.push(field_error("sortDir", message)),
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }
}

fn field_error(field: &str, message: String) -> FieldValidationError {
    FieldValidationError {
        field: field.to_string(),
        message,
    }
}
