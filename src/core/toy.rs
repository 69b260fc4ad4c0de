//! The toy entity and its closed label vocabulary
//!
//! Field names and label strings are the wire/storage schema shared with the
//! remote service and must not change.

use crate::core::error::{FieldValidationError, ValidationError};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque toy identifier, assigned by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToyId(String);

impl ToyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ToyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Category tag, drawn from a fixed vocabulary of eight names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "On wheels")]
    OnWheels,
    #[serde(rename = "Box game")]
    BoxGame,
    Art,
    Baby,
    Doll,
    Puzzle,
    Outdoor,
    #[serde(rename = "Battery Powered")]
    BatteryPowered,
}

impl Label {
    /// The whole vocabulary, in display order
    pub const ALL: [Label; 8] = [
        Label::OnWheels,
        Label::BoxGame,
        Label::Art,
        Label::Baby,
        Label::Doll,
        Label::Puzzle,
        Label::Outdoor,
        Label::BatteryPowered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::OnWheels => "On wheels",
            Label::BoxGame => "Box game",
            Label::Art => "Art",
            Label::Baby => "Baby",
            Label::Doll => "Doll",
            Label::Puzzle => "Puzzle",
            Label::Outdoor => "Outdoor",
            Label::BatteryPowered => "Battery Powered",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| {
                ValidationError::FieldErrors(vec![FieldValidationError {
                    field: "labels".to_string(),
                    message: format!("'{}' is not a known label", s),
                }])
            })
    }
}

/// One catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ToyId>,

    #[serde(default)]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "wire::lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,

    /// Available for purchase. Stock-count payloads are read as `count > 0`.
    #[serde(default, deserialize_with = "wire::lenient_in_stock")]
    pub in_stock: bool,

    #[serde(
        default,
        deserialize_with = "wire::empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub img_url: Option<String>,

    #[serde(default)]
    pub labels: IndexSet<Label>,

    #[serde(
        default,
        deserialize_with = "wire::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Toy {
    /// An unsaved toy with the given name and price and no labels
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price: Some(price),
            in_stock: true,
            img_url: None,
            labels: IndexSet::new(),
            created_at: None,
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = Label>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// True when the toy carries at least one of `labels`
    pub fn has_any_label(&self, labels: &IndexSet<Label>) -> bool {
        self.labels.iter().any(|label| labels.contains(label))
    }

    /// True once the persistence layer has assigned an id
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl Default for Toy {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            price: None,
            in_stock: false,
            img_url: None,
            labels: IndexSet::new(),
            created_at: None,
        }
    }
}

/// Tolerant decoders for payloads written by older clients, which store
/// form values verbatim (empty strings, numeric strings, stock counts).
mod wire {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Number(f64),
        Text(String),
    }

    pub fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Number(n)) => Ok(Some(n)),
            Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Scalar::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid price '{}'", s))),
            Some(Scalar::Bool(b)) => Err(D::Error::custom(format!("invalid price '{}'", b))),
        }
    }

    pub fn lenient_in_stock<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(false),
            Some(Scalar::Bool(b)) => Ok(b),
            Some(Scalar::Number(n)) => Ok(n > 0.0),
            Some(Scalar::Text(s)) => match s.as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                other => Err(D::Error::custom(format!("invalid inStock '{}'", other))),
            },
        }
    }

    pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }

    pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Text(s)) if s.is_empty() => Ok(None),
            Some(Scalar::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| D::Error::custom(format!("invalid createdAt '{}': {}", s, e))),
            // epoch milliseconds
            Some(Scalar::Number(ms)) => Ok(DateTime::from_timestamp_millis(ms as i64)),
            Some(Scalar::Bool(b)) => Err(D::Error::custom(format!("invalid createdAt '{}'", b))),
        }
    }
}
