//! Core module containing the catalog's domain types and adapter contract

pub mod error;
pub mod events;
pub mod filter;
pub mod query;
pub mod service;
pub mod toy;
pub mod util;
pub mod validation;

pub use error::{CatalogError, CatalogResult, ErrorKind, TransportError, ValidationError};
pub use events::{Notification, NotificationBus, NotificationLevel};
pub use filter::{FilterBy, SortBy, SortDir};
pub use query::ToyQuery;
pub use service::ToyStore;
pub use toy::{Label, Toy, ToyId};
pub use validation::{ToyValidation, validate_toy};
