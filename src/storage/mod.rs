//! Storage implementations for the `ToyStore` adapter contract

pub mod local;
#[cfg(feature = "remote")]
pub mod remote;

pub use local::{LocalStorageError, LocalToyStore};
#[cfg(feature = "remote")]
pub use remote::HttpToyStore;
