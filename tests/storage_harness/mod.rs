//! Shared test harness for `ToyStore` adapters
//!
//! Provides toy fixtures, the `toy_store_tests!` conformance suite and an
//! in-process HTTP backend for exercising the remote adapter.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code, unused_macros)]

#[macro_use]
mod toy_store_tests;

#[cfg(feature = "remote")]
pub mod mock_backend;

use chrono::{DateTime, TimeZone, Utc};
use mister_toy::core::toy::{Label, Toy};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A toy without an id, ready to be created
pub fn sample_toy(name: &str, price: f64, in_stock: bool, labels: &[Label]) -> Toy {
    Toy {
        in_stock,
        labels: labels.iter().copied().collect(),
        ..Toy::new(name, price)
    }
}

/// Fixed creation time `days` days after 2024-01-01
pub fn created_on_day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default()
        + chrono::Duration::days(days)
}

/// Five toys spanning prices, labels, stock and creation times
///
/// | name        | price | stock | labels              | created |
/// |-------------|-------|-------|---------------------|---------|
/// | Teddy Bear  | 120   | yes   | Baby, Doll          | day 3   |
/// | Race Car    | 450   | no    | On wheels, Battery  | day 1   |
/// | Jigsaw      | 80    | yes   | Puzzle, Box game    | day 5   |
/// | Kite        | 60    | yes   | Outdoor             | day 2   |
/// | bear puzzle | 200   | no    | Puzzle              | day 4   |
pub fn sample_catalog() -> Vec<Toy> {
    let rows = [
        ("Teddy Bear", 120.0, true, vec![Label::Baby, Label::Doll], 3),
        (
            "Race Car",
            450.0,
            false,
            vec![Label::OnWheels, Label::BatteryPowered],
            1,
        ),
        ("Jigsaw", 80.0, true, vec![Label::Puzzle, Label::BoxGame], 5),
        ("Kite", 60.0, true, vec![Label::Outdoor], 2),
        ("bear puzzle", 200.0, false, vec![Label::Puzzle], 4),
    ];
    rows.into_iter()
        .map(|(name, price, in_stock, labels, day)| Toy {
            created_at: Some(created_on_day(day)),
            ..sample_toy(name, price, in_stock, &labels)
        })
        .collect()
}

pub fn names(toys: &[Toy]) -> Vec<&str> {
    toys.iter().map(|toy| toy.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Assertion helpers
// ---------------------------------------------------------------------------

pub fn assert_names(toys: &[Toy], expected: &[&str]) {
    assert_eq!(
        names(toys),
        expected,
        "Unexpected toys or order: {:?}",
        names(toys)
    );
}

pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
