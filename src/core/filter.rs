//! Filter and sort specification applied to the catalog
//!
//! [`FilterBy`] is what the list view asks for. Adapters evaluate it
//! (remotely, or with [`FilterBy::apply`] in the local store); the engine only
//! builds it and never re-filters a list an adapter returned.

use crate::core::toy::{Label, Toy};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field the catalog is sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Name,
    Price,
    CreatedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Price => "price",
            SortBy::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortBy::Name),
            "price" => Ok(SortBy::Price),
            "createdAt" => Ok(SortBy::CreatedAt),
            other => Err(format!("unknown sort field '{}'", other)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Structured query/sort specification for the toy list
///
/// Equality treats `labels` as a set, so two filters selecting the same
/// labels in a different order are the same filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterBy {
    /// Case-insensitive pattern matched against the name; empty = no filter
    pub txt: String,

    /// Toy passes when it has at least one of these; empty = no filter
    pub labels: IndexSet<Label>,

    /// `None` = all, `Some(true)` = only in stock, `Some(false)` = only out of stock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,

    pub sort_by: SortBy,

    pub sort_dir: SortDir,
}

impl FilterBy {
    pub fn with_txt(mut self, txt: impl Into<String>) -> Self {
        self.txt = txt.into();
        self
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = Label>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    pub fn with_in_stock(mut self, in_stock: Option<bool>) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, sort_dir: SortDir) -> Self {
        self.sort_by = sort_by;
        self.sort_dir = sort_dir;
        self
    }

    /// Sort-column click: flips direction on the active column, otherwise
    /// selects the column ascending
    pub fn toggle_sort(&mut self, field: SortBy) {
        if self.sort_by == field {
            self.sort_dir = self.sort_dir.reversed();
        } else {
            self.sort_by = field;
            self.sort_dir = SortDir::Asc;
        }
    }

    /// Compiled name matcher, `None` when `txt` is blank.
    ///
    /// Text that is not a valid pattern is matched literally.
    pub fn name_matcher(&self) -> Option<NameMatcher> {
        NameMatcher::compile(&self.txt, DEFAULT_PATTERN_SIZE_LIMIT)
    }

    pub fn matches_labels(&self, toy: &Toy) -> bool {
        self.labels.is_empty() || toy.has_any_label(&self.labels)
    }

    pub fn matches_stock(&self, toy: &Toy) -> bool {
        self.in_stock.is_none_or(|wanted| toy.in_stock == wanted)
    }

    /// Whether a single toy passes every predicate of this filter
    pub fn matches(&self, toy: &Toy) -> bool {
        let matcher = self.name_matcher();
        self.matches_with(matcher.as_ref(), toy)
    }

    fn matches_with(&self, matcher: Option<&NameMatcher>, toy: &Toy) -> bool {
        matcher.is_none_or(|m| m.is_match(&toy.name))
            && self.matches_labels(toy)
            && self.matches_stock(toy)
    }

    /// Ordering of two toys under this filter's sort key and direction
    pub fn compare(&self, a: &Toy, b: &Toy) -> Ordering {
        let ordering = match self.sort_by {
            SortBy::Name => compare_names(&a.name, &b.name),
            SortBy::Price => a.price.unwrap_or(0.0).total_cmp(&b.price.unwrap_or(0.0)),
            SortBy::CreatedAt => created_or_epoch(a).cmp(&created_or_epoch(b)),
        };
        match self.sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, toys: &mut [Toy]) {
        toys.sort_by(|a, b| self.compare(a, b));
    }

    /// Filter then sort a collection, the way a backend answers a query
    pub fn apply(&self, toys: impl IntoIterator<Item = Toy>) -> Vec<Toy> {
        let matcher = self.name_matcher();
        let mut selected: Vec<Toy> = toys
            .into_iter()
            .filter(|toy| self.matches_with(matcher.as_ref(), toy))
            .collect();
        self.sort(&mut selected);
        selected
    }
}

const DEFAULT_PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Case-insensitive test applied to toy names
#[derive(Debug, Clone)]
pub enum NameMatcher {
    Pattern(Regex),
    /// Lowercased text matched as a plain substring
    Literal(String),
}

impl NameMatcher {
    fn compile(txt: &str, size_limit: usize) -> Option<Self> {
        let txt = txt.trim();
        if txt.is_empty() {
            return None;
        }
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(size_limit)
                .build()
        };
        let matcher = build(txt)
            .or_else(|_| build(&regex::escape(txt)))
            .map(NameMatcher::Pattern)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Name filter too large to compile, matching as plain text");
                NameMatcher::Literal(txt.to_lowercase())
            });
        Some(matcher)
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            NameMatcher::Pattern(re) => re.is_match(name),
            NameMatcher::Literal(txt) => name.to_lowercase().contains(txt.as_str()),
        }
    }
}

// Case-folded first so "apple" and "Banana" interleave the way a reader expects.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn created_or_epoch(toy: &Toy) -> DateTime<Utc> {
    toy.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
