//! Chart data derived from a toy list

use crate::core::toy::{Label, Toy};
use serde::Serialize;

/// Price histogram bucket labels, lowest first
pub const PRICE_BUCKETS: [&str; 6] = [
    "$0-100", "$101-300", "$301-500", "$501-700", "$701-900", "$901+",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStat {
    pub label: Label,
    pub count: usize,
    pub average_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBucket {
    pub range: &'static str,
    pub count: usize,
}

/// Aggregates for the dashboard charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    /// Every label of the vocabulary, in vocabulary order
    pub labels: Vec<LabelStat>,
    pub price_buckets: Vec<PriceBucket>,
}

impl DashboardStats {
    pub fn from_toys(toys: &[Toy]) -> Self {
        let in_stock = toys.iter().filter(|toy| toy.in_stock).count();

        let labels = Label::ALL
            .iter()
            .map(|&label| {
                let (count, total_price) = toys
                    .iter()
                    .filter(|toy| toy.labels.contains(&label))
                    .fold((0usize, 0.0f64), |(count, sum), toy| {
                        (count + 1, sum + toy.price.unwrap_or(0.0))
                    });
                let average_price = if count == 0 {
                    0.0
                } else {
                    total_price / count as f64
                };
                LabelStat {
                    label,
                    count,
                    average_price,
                }
            })
            .collect();

        let mut counts = [0usize; PRICE_BUCKETS.len()];
        for idx in toys.iter().filter_map(|toy| toy.price.and_then(price_bucket)) {
            counts[idx] += 1;
        }
        let price_buckets = PRICE_BUCKETS
            .iter()
            .zip(counts)
            .map(|(&range, count)| PriceBucket { range, count })
            .collect();

        Self {
            total: toys.len(),
            in_stock,
            out_of_stock: toys.len() - in_stock,
            labels,
            price_buckets,
        }
    }

    pub fn label(&self, label: Label) -> Option<&LabelStat> {
        self.labels.iter().find(|stat| stat.label == label)
    }
}

/// Bucket index for a price; negative and NaN prices fall outside every bucket
fn price_bucket(price: f64) -> Option<usize> {
    if price.is_nan() || price < 0.0 {
        return None;
    }
    let idx = match price {
        p if p <= 100.0 => 0,
        p if p <= 300.0 => 1,
        p if p <= 500.0 => 2,
        p if p <= 700.0 => 3,
        p if p <= 900.0 => 4,
        _ => 5,
    };
    Some(idx)
}
