//! Small stateless helpers: ids, random numbers, filler text

use rand::Rng;
use uuid::Uuid;

const LOREM_WORDS: &[&str] = &[
    "sky", "above", "port", "was", "color", "of", "television", "tuned", "to", "dead",
    "channel", "all", "this", "happened", "more", "or", "less", "had", "the", "story",
    "bit", "by", "bit", "from", "various", "people", "and", "as", "generally", "happens",
    "in", "such", "cases", "each", "time", "it", "was", "a", "different", "story",
    "pleasure", "burn", "bright", "wooden", "spinning", "tiny", "giant", "happy",
];

/// Fresh opaque identifier for locally created records
pub fn make_id() -> String {
    Uuid::new_v4().to_string()
}

/// Uniform integer in `[min, max]`; the bounds may be given in either order
pub fn random_int_inclusive(min: i64, max: i64) -> i64 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    rand::rng().random_range(low..=high)
}

/// `words` space-separated filler words
pub fn make_lorem(words: usize) -> String {
    let mut rng = rand::rng();
    (0..words)
        .map(|_| LOREM_WORDS[rng.random_range(0..LOREM_WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}
