//! Sample corpus generation for the demo command.
//!
//! When no corpus is supplied we generate short receipt-like records with
//! interesting coding characteristics: a skewed word distribution, a few
//! digits and punctuation marks, and the occasional record much longer than
//! the rest.
//!
//! Generated records only use lowercase letters, digits, punctuation and
//! single spaces, so they are always encodable once fitted.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const COMMON_WORDS: &[&str] = &[
    "milk", "eggs", "bread", "apple", "cheese", "rice", "coffee", "tea", "water", "butter",
];

const RARE_WORDS: &[&str] = &[
    "quinoa", "kombucha", "zucchini", "yoghurt", "jalapeno", "wasabi", "kefir", "vinegar",
];

const UNITS: &[&str] = &["kg", "g", "lb", "oz", "pk", "ct"];

const PUNCTUATION: &[&str] = &["!", "?", ",", ".", "&", "-", "/", "%", "#", "@"];

/// Generate `records` sample records, each with 1..=`max_words` tokens.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `records`: number of records
/// - `max_words`: upper bound on tokens per record (at least 1)
pub fn generate_sample_corpus(seed: u64, records: usize, max_words: usize) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let max_words = max_words.max(1);

    (0..records)
        .map(|_| {
            let words = rng.gen_range(1..=max_words);
            let tokens: Vec<String> = (0..words).map(|_| generate_token(&mut rng)).collect();
            tokens.join(" ")
        })
        .collect()
}

/// One token, biased toward common words.
fn generate_token(rng: &mut ChaCha8Rng) -> String {
    match rng.gen_range(0..10u8) {
        // 60% common words
        0..=5 => COMMON_WORDS[rng.gen_range(0..COMMON_WORDS.len())].to_string(),

        // 10% rare words
        6 => RARE_WORDS[rng.gen_range(0..RARE_WORDS.len())].to_string(),

        // 20% quantities like "2kg" or "12.5oz"
        7..=8 => {
            let whole: u32 = rng.gen_range(1..=24);
            let unit = UNITS[rng.gen_range(0..UNITS.len())];
            if rng.gen_bool(0.3) {
                format!("{whole}.{}{unit}", rng.gen_range(0..10))
            } else {
                format!("{whole}{unit}")
            }
        }

        // 10% punctuation-decorated words
        _ => {
            let word = COMMON_WORDS[rng.gen_range(0..COMMON_WORDS.len())];
            let mark = PUNCTUATION[rng.gen_range(0..PUNCTUATION.len())];
            format!("{word}{mark}")
        }
    }
}
