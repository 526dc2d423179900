//! Token-set similarity scoring.
//!
//! Scores are integers in `0..=100`, computed the way the conventional
//! "token set ratio" does: word order and one side holding a superset of the
//! other's words do not lower the score.

use std::collections::BTreeSet;

use crate::model::{MatchScore, NormalizedRecord};

/// Scorer-side cleanup: keep ASCII only, turn anything that is not a letter,
/// digit or underscore into a space, lowercase, trim.
pub fn default_process(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    cleaned.trim().to_string()
}

/// Length of the longest common subsequence, in chars.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Indel-normalized similarity, `100 * (1 - indel / (len_a + len_b))`,
/// rounded half-to-even. Equal strings score 100, an empty side scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    let indel = total - 2 * lcs_len(&a, &b);
    let similarity = (total - indel) as f64 / total as f64;
    (100.0 * similarity).round_ties_even() as u8
}

/// Token-set ratio of two strings.
///
/// Both sides go through `default_process`, split on whitespace into sets,
/// and are rebuilt as `sect`, `sect + a_only`, `sect + b_only` (each sorted).
/// The result is the best pairwise `ratio` among those three strings.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let pa = default_process(a);
    let pb = default_process(b);
    if pa.is_empty() || pb.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = pa.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = pb.split_whitespace().collect();

    let sect = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    let combined_a = format!("{sect} {only_a}").trim().to_string();
    let combined_b = format!("{sect} {only_b}").trim().to_string();

    ratio(&sect, &combined_a)
        .max(ratio(&sect, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join<'s, 't: 's>(tokens: impl Iterator<Item = &'s &'t str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// Score a broker candidate against an ERP query: token-set ratio on name and
/// address, combined by arithmetic mean.
pub fn score(query: &NormalizedRecord, candidate: &NormalizedRecord) -> MatchScore {
    let name = token_set_ratio(&candidate.name_norm, &query.name_norm);
    let address = token_set_ratio(&candidate.address_norm, &query.address_norm);
    MatchScore {
        name,
        address,
        total: (f64::from(name) + f64::from(address)) / 2.0,
    }
}
