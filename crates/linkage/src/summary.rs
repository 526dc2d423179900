use std::collections::HashSet;

use crate::model::{Link, LinkSummary};

/// Compute summary statistics from produced links.
pub fn compute_summary(links: &[Link], erp_records: usize, broker_records: usize) -> LinkSummary {
    let mut fallback = 0;
    let mut exact_matches = 0;
    let mut tied = 0;
    let mut score_sum = 0.0;
    let mut distinct = HashSet::new();

    for l in links {
        if l.fallback {
            fallback += 1;
        }
        if l.score.total == 100.0 {
            exact_matches += 1;
        }
        if l.tied > 1 {
            tied += 1;
        }
        score_sum += l.score.total;
        distinct.insert(l.broker_index);
    }

    let mean_score = if links.is_empty() {
        0.0
    } else {
        score_sum / links.len() as f64
    };

    LinkSummary {
        erp_records,
        broker_records,
        linked: links.len(),
        blocked: links.len() - fallback,
        fallback,
        exact_matches,
        tied,
        distinct_broker_records: distinct.len(),
        mean_score,
    }
}
