use std::collections::HashMap;

use crate::model::NormalizedRecord;

/// Broker positions grouped by exact normalized postcode.
///
/// Every position list is ascending, so candidate order always follows the
/// original broker order.
#[derive(Debug, Clone)]
pub struct BlockingIndex {
    blocks: HashMap<String, Vec<usize>>,
    all: Vec<usize>,
}

/// Candidates for one query.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSet<'a> {
    pub positions: &'a [usize],
    /// No broker record shared the postcode; `positions` is the full collection.
    pub fallback: bool,
}

impl BlockingIndex {
    pub fn build(broker: &[NormalizedRecord]) -> Self {
        let mut blocks: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, record) in broker.iter().enumerate() {
            blocks
                .entry(record.postcode_norm.clone())
                .or_default()
                .push(pos);
        }
        Self {
            blocks,
            all: (0..broker.len()).collect(),
        }
    }

    /// Positions whose `postcode_norm` equals the query's, or every position
    /// when that block is empty.
    pub fn candidates(&self, query: &NormalizedRecord) -> CandidateSet<'_> {
        match self.blocks.get(&query.postcode_norm) {
            Some(block) if !block.is_empty() => CandidateSet {
                positions: block,
                fallback: false,
            },
            _ => CandidateSet {
                positions: &self.all,
                fallback: true,
            },
        }
    }

    /// Number of distinct postcode blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
