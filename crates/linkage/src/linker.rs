use rayon::prelude::*;

use crate::blocking::BlockingIndex;
use crate::config::{ColumnMapping, LinkConfig};
use crate::error::LinkError;
use crate::model::{Collection, Link, NormalizedRecord, RowIndex, Source};
use crate::normalize::normalize_collection;
use crate::selector::select;

#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    pub erp_columns: ColumnMapping,
    pub broker_columns: ColumnMapping,
    /// Match ERP records on the rayon pool. Output order is unaffected.
    pub parallel: bool,
}

impl From<&LinkConfig> for LinkOptions {
    fn from(config: &LinkConfig) -> Self {
        Self {
            erp_columns: config.erp.columns.clone(),
            broker_columns: config.broker.columns.clone(),
            parallel: config.parallel,
        }
    }
}

/// Link every ERP record to exactly one broker record.
///
/// `result[i]` belongs to ERP record `i`. Both collections are normalized up
/// front, so a missing field anywhere aborts before any scoring happens.
pub fn link(
    erp: &Collection,
    broker: &Collection,
    options: &LinkOptions,
) -> Result<Vec<Link>, LinkError> {
    let erp_norm = normalize_collection(Source::Erp, erp, &options.erp_columns)?;
    let broker_norm = normalize_collection(Source::Broker, broker, &options.broker_columns)?;

    if broker_norm.is_empty() {
        return Err(LinkError::EmptyBrokerCollection);
    }

    let index = BlockingIndex::build(&broker_norm);
    log::info!(
        "linking {} erp record(s) against {} broker record(s) in {} postcode block(s)",
        erp_norm.len(),
        broker_norm.len(),
        index.block_count(),
    );

    let match_one = |query: &NormalizedRecord| link_one(query, &index, &broker_norm);

    let links = if options.parallel {
        erp_norm
            .par_iter()
            .map(match_one)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        erp_norm
            .iter()
            .map(match_one)
            .collect::<Result<Vec<_>, _>>()?
    };

    log::info!("linked {} erp record(s)", links.len());
    Ok(links)
}

fn link_one(
    query: &NormalizedRecord,
    index: &BlockingIndex,
    broker: &[NormalizedRecord],
) -> Result<Link, LinkError> {
    let candidates = index.candidates(query);
    if candidates.fallback {
        log::debug!(
            "erp row {}: no broker postcode '{}', scoring all {} records",
            query.index,
            query.postcode_norm,
            candidates.positions.len(),
        );
    }

    let selection = select(query, candidates, broker).ok_or(LinkError::EmptyBrokerCollection)?;

    if selection.winners.len() > 1 {
        log::debug!(
            "erp row {}: {} broker records tie at {}, taking row {}",
            query.index,
            selection.winners.len(),
            selection.score.total,
            selection.best(),
        );
    }

    Ok(Link {
        erp_index: query.index,
        broker_index: broker[selection.best()].index,
        score: selection.score,
        fallback: candidates.fallback,
        tied: selection.winners.len(),
    })
}

/// Original broker rows for `links`, in link (ERP) order.
pub fn project(broker: &Collection, links: &[Link]) -> Result<Collection, LinkError> {
    let indices: Vec<RowIndex> = links.iter().map(|l| l.broker_index).collect();
    broker.project(&indices)
}
