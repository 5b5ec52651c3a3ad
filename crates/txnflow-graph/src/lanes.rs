//! Lane construction: extract raw requests per transaction, merge identities, then number
//! accounts and assign ids.

mod extract;
mod merge;
mod numbering;

use txnflow_model::{AppAddressResolver, Transaction, flatten_all};

use crate::model::Lane;

/// Builds the final (pre-placeholder) lane list for a whole transaction tree.
pub(crate) fn build_lanes(
    transactions: &[Transaction],
    app_address: &dyn AppAddressResolver,
) -> Vec<Lane> {
    let raw: Vec<extract::RawLane> = flatten_all(transactions)
        .into_iter()
        .flat_map(|transaction| extract::extract_lanes(transaction, app_address))
        .collect();
    let merged = merge::merge_lanes(&raw);
    tracing::trace!(raw = raw.len(), merged = merged.len(), "merged lane requests");
    numbering::number_lanes(merged)
}
