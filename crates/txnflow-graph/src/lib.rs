#![forbid(unsafe_code)]

//! Swimlane layout for transaction flows.
//!
//! [`layout_transactions`] turns an ordered list of transactions (with arbitrarily nested inner
//! transactions) into a [`TransactionsGraphData`]: one lane per participant (account,
//! application, asset, op-up marker) and one row per visual flow, anchored to those lanes.
//!
//! Design goals:
//! - pure and deterministic: every call builds its own working state and discards it
//! - never fails: unresolvable anchors are reported as `lane_id: None`
//! - renderer-friendly: contiguous lane ids, document-order rows, ascending vector lane ids

mod lanes;
pub mod model;
mod rows;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use txnflow_model::{AppAddressResolver, ChainAppAddress, Transaction};

use crate::rows::RowBuilder;

pub use model::{
    AccountNumber, Anchor, ApplicationLane, Description, Direction, Lane, LaneId, LaneKind,
    NumberedAccount, PointVisualization, Row, SelfLoopVisualization, TransactionsGraphData,
    VectorVisualization, Visualization,
};
pub use txnflow_model;

/// When to append the trailing [`LaneKind::Placeholder`] lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderMode {
    /// Only when a self-loop sits on the last lane and would otherwise clip.
    #[default]
    WhenNeeded,
    Always,
    Never,
}

#[derive(Clone)]
pub struct LayoutOptions {
    pub app_address: Arc<dyn AppAddressResolver + Send + Sync>,
    pub placeholder: PlaceholderMode,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            app_address: Arc::new(ChainAppAddress),
            placeholder: PlaceholderMode::default(),
        }
    }
}

impl fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("app_address", &"<resolver>")
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

impl LayoutOptions {
    /// Overrides how an application id maps to its implicit account address.
    ///
    /// Useful for tests and for networks with a different derivation; the resolver must be pure.
    pub fn with_app_address(
        mut self,
        resolver: impl AppAddressResolver + Send + Sync + 'static,
    ) -> Self {
        self.app_address = Arc::new(resolver);
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderMode) -> Self {
        self.placeholder = placeholder;
        self
    }
}

/// Lanes for `transactions` (every nesting level), merged and numbered, without the trailing
/// placeholder.
pub fn layout_lanes(transactions: &[Transaction], options: &LayoutOptions) -> Vec<Lane> {
    lanes::build_lanes(transactions, options.app_address.as_ref())
}

/// Builds the full graph model. Lanes are finalized before any row is built; rows follow the
/// top-level list in order, each application call followed by its inner transactions.
pub fn layout_transactions<'a>(
    transactions: &'a [Transaction],
    options: &LayoutOptions,
) -> TransactionsGraphData<'a> {
    let mut lanes = layout_lanes(transactions, options);
    let rows = RowBuilder::new(&lanes).build(transactions);

    let append_placeholder = match options.placeholder {
        PlaceholderMode::Always => true,
        PlaceholderMode::Never => false,
        PlaceholderMode::WhenNeeded => lanes
            .len()
            .checked_sub(1)
            .is_some_and(|last| rows.iter().any(|row| row.visualization.is_self_loop_at(last))),
    };
    if append_placeholder {
        lanes.push(Lane {
            id: lanes.len(),
            kind: LaneKind::Placeholder,
        });
    }

    tracing::debug!(
        transactions = transactions.len(),
        lanes = lanes.len(),
        rows = rows.len(),
        placeholder = append_placeholder,
        "laid out transaction graph"
    );

    TransactionsGraphData { lanes, rows }
}
