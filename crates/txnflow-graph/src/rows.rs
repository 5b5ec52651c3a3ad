use rustc_hash::FxHashMap;
use txnflow_model::{
    Address, AppCallTransaction, ApplicationId, AssetId, AssetTransferTransaction,
    PaymentTransaction, Transaction,
};

use crate::model::{Anchor, Description, Lane, LaneId, LaneKind, Row, Visualization};

/// Turns transactions into rows against a finished lane list. Holds only lookup indexes over
/// `lanes`; dropped once the rows are built.
pub(crate) struct RowBuilder<'l> {
    lanes: &'l [Lane],
    /// First Account lane, or Application lane by linked account, per address.
    by_address: FxHashMap<&'l Address, Anchor>,
    by_application: FxHashMap<ApplicationId, LaneId>,
    by_asset: FxHashMap<AssetId, LaneId>,
    op_up: Option<LaneId>,
}

impl<'l> RowBuilder<'l> {
    pub(crate) fn new(lanes: &'l [Lane]) -> Self {
        let mut by_address: FxHashMap<&'l Address, Anchor> = FxHashMap::default();
        let mut by_application = FxHashMap::default();
        let mut by_asset = FxHashMap::default();
        let mut op_up = None;

        for lane in lanes {
            match &lane.kind {
                LaneKind::Account(account) => {
                    by_address.entry(&account.address).or_insert(Anchor {
                        lane_id: Some(lane.id),
                        account_number: Some(account.account_number),
                    });
                }
                LaneKind::Application(app) => {
                    by_address.entry(&app.linked_account.address).or_insert(Anchor {
                        lane_id: Some(lane.id),
                        account_number: Some(app.linked_account.account_number),
                    });
                    by_application.entry(app.application_id).or_insert(lane.id);
                }
                LaneKind::Asset { asset } => {
                    by_asset.entry(asset.id).or_insert(lane.id);
                }
                LaneKind::OpUp => {
                    if op_up.is_none() {
                        op_up = Some(lane.id);
                    }
                }
                LaneKind::Placeholder => {}
            }
        }

        Self {
            lanes,
            by_address,
            by_application,
            by_asset,
            op_up,
        }
    }

    /// Rows for a top-level transaction list, recursing into inner transactions.
    pub(crate) fn build<'a>(&self, transactions: &'a [Transaction]) -> Vec<Row<'a>> {
        let mut rows = Vec::new();
        for (index, transaction) in transactions.iter().enumerate() {
            let has_next_sibling = index + 1 < transactions.len();
            self.push_rows(transaction, &[], has_next_sibling, 0, &mut rows);
        }
        rows
    }

    fn push_rows<'a>(
        &self,
        transaction: &'a Transaction,
        ancestors: &[usize],
        has_next_sibling: bool,
        depth: usize,
        rows: &mut Vec<Row<'a>>,
    ) {
        let enclosing: Option<&'a Transaction> =
            ancestors.last().map(|&index| rows[index].transaction);
        let parent = match enclosing {
            Some(Transaction::AppCall(call)) => Some(call),
            _ => None,
        };

        let primary = rows.len();
        let inner = transaction.inner_transactions();
        tracing::trace!(kind = %transaction.kind(), depth, primary, "building rows");
        for (leg, visualization) in self.visualize(transaction, parent).into_iter().enumerate() {
            rows.push(Row {
                transaction,
                visualization,
                ancestors: ancestors.to_vec(),
                has_next_sibling,
                has_children: leg == 0 && !inner.is_empty(),
                depth,
                is_continuation: leg > 0,
            });
        }

        if inner.is_empty() {
            return;
        }
        let mut chain = Vec::with_capacity(ancestors.len() + 1);
        chain.extend_from_slice(ancestors);
        chain.push(primary);
        for (index, child) in inner.iter().enumerate() {
            self.push_rows(child, &chain, index + 1 < inner.len(), depth + 1, rows);
        }
    }

    fn visualize(
        &self,
        transaction: &Transaction,
        parent: Option<&AppCallTransaction>,
    ) -> Vec<Visualization> {
        match transaction {
            Transaction::Payment(t) => self.payment(t, parent),
            Transaction::AssetTransfer(t) => self.asset_transfer(t, parent),
            Transaction::AppCall(t) => {
                let to = if t.is_op_up {
                    self.lane_anchor(self.op_up)
                } else {
                    self.lane_anchor(self.by_application.get(&t.application_id).copied())
                };
                vec![Visualization::connect(
                    self.from_anchor(&t.sender, parent),
                    to,
                    Description::ApplicationCall {
                        action: t.action,
                        is_op_up: t.is_op_up,
                    },
                )]
            }
            Transaction::AssetConfig(t) => vec![Visualization::connect(
                self.from_anchor(&t.sender, parent),
                self.lane_anchor(self.by_asset.get(&t.asset.id).copied()),
                Description::AssetConfig {
                    action: t.action,
                    asset: t.asset.clone(),
                },
            )],
            Transaction::AssetFreeze(t) => vec![Visualization::connect(
                self.from_anchor(&t.sender, parent),
                self.resolve(&t.target),
                Description::AssetFreeze { frozen: t.frozen },
            )],
            Transaction::KeyRegistration(t) => vec![Visualization::point(
                self.from_anchor(&t.sender, parent),
                Description::KeyReg,
            )],
            Transaction::StateProof(t) => vec![Visualization::point(
                self.from_anchor(&t.sender, parent),
                Description::StateProof,
            )],
            Transaction::Heartbeat(t) => vec![Visualization::point(
                self.from_anchor(&t.sender, parent),
                Description::Heartbeat,
            )],
        }
    }

    fn payment(
        &self,
        t: &PaymentTransaction,
        parent: Option<&AppCallTransaction>,
    ) -> Vec<Visualization> {
        let from = self.from_anchor(&t.sender, parent);
        let mut legs = vec![Visualization::connect(
            from,
            self.resolve(&t.receiver),
            Description::Payment { amount: t.amount },
        )];
        if let Some(close) = &t.close_remainder {
            legs.push(Visualization::connect(
                from,
                self.resolve(&close.to),
                Description::PaymentCloseOut {
                    amount: close.amount,
                },
            ));
        }
        legs
    }

    fn asset_transfer(
        &self,
        t: &AssetTransferTransaction,
        parent: Option<&AppCallTransaction>,
    ) -> Vec<Visualization> {
        let from = self.from_anchor(&t.sender, parent);
        let mut legs = match t.clawback_from() {
            Some(holder) => vec![
                Visualization::connect(
                    from,
                    self.resolve(holder),
                    Description::Clawback {
                        amount: t.amount,
                        asset: t.asset.clone(),
                    },
                ),
                Visualization::connect(
                    self.from_anchor(holder, parent),
                    self.resolve(&t.receiver),
                    Description::AssetTransfer {
                        amount: t.amount,
                        asset: t.asset.clone(),
                    },
                ),
            ],
            None => vec![Visualization::connect(
                from,
                self.resolve(&t.receiver),
                Description::AssetTransfer {
                    amount: t.amount,
                    asset: t.asset.clone(),
                },
            )],
        };
        if let Some(close) = &t.close_remainder {
            legs.push(Visualization::connect(
                from,
                self.resolve(&close.to),
                Description::AssetTransferRemainder {
                    amount: close.amount,
                    asset: t.asset.clone(),
                },
            ));
        }
        legs
    }

    /// Sender side of a leg. Inner transactions are drawn from the calling application's lane,
    /// labelled with the number of the account that actually sent.
    fn from_anchor(&self, sender: &Address, parent: Option<&AppCallTransaction>) -> Anchor {
        let Some(parent) = parent else {
            return self.resolve(sender);
        };
        if parent.is_op_up {
            return self.lane_anchor(self.op_up);
        }

        let Some(&lane_id) = self.by_application.get(&parent.application_id) else {
            tracing::debug!(
                application_id = parent.application_id,
                "no lane found for parent application"
            );
            return Anchor::UNRESOLVED;
        };
        let account_number = match &self.lanes[lane_id].kind {
            LaneKind::Application(app) => Some(
                app.account_number_of(sender)
                    .unwrap_or(app.linked_account.account_number),
            ),
            _ => None,
        };
        Anchor {
            lane_id: Some(lane_id),
            account_number,
        }
    }

    fn resolve(&self, address: &Address) -> Anchor {
        match self.by_address.get(address) {
            Some(anchor) => *anchor,
            None => {
                tracing::debug!(address = %address, "no lane found for address");
                Anchor::UNRESOLVED
            }
        }
    }

    fn lane_anchor(&self, lane_id: Option<LaneId>) -> Anchor {
        if lane_id.is_none() {
            tracing::debug!("no lane found for transaction target");
        }
        Anchor {
            lane_id,
            account_number: None,
        }
    }
}
