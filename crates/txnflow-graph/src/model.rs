use serde::{Serialize, Serializer};
use txnflow_model::{
    Address, AppCallAction, ApplicationId, AssetConfigAction, AssetRef, Transaction,
};

/// Position of a lane in [`TransactionsGraphData::lanes`].
pub type LaneId = usize;

/// Display aid distinguishing repeated participants; starts at 1.
pub type AccountNumber = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedAccount {
    pub address: Address,
    pub account_number: AccountNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationLane {
    pub application_id: ApplicationId,
    /// The application's own implicit account.
    pub linked_account: NumberedAccount,
    /// Senders of this application's inner transactions other than the linked account.
    pub rekeyed_accounts: Vec<NumberedAccount>,
    /// Holders clawed back from by this application's inner asset transfers.
    pub clawback_from_accounts: Vec<NumberedAccount>,
}

impl ApplicationLane {
    /// Account number of `address` if this lane represents it, checking the linked account,
    /// then rekeyed accounts, then clawback sources.
    pub fn account_number_of(&self, address: &Address) -> Option<AccountNumber> {
        std::iter::once(&self.linked_account)
            .chain(&self.rekeyed_accounts)
            .chain(&self.clawback_from_accounts)
            .find(|account| &account.address == address)
            .map(|account| account.account_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum LaneKind {
    Account(NumberedAccount),
    Application(ApplicationLane),
    Asset { asset: AssetRef },
    OpUp,
    /// Trailing empty column, never a transaction endpoint.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lane {
    pub id: LaneId,
    #[serde(flatten)]
    pub kind: LaneKind,
}

impl Lane {
    /// Every account carried by this lane, in numbering order.
    pub fn accounts(&self) -> Vec<&NumberedAccount> {
        match &self.kind {
            LaneKind::Account(account) => vec![account],
            LaneKind::Application(app) => std::iter::once(&app.linked_account)
                .chain(&app.rekeyed_accounts)
                .chain(&app.clawback_from_accounts)
                .collect(),
            LaneKind::Asset { .. } | LaneKind::OpUp | LaneKind::Placeholder => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// What a visualization depicts, with the payload its label is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Description {
    Payment { amount: u64 },
    PaymentCloseOut { amount: u64 },
    AssetTransfer { amount: u64, asset: AssetRef },
    AssetTransferRemainder { amount: u64, asset: AssetRef },
    Clawback { amount: u64, asset: AssetRef },
    ApplicationCall {
        action: AppCallAction,
        #[serde(rename = "isOpUp")]
        is_op_up: bool,
    },
    AssetConfig { action: AssetConfigAction, asset: AssetRef },
    AssetFreeze { frozen: bool },
    KeyReg,
    StateProof,
    Heartbeat,
}

/// Where one end of a visualization sits. `lane_id: None` marks an address that matched no
/// lane; renderers decide how to show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub lane_id: Option<LaneId>,
    pub account_number: Option<AccountNumber>,
}

impl Anchor {
    pub const UNRESOLVED: Self = Self {
        lane_id: None,
        account_number: None,
    };
}

/// Arrow between two distinct lanes. Lane ids are ascending (`from_lane_id <= to_lane_id`);
/// `direction` records which end is the semantic receiver. Account numbers are not reordered:
/// `from_account_number` is always the sender's and `to_account_number` the receiver's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorVisualization {
    pub from_lane_id: Option<LaneId>,
    pub from_account_number: Option<AccountNumber>,
    pub to_lane_id: Option<LaneId>,
    pub to_account_number: Option<AccountNumber>,
    pub direction: Direction,
    pub description: Description,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfLoopVisualization {
    pub lane_id: Option<LaneId>,
    /// Sender's number. Differs from `to_account_number` when two accounts of one application
    /// lane transact with each other.
    pub from_account_number: Option<AccountNumber>,
    pub to_account_number: Option<AccountNumber>,
    pub description: Description,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointVisualization {
    pub lane_id: Option<LaneId>,
    pub account_number: Option<AccountNumber>,
    pub description: Description,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Visualization {
    Vector(VectorVisualization),
    SelfLoop(SelfLoopVisualization),
    Point(PointVisualization),
}

impl Visualization {
    /// Builds a self-loop when both anchors share a lane, otherwise a vector with ascending lane
    /// ids. Unresolved anchors order before every real lane. Only lane ids are normalized; account
    /// numbers stay with the sender and receiver.
    pub fn connect(from: Anchor, to: Anchor, description: Description) -> Self {
        if from.lane_id == to.lane_id {
            return Self::SelfLoop(SelfLoopVisualization {
                lane_id: from.lane_id,
                from_account_number: from.account_number,
                to_account_number: to.account_number,
                description,
            });
        }

        let (direction, from_lane_id, to_lane_id) = if from.lane_id < to.lane_id {
            (Direction::LeftToRight, from.lane_id, to.lane_id)
        } else {
            (Direction::RightToLeft, to.lane_id, from.lane_id)
        };
        Self::Vector(VectorVisualization {
            from_lane_id,
            from_account_number: from.account_number,
            to_lane_id,
            to_account_number: to.account_number,
            direction,
            description,
        })
    }

    pub fn point(at: Anchor, description: Description) -> Self {
        Self::Point(PointVisualization {
            lane_id: at.lane_id,
            account_number: at.account_number,
            description,
        })
    }

    pub fn description(&self) -> &Description {
        match self {
            Self::Vector(v) => &v.description,
            Self::SelfLoop(v) => &v.description,
            Self::Point(v) => &v.description,
        }
    }

    pub fn is_self_loop_at(&self, lane_id: LaneId) -> bool {
        matches!(self, Self::SelfLoop(v) if v.lane_id == Some(lane_id))
    }
}

/// One rendered flow line. Multi-leg transactions produce a primary row followed by
/// continuation rows sharing the same transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row<'a> {
    /// Serialized without inner transactions; those appear as rows of their own.
    #[serde(serialize_with = "serialize_row_transaction")]
    pub transaction: &'a Transaction,
    pub visualization: Visualization,
    /// Indices into [`TransactionsGraphData::rows`] of the enclosing application calls' primary
    /// rows, outermost first.
    pub ancestors: Vec<usize>,
    pub has_next_sibling: bool,
    pub has_children: bool,
    pub depth: usize,
    pub is_continuation: bool,
}

#[derive(Serialize)]
#[serde(tag = "type", rename = "AppCall", rename_all = "camelCase")]
struct AppCallSummary<'t> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'t str>,
    sender: &'t Address,
    application_id: ApplicationId,
    is_op_up: bool,
    action: AppCallAction,
    inner_transaction_count: usize,
}

fn serialize_row_transaction<S: Serializer>(
    transaction: &&Transaction,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match transaction {
        Transaction::AppCall(call) => AppCallSummary {
            id: call.id.as_deref(),
            sender: &call.sender,
            application_id: call.application_id,
            is_op_up: call.is_op_up,
            action: call.action,
            inner_transaction_count: call.inner_transactions.len(),
        }
        .serialize(serializer),
        other => other.serialize(serializer),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionsGraphData<'a> {
    pub lanes: Vec<Lane>,
    pub rows: Vec<Row<'a>>,
}

impl<'a> TransactionsGraphData<'a> {
    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id)
    }

    /// Rows produced for `transaction` (compared by identity, not by value).
    pub fn rows_for<'s>(
        &'s self,
        transaction: &'s Transaction,
    ) -> impl Iterator<Item = &'s Row<'a>> + 's {
        self.rows
            .iter()
            .filter(move |row| std::ptr::eq(row.transaction, transaction))
    }
}
