use indexmap::IndexSet;
use txnflow_model::{
    Address, AppAddressResolver, AppCallTransaction, ApplicationId, AssetRef, Transaction,
};

/// A lane request derived from one transaction, before merging and numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawLane {
    Account {
        address: Address,
        /// Clawback sources this account acted for; folded into an application lane when the
        /// account turns out to be that application's linked account.
        clawback_from: Vec<Address>,
    },
    Application(RawApplication),
    Asset(AssetRef),
    OpUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawApplication {
    pub application_id: ApplicationId,
    pub linked_account: Address,
    pub rekeyed_accounts: Vec<Address>,
    pub clawback_from_accounts: Vec<Address>,
}

impl RawLane {
    fn account(address: &Address) -> Self {
        Self::Account {
            address: address.clone(),
            clawback_from: Vec::new(),
        }
    }
}

/// Lane requests implied by `transaction` alone. Inner transactions are only inspected to
/// describe the calling application; callers feed them through separately.
pub(crate) fn extract_lanes(
    transaction: &Transaction,
    app_address: &dyn AppAddressResolver,
) -> Vec<RawLane> {
    match transaction {
        Transaction::Payment(t) => {
            let mut lanes = vec![RawLane::account(&t.sender), RawLane::account(&t.receiver)];
            if let Some(close) = &t.close_remainder {
                lanes.push(RawLane::account(&close.to));
            }
            lanes
        }
        Transaction::AssetTransfer(t) => {
            let mut lanes = Vec::with_capacity(4);
            match t.clawback_from() {
                Some(from) => {
                    lanes.push(RawLane::Account {
                        address: t.sender.clone(),
                        clawback_from: vec![from.clone()],
                    });
                    lanes.push(RawLane::account(from));
                }
                None => lanes.push(RawLane::account(&t.sender)),
            }
            lanes.push(RawLane::account(&t.receiver));
            if let Some(close) = &t.close_remainder {
                lanes.push(RawLane::account(&close.to));
            }
            lanes
        }
        Transaction::AppCall(t) if t.is_op_up => vec![RawLane::account(&t.sender), RawLane::OpUp],
        Transaction::AppCall(t) => vec![
            RawLane::account(&t.sender),
            RawLane::Application(raw_application(t, app_address)),
        ],
        Transaction::AssetConfig(t) => vec![
            RawLane::account(&t.sender),
            RawLane::Asset(t.asset.clone()),
        ],
        Transaction::AssetFreeze(t) => {
            vec![RawLane::account(&t.sender), RawLane::account(&t.target)]
        }
        Transaction::KeyRegistration(t) => vec![RawLane::account(&t.sender)],
        Transaction::StateProof(t) => vec![RawLane::account(&t.sender)],
        Transaction::Heartbeat(t) => vec![RawLane::account(&t.sender)],
    }
}

fn raw_application(
    call: &AppCallTransaction,
    app_address: &dyn AppAddressResolver,
) -> RawApplication {
    let linked_account = app_address.app_address(call.application_id);

    let rekeyed_accounts: IndexSet<&Address> = call
        .inner_transactions
        .iter()
        .map(Transaction::sender)
        .filter(|sender| **sender != linked_account)
        .collect();

    let clawback_from_accounts: IndexSet<&Address> = call
        .inner_transactions
        .iter()
        .filter_map(|inner| match inner {
            Transaction::AssetTransfer(t) => t.clawback_from(),
            _ => None,
        })
        .collect();

    RawApplication {
        application_id: call.application_id,
        rekeyed_accounts: rekeyed_accounts.into_iter().cloned().collect(),
        clawback_from_accounts: clawback_from_accounts.into_iter().cloned().collect(),
        linked_account,
    }
}
