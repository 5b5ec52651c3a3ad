use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;

pub type ApplicationId = u64;
pub type AssetId = u64;

/// Reference to an asset. Identity is the numeric `id`; the remaining fields are display hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub id: AssetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
}

impl AssetRef {
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRemainder {
    pub to: Address,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
    pub receiver: Address,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_remainder: Option<CloseRemainder>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "camelCase")]
pub enum AssetTransferSubtype {
    #[default]
    Plain,
    /// Moves the asset out of a third party's holding using the asset's clawback authority.
    Clawback {
        #[serde(rename = "clawbackFrom")]
        clawback_from: Address,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransferTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
    pub receiver: Address,
    pub asset: AssetRef,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_remainder: Option<CloseRemainder>,
    #[serde(flatten)]
    pub subtype: AssetTransferSubtype,
}

impl AssetTransferTransaction {
    pub fn clawback_from(&self) -> Option<&Address> {
        match &self.subtype {
            AssetTransferSubtype::Plain => None,
            AssetTransferSubtype::Clawback { clawback_from } => Some(clawback_from),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppCallAction {
    #[default]
    Call,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppCallTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
    pub application_id: ApplicationId,
    /// Calls made only to raise the group's opcode budget.
    #[serde(default)]
    pub is_op_up: bool,
    #[serde(default)]
    pub action: AppCallAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner_transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetConfigAction {
    #[default]
    Create,
    Reconfigure,
    Destroy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetConfigTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
    pub asset: AssetRef,
    #[serde(default)]
    pub action: AssetConfigAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFreezeTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
    pub target: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub frozen: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRegistrationTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateProofTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: Address,
}

/// A semantic transaction, top-level or inner.
///
/// Inner transactions share the same shape; only [`AppCallTransaction`] carries children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Transaction {
    Payment(PaymentTransaction),
    AssetTransfer(AssetTransferTransaction),
    AppCall(AppCallTransaction),
    AssetConfig(AssetConfigTransaction),
    AssetFreeze(AssetFreezeTransaction),
    KeyRegistration(KeyRegistrationTransaction),
    StateProof(StateProofTransaction),
    Heartbeat(HeartbeatTransaction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Payment,
    AssetTransfer,
    AppCall,
    AssetConfig,
    AssetFreeze,
    KeyRegistration,
    StateProof,
    Heartbeat,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "Payment",
            Self::AssetTransfer => "AssetTransfer",
            Self::AppCall => "AppCall",
            Self::AssetConfig => "AssetConfig",
            Self::AssetFreeze => "AssetFreeze",
            Self::KeyRegistration => "KeyRegistration",
            Self::StateProof => "StateProof",
            Self::Heartbeat => "Heartbeat",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Payment(_) => TransactionKind::Payment,
            Self::AssetTransfer(_) => TransactionKind::AssetTransfer,
            Self::AppCall(_) => TransactionKind::AppCall,
            Self::AssetConfig(_) => TransactionKind::AssetConfig,
            Self::AssetFreeze(_) => TransactionKind::AssetFreeze,
            Self::KeyRegistration(_) => TransactionKind::KeyRegistration,
            Self::StateProof(_) => TransactionKind::StateProof,
            Self::Heartbeat(_) => TransactionKind::Heartbeat,
        }
    }

    pub fn id(&self) -> Option<&str> {
        let id = match self {
            Self::Payment(t) => &t.id,
            Self::AssetTransfer(t) => &t.id,
            Self::AppCall(t) => &t.id,
            Self::AssetConfig(t) => &t.id,
            Self::AssetFreeze(t) => &t.id,
            Self::KeyRegistration(t) => &t.id,
            Self::StateProof(t) => &t.id,
            Self::Heartbeat(t) => &t.id,
        };
        id.as_deref()
    }

    pub fn sender(&self) -> &Address {
        match self {
            Self::Payment(t) => &t.sender,
            Self::AssetTransfer(t) => &t.sender,
            Self::AppCall(t) => &t.sender,
            Self::AssetConfig(t) => &t.sender,
            Self::AssetFreeze(t) => &t.sender,
            Self::KeyRegistration(t) => &t.sender,
            Self::StateProof(t) => &t.sender,
            Self::Heartbeat(t) => &t.sender,
        }
    }

    /// Inner transactions in document order. Empty for every kind except application calls.
    pub fn inner_transactions(&self) -> &[Transaction] {
        match self {
            Self::AppCall(t) => &t.inner_transactions,
            _ => &[],
        }
    }

    /// Pre-order walk: this transaction, then each inner transaction's own walk.
    pub fn flatten(&self) -> Vec<&Transaction> {
        let mut out = Vec::new();
        self.collect_flattened(&mut out);
        out
    }

    fn collect_flattened<'a>(&'a self, out: &mut Vec<&'a Transaction>) {
        out.push(self);
        for inner in self.inner_transactions() {
            inner.collect_flattened(out);
        }
    }
}

/// Flattens a whole transaction list (top-level plus every inner transaction at every depth)
/// in document order.
pub fn flatten_all(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut out = Vec::with_capacity(transactions.len());
    for transaction in transactions {
        transaction.collect_flattened(&mut out);
    }
    out
}

impl From<PaymentTransaction> for Transaction {
    fn from(value: PaymentTransaction) -> Self {
        Self::Payment(value)
    }
}

impl From<AssetTransferTransaction> for Transaction {
    fn from(value: AssetTransferTransaction) -> Self {
        Self::AssetTransfer(value)
    }
}

impl From<AppCallTransaction> for Transaction {
    fn from(value: AppCallTransaction) -> Self {
        Self::AppCall(value)
    }
}

impl From<AssetConfigTransaction> for Transaction {
    fn from(value: AssetConfigTransaction) -> Self {
        Self::AssetConfig(value)
    }
}

impl From<AssetFreezeTransaction> for Transaction {
    fn from(value: AssetFreezeTransaction) -> Self {
        Self::AssetFreeze(value)
    }
}

impl From<KeyRegistrationTransaction> for Transaction {
    fn from(value: KeyRegistrationTransaction) -> Self {
        Self::KeyRegistration(value)
    }
}

impl From<StateProofTransaction> for Transaction {
    fn from(value: StateProofTransaction) -> Self {
        Self::StateProof(value)
    }
}

impl From<HeartbeatTransaction> for Transaction {
    fn from(value: HeartbeatTransaction) -> Self {
        Self::Heartbeat(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay(sender: &str, receiver: &str) -> Transaction {
        PaymentTransaction {
            sender: sender.into(),
            receiver: receiver.into(),
            amount: 1,
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn flatten_walks_inner_transactions_in_document_order() {
        let nested = AppCallTransaction {
            sender: "APP1".into(),
            application_id: 2,
            inner_transactions: vec![pay("APP2", "D")],
            ..Default::default()
        };
        let outer: Transaction = AppCallTransaction {
            sender: "A".into(),
            application_id: 1,
            inner_transactions: vec![pay("APP1", "B"), nested.into(), pay("APP1", "C")],
            ..Default::default()
        }
        .into();

        let senders: Vec<&str> = outer.flatten().iter().map(|t| t.sender().as_str()).collect();
        assert_eq!(senders, vec!["A", "APP1", "APP1", "APP2", "APP1"]);

        let list = [pay("X", "Y"), outer];
        let all = flatten_all(&list);
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].kind(), TransactionKind::Payment);
        assert_eq!(all[1].kind(), TransactionKind::AppCall);
    }

    #[test]
    fn non_app_calls_have_no_inner_transactions() {
        assert!(pay("A", "B").inner_transactions().is_empty());
    }
}
