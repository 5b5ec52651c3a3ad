use indexmap::IndexMap;
use txnflow_model::Address;

use super::extract::{RawApplication, RawLane};
use crate::model::{AccountNumber, ApplicationLane, Lane, LaneKind, NumberedAccount};

/// Per-invocation address -> account number table. Numbers follow first appearance while
/// scanning lanes in order (account address; linked, rekeyed, then clawback-from accounts).
#[derive(Debug, Default)]
struct AccountNumbers {
    numbers: IndexMap<Address, AccountNumber>,
}

impl AccountNumbers {
    fn scan(lanes: &[RawLane]) -> Self {
        let mut table = Self::default();
        for lane in lanes {
            match lane {
                RawLane::Account { address, .. } => table.see(address),
                RawLane::Application(app) => {
                    table.see(&app.linked_account);
                    app.rekeyed_accounts.iter().for_each(|a| table.see(a));
                    app.clawback_from_accounts.iter().for_each(|a| table.see(a));
                }
                RawLane::Asset(_) | RawLane::OpUp => {}
            }
        }
        table
    }

    fn see(&mut self, address: &Address) {
        if !self.numbers.contains_key(address) {
            let next = self.numbers.len() + 1;
            self.numbers.insert(address.clone(), next);
        }
    }

    fn numbered(&self, address: &Address) -> NumberedAccount {
        NumberedAccount {
            address: address.clone(),
            // Every address was seen during `scan`.
            account_number: self.numbers.get(address).copied().unwrap_or_default(),
        }
    }

    fn numbered_all(&self, addresses: &[Address]) -> Vec<NumberedAccount> {
        addresses.iter().map(|a| self.numbered(a)).collect()
    }
}

/// Assigns account numbers and lane ids (position in `merged`).
pub(crate) fn number_lanes(merged: Vec<RawLane>) -> Vec<Lane> {
    let numbers = AccountNumbers::scan(&merged);
    merged
        .into_iter()
        .enumerate()
        .map(|(id, lane)| Lane {
            id,
            kind: match lane {
                RawLane::Account { address, .. } => LaneKind::Account(numbers.numbered(&address)),
                RawLane::Application(app) => LaneKind::Application(application_lane(&numbers, app)),
                RawLane::Asset(asset) => LaneKind::Asset { asset },
                RawLane::OpUp => LaneKind::OpUp,
            },
        })
        .collect()
}

fn application_lane(numbers: &AccountNumbers, app: RawApplication) -> ApplicationLane {
    ApplicationLane {
        application_id: app.application_id,
        linked_account: numbers.numbered(&app.linked_account),
        rekeyed_accounts: numbers.numbered_all(&app.rekeyed_accounts),
        clawback_from_accounts: numbers.numbered_all(&app.clawback_from_accounts),
    }
}
