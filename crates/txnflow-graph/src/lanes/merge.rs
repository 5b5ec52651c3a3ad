use indexmap::IndexSet;
use txnflow_model::Address;

use super::extract::{RawApplication, RawLane};

/// Folds raw lane requests (in document order) into one lane per identity.
///
/// First appearance decides position. An application's linked account never gets its own
/// account lane: the application lane stands in for it, and is pulled forward to the position
/// where its account was first referenced.
pub(crate) fn merge_lanes(raw: &[RawLane]) -> Vec<RawLane> {
    raw.iter()
        .enumerate()
        .fold(Vec::new(), |merged, (index, lane)| {
            merge_lane(merged, lane, &raw[index + 1..])
        })
}

fn merge_lane(
    mut merged: Vec<RawLane>,
    incoming: &RawLane,
    upcoming: &[RawLane],
) -> Vec<RawLane> {
    match incoming {
        RawLane::Account {
            address,
            clawback_from,
        } => {
            if merged
                .iter()
                .any(|lane| matches!(lane, RawLane::Account { address: a, .. } if a == address))
            {
                return merged;
            }
            if let Some(app) = merged
                .iter_mut()
                .find_map(|lane| linked_application_mut(lane, address))
            {
                app.clawback_from_accounts = union(&app.clawback_from_accounts, clawback_from);
                return merged;
            }
            if let Some(app) = upcoming
                .iter()
                .find_map(|lane| linked_application(lane, address))
            {
                let mut app = app.clone();
                app.clawback_from_accounts = union(&app.clawback_from_accounts, clawback_from);
                merged.push(RawLane::Application(app));
                return merged;
            }
            merged.push(incoming.clone());
        }
        RawLane::Application(app) => {
            let existing = merged.iter_mut().find_map(|lane| match lane {
                RawLane::Application(existing) if existing.application_id == app.application_id => {
                    Some(existing)
                }
                _ => None,
            });
            match existing {
                Some(existing) => {
                    *existing = RawApplication {
                        application_id: existing.application_id,
                        linked_account: existing.linked_account.clone(),
                        rekeyed_accounts: union(&existing.rekeyed_accounts, &app.rekeyed_accounts),
                        clawback_from_accounts: union(
                            &existing.clawback_from_accounts,
                            &app.clawback_from_accounts,
                        ),
                    };
                }
                None => merged.push(incoming.clone()),
            }
        }
        RawLane::Asset(asset) => {
            if !merged
                .iter()
                .any(|lane| matches!(lane, RawLane::Asset(a) if a.id == asset.id))
            {
                merged.push(incoming.clone());
            }
        }
        RawLane::OpUp => {
            if !merged.iter().any(|lane| matches!(lane, RawLane::OpUp)) {
                merged.push(RawLane::OpUp);
            }
        }
    }
    merged
}

fn linked_application<'l>(lane: &'l RawLane, address: &Address) -> Option<&'l RawApplication> {
    match lane {
        RawLane::Application(app) if &app.linked_account == address => Some(app),
        _ => None,
    }
}

fn linked_application_mut<'l>(
    lane: &'l mut RawLane,
    address: &Address,
) -> Option<&'l mut RawApplication> {
    match lane {
        RawLane::Application(app) if &app.linked_account == address => Some(app),
        _ => None,
    }
}

/// `left` followed by the addresses of `right` not already present, without duplicates.
fn union(left: &[Address], right: &[Address]) -> Vec<Address> {
    left.iter()
        .chain(right)
        .collect::<IndexSet<&Address>>()
        .into_iter()
        .cloned()
        .collect()
}
