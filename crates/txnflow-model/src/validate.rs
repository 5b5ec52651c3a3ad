use crate::address::Address;
use crate::transaction::{CloseRemainder, Transaction};
use crate::{Error, Result};

/// Decodes a JSON array of transactions and checks it with [`validate_transactions`].
pub fn parse_transactions_json(text: &str) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_str(text)?;
    validate_transactions(&transactions)?;
    Ok(transactions)
}

/// Structural checks the type system cannot express: every address a transaction names must be
/// non-empty. The error path uses JSON notation, e.g. `[0].innerTransactions[1].receiver`.
pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    for (index, transaction) in transactions.iter().enumerate() {
        validate_transaction(transaction, &format!("[{index}]"))?;
    }
    Ok(())
}

fn validate_transaction(transaction: &Transaction, path: &str) -> Result<()> {
    require_address(transaction.sender(), path, "sender")?;

    match transaction {
        Transaction::Payment(t) => {
            require_address(&t.receiver, path, "receiver")?;
            validate_close_remainder(t.close_remainder.as_ref(), path)?;
        }
        Transaction::AssetTransfer(t) => {
            require_address(&t.receiver, path, "receiver")?;
            validate_close_remainder(t.close_remainder.as_ref(), path)?;
            if let Some(from) = t.clawback_from() {
                require_address(from, path, "clawbackFrom")?;
            }
        }
        Transaction::AppCall(t) => {
            for (index, inner) in t.inner_transactions.iter().enumerate() {
                validate_transaction(inner, &format!("{path}.innerTransactions[{index}]"))?;
            }
        }
        Transaction::AssetFreeze(t) => require_address(&t.target, path, "target")?,
        Transaction::AssetConfig(_)
        | Transaction::KeyRegistration(_)
        | Transaction::StateProof(_)
        | Transaction::Heartbeat(_) => {}
    }

    Ok(())
}

fn validate_close_remainder(close: Option<&CloseRemainder>, path: &str) -> Result<()> {
    match close {
        Some(close) => require_address(&close.to, path, "closeRemainder.to"),
        None => Ok(()),
    }
}

fn require_address(address: &Address, path: &str, field: &str) -> Result<()> {
    if address.is_empty() {
        return Err(Error::InvalidTransaction {
            path: format!("{path}.{field}"),
            message: "address must not be empty".to_string(),
        });
    }
    Ok(())
}
