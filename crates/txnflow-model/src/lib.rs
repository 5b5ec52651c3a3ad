#![forbid(unsafe_code)]

//! Transaction source model consumed by the `txnflow-graph` layout engine.
//!
//! The model is the boundary between whatever retrieves/maps transactions (indexer clients,
//! transaction builders) and the pure layout code:
//! - transaction kinds are sum types, so consumers match exhaustively
//! - inner transactions nest recursively under application calls
//! - an application's implicit account address is derived by an injectable [`AppAddressResolver`]

pub mod address;
pub mod error;
pub mod transaction;
mod validate;

pub use address::{Address, AppAddressResolver, ChainAppAddress};
pub use error::{Error, Result};
pub use transaction::{
    AppCallAction, AppCallTransaction, ApplicationId, AssetConfigAction, AssetConfigTransaction,
    AssetFreezeTransaction, AssetId, AssetRef, AssetTransferSubtype, AssetTransferTransaction,
    CloseRemainder, HeartbeatTransaction, KeyRegistrationTransaction, PaymentTransaction,
    StateProofTransaction, Transaction, TransactionKind, flatten_all,
};
pub use validate::{parse_transactions_json, validate_transactions};
