//! sheetforge remote boundary.
//!
//! Everything that talks to a live spreadsheet or translation service goes
//! through the traits in [`traits`]; this crate supplies the two workflows
//! built on top of them, schema inference ([`infer_schema`]) and named-range
//! synchronization ([`sync_named_range`]), plus the shared error taxonomy
//! and the per-invocation debug ledger.

mod dictionary;
mod error;
mod ident;
mod infer;
mod ledger;
mod sync;
pub mod traits;

pub use dictionary::HEADER_DICTIONARY;
pub use error::{ErrorKind, RemoteError, ServiceError};
pub use ident::to_lower_camel;
pub use infer::{InferenceRequest, InferredSchema, infer_schema};
pub use ledger::DebugLedger;
pub use sync::{SyncOutcome, sync_named_range};
