use thiserror::Error;

use crate::ledger::DebugLedger;

/// Failure reported by a boundary service (sheet or translation backend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

/// Terminal failure classes. Transient service failures never appear here;
/// they are absorbed into the ledger by the degraded paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("header row not found in the provided sheet/headers")]
    HeaderMismatch,
    #[error("service call failed: {0}")]
    Service(String),
}

/// A terminal error together with the debug ledger accumulated up to the
/// point of failure, so callers can diagnose without re-executing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub ledger: DebugLedger,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, ledger: DebugLedger) -> Self {
        RemoteError { kind, ledger }
    }
}
