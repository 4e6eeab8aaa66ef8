//! Per-invocation diagnostic ledger.
//!
//! Every remote workflow owns exactly one ledger and threads it through its
//! stages; terminal errors carry the ledger out so the caller sees what was
//! learned before the failure.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugLedger {
    entries: Vec<(String, String)>,
}

impl DebugLedger {
    pub fn new() -> Self {
        DebugLedger::default()
    }

    pub fn record(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Most recent value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for DebugLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_resolves_latest() {
        let mut ledger = DebugLedger::new();
        ledger.record("stage", "resolveSheet");
        ledger.record("stage", "fetchHeaderRow");
        ledger.record("sheetId", "42");

        assert_eq!(ledger.get("stage"), Some("fetchHeaderRow"));
        assert_eq!(ledger.get("sheetId"), Some("42"));
        assert_eq!(ledger.get("missing"), None);
        assert_eq!(ledger.entries().len(), 3);
    }
}
