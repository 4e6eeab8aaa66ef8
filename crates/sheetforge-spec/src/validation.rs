use std::error::Error;
use std::fmt;

/// One granular validation finding, addressed by a path into the document
/// (e.g. `feature.fields[2].column`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    path: String,
    message: String,
}

impl SchemaIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaIssue {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Aggregate of every invariant violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<SchemaIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        ValidationError { issues }
    }

    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema validation failed")?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}
