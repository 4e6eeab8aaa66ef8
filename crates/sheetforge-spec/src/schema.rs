use std::fmt;

use regex::Regex;
use schemars::JsonSchema;
use semver::Version;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use sheetforge_common::a1::column_letter_to_index;

use crate::validation::{SchemaIssue, ValidationError};

/// Current supported schema-document version.
pub const CURRENT_SPEC_VERSION: &str = "0.1.0";
/// Constant identifier for this spec.
pub const SPEC_IDENT: &str = "sheetforge";

/// YAML envelope for a hand-written schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(
    title = "sheetforge Schema Document",
    description = "Declarative column/type schema that binds one spreadsheet to a typed entity."
)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Identifier for this specification (must be `sheetforge`).
    pub spec: String,
    #[schemars(with = "String")]
    pub spec_version: SchemaVersion,
    /// The schema payload.
    pub feature: FeatureSchema,
}

impl SchemaDocument {
    /// Construct a document from a YAML string slice.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize this document to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Normalize in-place for deterministic comparison: fields are sorted by
    /// column letters.
    pub fn normalize(&mut self) {
        self.feature
            .fields
            .sort_by(|a, b| a.column.cmp(&b.column));
    }

    /// Return a normalized copy of the document.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Validate the envelope and the embedded schema.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.spec != SPEC_IDENT {
            issues.push(SchemaIssue::new(
                "spec",
                format!(
                    "expected spec identifier `{}`, found `{}`",
                    SPEC_IDENT, self.spec
                ),
            ));
        }

        let current_version = Version::parse(CURRENT_SPEC_VERSION)
            .expect("CURRENT_SPEC_VERSION must be valid semver");
        let spec_version = &self.spec_version.0;
        if spec_version.major != current_version.major
            || (current_version.major == 0 && spec_version.minor != current_version.minor)
        {
            issues.push(SchemaIssue::new(
                "spec_version",
                format!(
                    "incompatible version `{}` (expected `{}`)",
                    spec_version, current_version
                ),
            ));
        }

        self.feature.collect_issues("feature", &mut issues);

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

impl std::str::FromStr for SchemaDocument {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaDocument::from_yaml_str(s)
    }
}

/// Scalar types a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
}

/// One spreadsheet column bound to one typed attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldSchema {
    /// Field identifier exposed to generated code.
    pub name: String,
    #[serde(rename = "type")]
    /// Scalar type decoded from / encoded into the cell.
    pub field_type: FieldType,
    /// Column letters (`A`, `AB`, ...).
    pub column: String,
    /// 1-based header row shared by every field of the schema.
    pub row: u32,
    #[serde(default)]
    /// Whether generated mutations must reject a falsy value.
    pub required: bool,
    #[serde(default)]
    /// Storage hint, e.g. a `TRUE/FALSE` sentinel pair for booleans.
    pub storage_format: Option<String>,
    #[serde(default)]
    /// Optional documentation (inference stores the original header here).
    pub description: Option<String>,
}

impl FieldSchema {
    /// Zero-based column index, when the column letters are well formed.
    pub fn column_index(&self) -> Option<u32> {
        column_letter_to_index(&self.column).ok()
    }

    /// Boolean sentinel pair declared by `storage_format` (`true/false`
    /// halves of e.g. `TRUE/FALSE`).
    pub fn sentinel_pair(&self) -> Option<(&str, &str)> {
        self.storage_format.as_deref().and_then(|f| f.split_once('/'))
    }
}

/// Declarative mapping from one sheet onto a typed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FeatureSchema {
    /// Entity name (lowerCamel); drives generated function names.
    pub name: String,
    /// Title of the sheet holding the data.
    pub sheet_name: String,
    /// Declared fields. Declaration order is irrelevant: every derived
    /// behavior uses ascending column-index order.
    pub fields: Vec<FieldSchema>,
}

impl FeatureSchema {
    /// Validate the schema invariants, returning granular issues on failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        self.collect_issues("feature", &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    pub(crate) fn collect_issues(&self, prefix: &str, issues: &mut Vec<SchemaIssue>) {
        let name_pattern =
            Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("name regex must compile");

        if !name_pattern.is_match(&self.name) {
            issues.push(SchemaIssue::new(
                format!("{prefix}.name"),
                "feature name must be a letter followed by alphanumerics or '_'".to_string(),
            ));
        }
        if self.sheet_name.is_empty() {
            issues.push(SchemaIssue::new(
                format!("{prefix}.sheet_name"),
                "sheet name must not be empty".to_string(),
            ));
        }
        if self.fields.is_empty() {
            issues.push(SchemaIssue::new(
                format!("{prefix}.fields"),
                "schema must define at least one field".to_string(),
            ));
        }

        let mut seen_names = std::collections::HashSet::new();
        let mut seen_columns = std::collections::HashSet::new();
        let header_row = self.fields.first().map(|f| f.row);

        for (idx, field) in self.fields.iter().enumerate() {
            if !name_pattern.is_match(&field.name) {
                issues.push(SchemaIssue::new(
                    format!("{prefix}.fields[{idx}].name"),
                    format!("`{}` is not a valid identifier", field.name),
                ));
            }
            if !seen_names.insert(&field.name) {
                issues.push(SchemaIssue::new(
                    format!("{prefix}.fields[{idx}].name"),
                    format!("duplicate field name `{}`", field.name),
                ));
            }
            if column_letter_to_index(&field.column).is_err() {
                issues.push(SchemaIssue::new(
                    format!("{prefix}.fields[{idx}].column"),
                    format!("`{}` is not a valid column", field.column),
                ));
            } else if !seen_columns.insert(&field.column) {
                issues.push(SchemaIssue::new(
                    format!("{prefix}.fields[{idx}].column"),
                    format!("duplicate column `{}`", field.column),
                ));
            }
            if field.row == 0 {
                issues.push(SchemaIssue::new(
                    format!("{prefix}.fields[{idx}].row"),
                    "header row must be a positive integer".to_string(),
                ));
            }
            if let Some(row) = header_row {
                if field.row != row {
                    issues.push(SchemaIssue::new(
                        format!("{prefix}.fields[{idx}].row"),
                        format!(
                            "header row {} differs from row {} declared by the first field",
                            field.row, row
                        ),
                    ));
                }
            }
        }
    }

    /// Fields in canonical order: ascending column index, independent of
    /// declaration order. Fields with unparseable columns sort last.
    pub fn sorted_fields(&self) -> Vec<&FieldSchema> {
        let mut fields: Vec<&FieldSchema> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.column_index().unwrap_or(u32::MAX));
        fields
    }

    /// Natural key: the first field in canonical order.
    pub fn natural_key(&self) -> Option<&FieldSchema> {
        self.sorted_fields().into_iter().next()
    }

    /// Minimum and maximum column letters among the fields.
    ///
    /// Known limitation: letters are compared lexicographically as strings,
    /// so `Z` sorts after `AA` and schemas spanning the single/double-letter
    /// boundary derive the wrong bounds. Kept as observed behavior.
    pub fn column_bounds(&self) -> Option<(&str, &str)> {
        let first = self.fields.iter().map(|f| f.column.as_str()).min()?;
        let last = self.fields.iter().map(|f| f.column.as_str()).max()?;
        Some((first, last))
    }

    /// A1 range covering the header row, e.g. `Tasks!A1:C1`.
    pub fn header_range(&self) -> Option<String> {
        let (first, last) = self.column_bounds()?;
        let row = self.fields.first()?.row;
        Some(format!("{}!{first}{row}:{last}{row}", self.sheet_name))
    }

    /// A1 range covering the data rows, open-ended on the row axis to
    /// tolerate growth, e.g. `Tasks!A2:C`.
    pub fn data_range(&self) -> Option<String> {
        let (first, last) = self.column_bounds()?;
        let row = self.fields.first()?.row;
        Some(format!("{}!{first}{}:{last}", self.sheet_name, row + 1))
    }
}

/// Wrapper around semver::Version for serde compatibility.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SchemaVersion(pub Version);

impl SchemaVersion {
    pub fn new(version: Version) -> Self {
        Self(version)
    }

    /// The version every freshly built document carries.
    pub fn current() -> Self {
        Self(Version::parse(CURRENT_SPEC_VERSION).expect("CURRENT_SPEC_VERSION must be valid semver"))
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionVisitor;

        impl<'de> Visitor<'de> for VersionVisitor {
            type Value = SchemaVersion;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("semantic version string (e.g. 0.1.0)")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Version::parse(v)
                    .map(SchemaVersion)
                    .map_err(|err| de::Error::custom(format!("invalid spec_version: {err}")))
            }
        }

        deserializer.deserialize_str(VersionVisitor)
    }
}
