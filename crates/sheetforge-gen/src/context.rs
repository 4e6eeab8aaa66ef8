use std::collections::BTreeMap;

use sheetforge_spec::FeatureSchema;

/// Casing variants of the feature name used while instantiating templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureNames {
    /// Name exactly as supplied by the caller.
    pub raw: String,
    /// lowerCamel variant; names local variables in generated code.
    pub camel: String,
    /// UpperCamel variant; names the entity type in signatures.
    pub pascal: String,
}

impl FeatureNames {
    pub fn new(raw: &str) -> Self {
        let mut chars = raw.chars();
        let (camel, pascal) = match chars.next() {
            Some(first) => {
                let rest = chars.as_str();
                (
                    format!("{}{rest}", first.to_lowercase()),
                    format!("{}{rest}", first.to_uppercase()),
                )
            }
            None => (String::new(), String::new()),
        };
        FeatureNames {
            raw: raw.to_string(),
            camel,
            pascal,
        }
    }
}

/// Per-call input to the code generator. Constructed fresh for every
/// generation request; never shared or cached.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub names: FeatureNames,
    pub schema: Option<FeatureSchema>,
    pub range_name: Option<String>,
    pub custom_params: BTreeMap<String, String>,
}

impl OperationContext {
    pub fn new(feature_name: &str) -> Self {
        OperationContext {
            names: FeatureNames::new(feature_name),
            schema: None,
            range_name: None,
            custom_params: BTreeMap::new(),
        }
    }

    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_range_name(mut self, range_name: impl Into<String>) -> Self {
        self.range_name = Some(range_name.into());
        self
    }

    pub fn with_custom_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.custom_params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_variants() {
        let names = FeatureNames::new("task");
        assert_eq!(names.raw, "task");
        assert_eq!(names.camel, "task");
        assert_eq!(names.pascal, "Task");

        let names = FeatureNames::new("OrderLine");
        assert_eq!(names.camel, "orderLine");
        assert_eq!(names.pascal, "OrderLine");
    }
}
