use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WizardError;
use crate::fields::{FieldDef, FieldKind};

/// One display row of the form; names reference declared fields.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LayoutRow {
    pub fields: Vec<String>,
}

impl LayoutRow {
    pub fn of(names: &[&str]) -> Self {
        Self {
            fields: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// A named bundle of field definitions plus layout and display metadata.
///
/// Definitions are plain data; internal consistency is checked on first
/// use, not at registration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProviderDef {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub fields: Vec<FieldDef>,
    pub layout: Vec<LayoutRow>,
}

impl ProviderDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Resolves a layout row to its field definitions, skipping names that
    /// do not resolve (a consistency check reports those separately).
    pub fn row_fields(&self, row: &LayoutRow) -> Vec<&FieldDef> {
        row.fields
            .iter()
            .filter_map(|name| self.field(name))
            .collect()
    }

    /// Default value for every non-message field.
    pub fn default_values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|field| !field.kind.is_message())
            .map(|field| (field.name.clone(), field.default_value()))
            .collect()
    }

    /// Checks the definition invariants: unique field names, non-empty
    /// options on selects, and layout names that resolve to fields.
    pub fn check_consistency(&self) -> Result<(), WizardError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(WizardError::InvalidDefinition(format!(
                    "provider '{}' declares field '{}' twice",
                    self.name, field.name
                )));
            }
            if field.kind == FieldKind::Select
                && field.options.as_ref().map_or(true, |opts| opts.is_empty())
            {
                return Err(WizardError::InvalidDefinition(format!(
                    "select field '{}' of provider '{}' has no options",
                    field.name, self.name
                )));
            }
        }
        for row in &self.layout {
            for name in &row.fields {
                if !seen.contains(name.as_str()) {
                    return Err(WizardError::InvalidDefinition(format!(
                        "layout of provider '{}' references unknown field '{}'",
                        self.name, name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Rule;
    use serde_json::json;

    fn minimal(fields: Vec<FieldDef>, layout: Vec<LayoutRow>) -> ProviderDef {
        ProviderDef {
            name: "test".into(),
            title: "Test".into(),
            description: String::new(),
            icon: None,
            fields,
            layout,
        }
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let def = minimal(
            vec![
                FieldDef::new("host", FieldKind::Text, "Host", Rule::string()),
                FieldDef::new("host", FieldKind::Text, "Host again", Rule::string()),
            ],
            vec![],
        );
        assert!(matches!(
            def.check_consistency(),
            Err(WizardError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn layout_must_reference_declared_fields() {
        let def = minimal(
            vec![FieldDef::new("host", FieldKind::Text, "Host", Rule::string())],
            vec![LayoutRow::of(&["host", "port"])],
        );
        assert!(def.check_consistency().is_err());
    }

    #[test]
    fn select_needs_options() {
        let def = minimal(
            vec![FieldDef::new(
                "region",
                FieldKind::Select,
                "Region",
                Rule::string(),
            )],
            vec![],
        );
        assert!(def.check_consistency().is_err());
    }

    #[test]
    fn unreferenced_fields_still_get_defaults() {
        let def = minimal(
            vec![
                FieldDef::new("host", FieldKind::Text, "Host", Rule::string()),
                FieldDef::new("port", FieldKind::Text, "Port", Rule::string())
                    .default_of("6379"),
            ],
            vec![LayoutRow::of(&["host"])],
        );
        assert!(def.check_consistency().is_ok());
        assert_eq!(def.default_values().get("port"), Some(&json!("6379")));
    }
}
