//! Validation rules and schema assembly.
//!
//! A [`Schema`] is assembled per provider and mode, never stored: the same
//! inputs always produce the same checks and the declared rules on the
//! field definitions are left untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::FieldDef;
use crate::provider::ProviderDef;
use crate::state::Mode;

/// Declarative validation rule for a single field value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Rule {
    String {
        #[serde(default)]
        min_len: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// String that must parse as an absolute URL.
    Url,
    /// Number within inclusive bounds.
    Number { min: i64, max: i64 },
    Bool,
}

impl Rule {
    /// Any string, including the empty one.
    pub fn string() -> Self {
        Rule::String {
            min_len: 0,
            message: None,
        }
    }

    pub fn non_empty(message: impl Into<String>) -> Self {
        Rule::String {
            min_len: 1,
            message: Some(message.into()),
        }
    }

    pub fn number(min: i64, max: i64) -> Self {
        Rule::Number { min, max }
    }
}

/// One assembled check: a field's rule plus the mode-dependent relaxations.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    pub name: String,
    pub label: String,
    pub rule: Rule,
    /// Absent and null values are accepted.
    pub optional: bool,
    /// Allowed values for select fields.
    pub allowed: Option<Vec<Value>>,
}

impl FieldCheck {
    fn required_message(&self) -> String {
        if let Rule::String {
            message: Some(message),
            ..
        } = &self.rule
        {
            return message.clone();
        }
        format!("{} is required", self.label)
    }

    fn check(&self, value: Option<&Value>) -> Option<String> {
        let value = match value {
            None | Some(Value::Null) => {
                return if self.optional {
                    None
                } else {
                    Some(self.required_message())
                };
            }
            Some(value) => value,
        };

        if let Some(message) = self.check_rule(value) {
            return Some(message);
        }

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                return Some(format!("{} must be one of the listed options", self.label));
            }
        }

        None
    }

    fn check_rule(&self, value: &Value) -> Option<String> {
        match &self.rule {
            Rule::String { min_len, message } => {
                let Some(text) = value.as_str() else {
                    return Some(format!("{} must be a string", self.label));
                };
                if self.optional && text.is_empty() {
                    return None;
                }
                if text.chars().count() < *min_len {
                    return Some(match message {
                        Some(message) => message.clone(),
                        None if *min_len == 1 => self.required_message(),
                        None => {
                            format!("{} must be at least {} characters", self.label, min_len)
                        }
                    });
                }
                None
            }
            Rule::Url => {
                let Some(text) = value.as_str() else {
                    return Some(format!("{} must be a string", self.label));
                };
                if self.optional && text.is_empty() {
                    return None;
                }
                match url::Url::parse(text) {
                    Ok(_) => None,
                    Err(_) => Some("Must be a valid URL".to_string()),
                }
            }
            Rule::Number { min, max } => {
                let Some(number) = value.as_i64() else {
                    return Some(format!("{} must be a number", self.label));
                };
                if number < *min || number > *max {
                    return Some(format!(
                        "{} must be between {} and {}",
                        self.label, min, max
                    ));
                }
                None
            }
            Rule::Bool => {
                if value.is_boolean() {
                    None
                } else {
                    Some(format!("{} must be on or off", self.label))
                }
            }
        }
    }
}

/// A set of field checks derived from a provider definition and a mode.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    checks: Vec<FieldCheck>,
}

impl Schema {
    /// Validates every check against `values`. Returns an empty map when
    /// the form is valid; keys are ordered for stable display.
    pub fn validate(&self, values: &Map<String, Value>) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        for check in &self.checks {
            if let Some(message) = check.check(values.get(&check.name)) {
                errors.insert(check.name.clone(), message);
            }
        }
        errors
    }

    /// Validates a single field. Fields without a check are always valid.
    pub fn validate_field(&self, name: &str, values: &Map<String, Value>) -> Option<String> {
        self.checks
            .iter()
            .find(|check| check.name == name)
            .and_then(|check| check.check(values.get(name)))
    }

    pub fn checks(&self) -> &[FieldCheck] {
        &self.checks
    }
}

/// Builds the schema for a provider form: the fixed `title` field plus
/// every non-message field of the provider.
///
/// In edit mode credential fields accept absence entirely; otherwise a
/// required string rule is strengthened to reject the empty string.
pub fn assemble_schema(provider: &ProviderDef, mode: Mode) -> Schema {
    let mut checks = vec![FieldCheck {
        name: "title".to_string(),
        label: "Storage Title".to_string(),
        rule: Rule::non_empty("Storage title is required"),
        optional: false,
        allowed: None,
    }];

    for field in provider.fields.iter().filter(|f| !f.kind.is_message()) {
        checks.push(assemble_check(field, mode));
    }

    Schema { checks }
}

fn assemble_check(field: &FieldDef, mode: Mode) -> FieldCheck {
    let relaxed = field.credential && mode == Mode::Edit;
    let mut rule = field.rule.clone();

    if field.required && !relaxed {
        if let Rule::String { min_len, message } = &mut rule {
            if *min_len == 0 {
                *min_len = 1;
                *message = Some(format!("{} is required", field.label));
            }
        }
    }

    FieldCheck {
        name: field.name.clone(),
        label: field.label.clone(),
        rule,
        optional: relaxed || !field.required,
        allowed: field
            .options
            .as_ref()
            .map(|opts| opts.iter().map(|opt| opt.value.clone()).collect()),
    }
}

/// Schema for the provider-selection step.
pub fn provider_step_schema() -> Schema {
    Schema {
        checks: vec![FieldCheck {
            name: "provider".to_string(),
            label: "Storage Provider".to_string(),
            rule: Rule::non_empty("Please select a storage provider"),
            optional: false,
            allowed: None,
        }],
    }
}
