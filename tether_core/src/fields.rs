use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::schema::Rule;

/// Kinds of inputs a provider form can render.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Password,
    Number,
    Select,
    Toggle,
    Counter,
    Textarea,
    /// Display-only content; excluded from validation and payloads.
    Message,
}

impl FieldKind {
    pub fn is_message(self) -> bool {
        matches!(self, FieldKind::Message)
    }

    pub fn is_secret(self) -> bool {
        matches!(self, FieldKind::Password)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Inclusive bounds for number and counter fields.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericBounds {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

/// One input in a provider form.
///
/// `default` is a first-class attribute, never derived by inspecting the
/// validation rule.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Credential fields are masked with a placeholder in edit mode,
    /// validation-optional there, and stripped from unchanged payloads.
    #[serde(default)]
    pub credential: bool,
    pub rule: Rule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<NumericBounds>,
    /// Display content for `Message` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FieldDef {
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        label: impl Into<String>,
        rule: Rule,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            description: None,
            placeholder: None,
            required: false,
            credential: false,
            rule,
            default: None,
            options: None,
            bounds: None,
            content: None,
        }
    }

    pub fn message(name: impl Into<String>, content: impl Into<String>) -> Self {
        let mut def = Self::new(name, FieldKind::Message, "", Rule::Bool);
        def.content = Some(content.into());
        def
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn credential(mut self) -> Self {
        self.credential = true;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn default_of(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn bounds(mut self, min: i64, max: i64, step: i64) -> Self {
        self.bounds = Some(NumericBounds { min, max, step });
        self
    }

    /// Declared default, falling back to a kind-appropriate zero value.
    pub fn default_value(&self) -> Value {
        if let Some(value) = &self.default {
            return value.clone();
        }
        match self.kind {
            FieldKind::Text | FieldKind::Password | FieldKind::Textarea => json!(""),
            FieldKind::Number | FieldKind::Counter => {
                json!(self.bounds.map(|b| b.min).unwrap_or(0))
            }
            FieldKind::Select => self
                .options
                .as_ref()
                .and_then(|opts| opts.first())
                .map(|opt| opt.value.clone())
                .unwrap_or_else(|| json!("")),
            FieldKind::Toggle => json!(false),
            FieldKind::Message => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_default_wins_over_kind_fallback() {
        let field = FieldDef::new("port", FieldKind::Text, "Port", Rule::string())
            .default_of("6379");
        assert_eq!(field.default_value(), json!("6379"));
    }

    #[test]
    fn kind_fallbacks() {
        let text = FieldDef::new("host", FieldKind::Text, "Host", Rule::string());
        assert_eq!(text.default_value(), json!(""));

        let counter =
            FieldDef::new("ttl", FieldKind::Counter, "TTL", Rule::number(1, 100)).bounds(1, 100, 1);
        assert_eq!(counter.default_value(), json!(1));

        let toggle = FieldDef::new("presign", FieldKind::Toggle, "Presign", Rule::Bool);
        assert_eq!(toggle.default_value(), json!(false));

        let select = FieldDef::new("region", FieldKind::Select, "Region", Rule::string())
            .options(vec![
                SelectOption::new("us-east-1", "US East"),
                SelectOption::new("eu-west-1", "Europe"),
            ]);
        assert_eq!(select.default_value(), json!("us-east-1"));
    }

    #[test]
    fn message_fields_carry_content_not_values() {
        let note = FieldDef::message("s3_note", "Bucket must allow list access");
        assert!(note.kind.is_message());
        assert_eq!(note.default_value(), Value::Null);
    }
}
