use crate::fields::{FieldDef, FieldKind};
use crate::provider::{LayoutRow, ProviderDef};
use crate::schema::Rule;

pub fn definition() -> ProviderDef {
    ProviderDef {
        name: "redis".to_string(),
        title: "Redis Storage".to_string(),
        description: "Connect a Redis database as task storage".to_string(),
        icon: Some("cloud-provider-redis".to_string()),
        fields: vec![
            FieldDef::new("host", FieldKind::Text, "Host", Rule::string())
                .placeholder("redis://example.com"),
            FieldDef::new("port", FieldKind::Text, "Port", Rule::string())
                .placeholder("6379")
                .default_of("6379"),
            FieldDef::new("db", FieldKind::Text, "Database Number (db)", Rule::string())
                .placeholder("1")
                .default_of("1"),
            FieldDef::new("password", FieldKind::Password, "Password", Rule::string())
                .credential()
                .placeholder("Your redis password")
                .default_of(""),
        ],
        layout: vec![LayoutRow::of(&["host", "port", "db", "password"])],
    }
}
