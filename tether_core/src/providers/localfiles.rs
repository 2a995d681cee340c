use crate::fields::{FieldDef, FieldKind};
use crate::provider::{LayoutRow, ProviderDef};
use crate::schema::Rule;

pub fn definition() -> ProviderDef {
    ProviderDef {
        name: "localfiles".to_string(),
        title: "Local Files".to_string(),
        description: "Serve files from a directory on the platform host".to_string(),
        icon: Some("document".to_string()),
        fields: vec![FieldDef::new(
            "path",
            FieldKind::Text,
            "Absolute local path",
            Rule::non_empty("Path is required"),
        )
        .required()
        .placeholder("/data/my-folder/")],
        layout: vec![LayoutRow::of(&["path"])],
    }
}
