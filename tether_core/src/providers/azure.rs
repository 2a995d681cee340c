use crate::fields::{FieldDef, FieldKind};
use crate::provider::{LayoutRow, ProviderDef};
use crate::schema::Rule;

pub fn definition() -> ProviderDef {
    ProviderDef {
        name: "azure".to_string(),
        title: "Azure Blob Storage".to_string(),
        description: "Connect an Azure Blob Storage container".to_string(),
        icon: Some("cloud-provider-azure".to_string()),
        fields: vec![
            FieldDef::new(
                "container",
                FieldKind::Text,
                "Container Name",
                Rule::non_empty("Container name is required"),
            )
            .required()
            .placeholder("my-container"),
            FieldDef::new(
                "account_name",
                FieldKind::Password,
                "Account Name",
                Rule::non_empty("Account name is required"),
            )
            .required()
            .credential()
            .placeholder("mystorageaccount"),
            FieldDef::new(
                "account_key",
                FieldKind::Password,
                "Account Key",
                Rule::non_empty("Account key is required"),
            )
            .required()
            .credential()
            .placeholder("Your account key"),
        ],
        layout: vec![
            LayoutRow::of(&["container"]),
            LayoutRow::of(&["account_name", "account_key"]),
        ],
    }
}
