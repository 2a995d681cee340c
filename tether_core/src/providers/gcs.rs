use crate::fields::{FieldDef, FieldKind};
use crate::provider::{LayoutRow, ProviderDef};
use crate::schema::Rule;

pub fn definition() -> ProviderDef {
    ProviderDef {
        name: "gcs".to_string(),
        title: "Google Cloud Storage".to_string(),
        description: "Connect a Google Cloud Storage bucket".to_string(),
        icon: Some("cloud-provider-gcs".to_string()),
        fields: vec![
            FieldDef::new(
                "bucket",
                FieldKind::Text,
                "Bucket Name",
                Rule::non_empty("Bucket name is required"),
            )
            .required()
            .placeholder("my-gcs-bucket"),
            FieldDef::new(
                "google_application_credentials",
                FieldKind::Textarea,
                "Google Application Credentials",
                Rule::string(),
            )
            .credential()
            .description(
                "Contents of the service account JSON key; leave empty to use \
                 application default credentials",
            )
            .default_of(""),
            FieldDef::new(
                "google_project_id",
                FieldKind::Text,
                "Google Project ID",
                Rule::string(),
            )
            .placeholder("my-project-id")
            .default_of(""),
            FieldDef::new(
                "presign",
                FieldKind::Toggle,
                "Use pre-signed URLs (On) / Proxy through the platform (Off)",
                Rule::Bool,
            )
            .default_of(true),
            FieldDef::new(
                "presign_ttl",
                FieldKind::Counter,
                "Expire pre-signed URLs (minutes)",
                Rule::number(1, 10080),
            )
            .bounds(1, 10080, 1)
            .default_of(15),
        ],
        layout: vec![
            LayoutRow::of(&["bucket"]),
            LayoutRow::of(&["google_application_credentials"]),
            LayoutRow::of(&["google_project_id"]),
            LayoutRow::of(&["presign", "presign_ttl"]),
        ],
    }
}
