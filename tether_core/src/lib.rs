//! tether_core: headless storage-provider connection wizard.
//!
//! A declarative, provider-pluggable, multi-step form engine: provider
//! definitions feed schema assembly and rendering hints, a wizard session
//! sequences the steps and gatekeeps values through validation, and a
//! small facade performs the remote operations (test connection, file
//! preview, create/update) through a swappable API gateway.

pub mod api;
pub mod error;
pub mod fields;
pub mod ops;
pub mod provider;
pub mod providers;
pub mod schema;
pub mod state;
pub mod wizard;

pub use api::{ApiGateway, ApiOperation, ApiResponse, HttpGateway};
pub use error::WizardError;
pub use fields::{FieldDef, FieldKind, NumericBounds, SelectOption};
pub use ops::{format_size, RemoteFile, Target, PREVIEW_LIMIT};
pub use provider::{LayoutRow, ProviderDef};
pub use schema::{assemble_schema, Rule, Schema};
pub use state::{FormState, Mode, Step};
pub use wizard::{
    Advance, BusyFlags, WizardSession, CONNECTION_FIELDS, CREDENTIAL_PLACEHOLDER,
    IMPORT_SETTINGS_FIELDS,
};

/// Name → provider definition table, ordered by registration.
///
/// Owned by the host's composition root and passed by reference into each
/// wizard session; registrations made by one session are visible to later
/// ones through the shared table.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<ProviderDef>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in providers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for def in providers::builtin() {
            registry.register(def);
        }
        registry
    }

    /// Registers a definition, replacing any existing one under the same
    /// name. Definitions are not checked here; consistency is verified on
    /// first use.
    pub fn register(&mut self, def: ProviderDef) {
        tracing::debug!(provider = %def.name, "registering storage provider");
        if let Some(existing) = self.providers.iter_mut().find(|p| p.name == def.name) {
            *existing = def;
        } else {
            self.providers.push(def);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProviderDef> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// The first registered provider; the default selection for new
    /// sessions.
    pub fn first(&self) -> Option<&ProviderDef> {
        self.providers.first()
    }

    pub fn list(&self) -> impl Iterator<Item = &ProviderDef> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_replaces_under_the_same_name() {
        let mut registry = ProviderRegistry::with_builtins();
        let count = registry.len();

        let mut custom = providers::s3::definition();
        custom.title = "S3 (custom)".to_string();
        registry.register(custom);

        assert_eq!(registry.len(), count);
        assert_eq!(registry.get("s3").unwrap().title, "S3 (custom)");
    }

    #[test]
    fn registration_order_is_preserved() {
        let registry = ProviderRegistry::with_builtins();
        assert_eq!(registry.first().map(|p| p.name.as_str()), Some("s3"));
    }

    #[test]
    fn lookup_misses_return_none() {
        let registry = ProviderRegistry::with_builtins();
        assert!(registry.get("gopher-storage").is_none());
    }
}
