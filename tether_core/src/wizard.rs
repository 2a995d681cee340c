//! The wizard session: form state, step sequencing, validation, and the
//! remote operations facade.
//!
//! A session is owned by exactly one wizard instance and discarded when
//! the wizard closes; remote operations take `&mut self`, so a result can
//! never land on a session that changed underneath it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::{ApiGateway, ApiOperation};
use crate::error::WizardError;
use crate::ops::{clean_payload, RemoteFile, Target, PREVIEW_LIMIT};
use crate::provider::ProviderDef;
use crate::schema::{assemble_schema, provider_step_schema, Schema};
use crate::state::{FormState, Mode, Step};
use crate::ProviderRegistry;

/// Opaque sentinel shown in place of stored credentials in edit mode.
/// Distinguishable from any real secret; never submitted.
pub const CREDENTIAL_PLACEHOLDER: &str = "••••••••••••••••";

/// Fields whose edits invalidate a prior connection test and file preview.
pub const CONNECTION_FIELDS: &[&str] = &[
    "bucket",
    "container",
    "path",
    "host",
    "port",
    "db",
    "password",
    "account_name",
    "account_key",
    "google_application_credentials",
    "region_name",
    "s3_endpoint",
];

/// Import settings invalidate the same way: a loaded preview no longer
/// reflects what an import would pick up.
pub const IMPORT_SETTINGS_FIELDS: &[&str] =
    &["prefix", "regex_filter", "use_blob_urls", "recursive_scan"];

const TITLE: &str = "title";
const PROVIDER: &str = "provider";
const PROJECT: &str = "project";

/// Per-operation in-flight flags; each control disables independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyFlags {
    pub test_connection: bool,
    pub load_preview: bool,
    pub submit: bool,
}

/// Outcome of [`WizardSession::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(Step),
    /// The terminal step validated; the driver should call
    /// [`WizardSession::create_or_update`].
    Submit,
}

pub struct WizardSession<'r> {
    registry: &'r ProviderRegistry,
    mode: Mode,
    target: Target,
    project: i64,
    storage_id: Option<i64>,
    state: FormState,
    errors: BTreeMap<String, String>,
    connection_verified: bool,
    files_preview: Option<Vec<RemoteFile>>,
    busy: BusyFlags,
}

impl<'r> WizardSession<'r> {
    /// Opens the wizard for a new storage connection. The initial provider
    /// is the first registered one, falling back to `s3`.
    pub fn create(
        registry: &'r ProviderRegistry,
        project: i64,
        target: Target,
    ) -> Result<Self, WizardError> {
        let provider = registry
            .first()
            .map(|def| def.name.clone())
            .unwrap_or_else(|| "s3".to_string());

        let mut session = Self {
            registry,
            mode: Mode::Create,
            target,
            project,
            storage_id: None,
            state: FormState::default(),
            errors: BTreeMap::new(),
            connection_verified: false,
            files_preview: None,
            busy: BusyFlags::default(),
        };
        session.state.values = session.common_values();
        session.apply_provider_defaults(&provider)?;
        Ok(session)
    }

    /// Opens the wizard over an existing storage record. The provider is
    /// fixed to the record's type and provider selection is skipped;
    /// credential fields show the placeholder sentinel instead of secrets.
    pub fn edit(
        registry: &'r ProviderRegistry,
        project: i64,
        target: Target,
        storage: &Value,
    ) -> Result<Self, WizardError> {
        let record = storage
            .as_object()
            .ok_or_else(|| WizardError::InvalidStorage("expected a JSON object".to_string()))?;
        let provider = record
            .get("type")
            .or_else(|| record.get(PROVIDER))
            .and_then(Value::as_str)
            .unwrap_or("s3")
            .to_string();
        let def = registry
            .get(&provider)
            .ok_or_else(|| WizardError::UnknownProvider(provider.clone()))?;
        def.check_consistency()?;

        let mut session = Self {
            registry,
            mode: Mode::Edit,
            target,
            project,
            storage_id: record.get("id").and_then(Value::as_i64),
            state: FormState::default(),
            errors: BTreeMap::new(),
            connection_verified: false,
            files_preview: None,
            busy: BusyFlags::default(),
        };

        let mut values = session.common_values();
        for (key, value) in record {
            if key != "id" {
                values.insert(key.clone(), value.clone());
            }
        }
        for field in &def.fields {
            if field.credential {
                values.insert(field.name.clone(), Value::from(CREDENTIAL_PLACEHOLDER));
            } else if field.kind == crate::fields::FieldKind::Counter {
                // Stored counters that were never set come back as null or 0.
                let stale = values
                    .get(&field.name)
                    .map(|v| v.is_null() || v.as_i64() == Some(0))
                    .unwrap_or(true);
                if stale {
                    values.insert(field.name.clone(), field.default_value());
                }
            }
        }
        values.insert(PROVIDER.to_string(), Value::from(provider));
        session.state.values = values;
        Ok(session)
    }

    fn common_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert(PROJECT.to_string(), Value::from(self.project));
        values.insert(TITLE.to_string(), Value::from(""));
        values.insert("use_blob_urls".to_string(), Value::from(false));
        values.insert("recursive_scan".to_string(), Value::from(true));
        values.insert("regex_filter".to_string(), Value::from(""));
        values
    }

    // --- Accessors ---

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn steps(&self) -> &'static [Step] {
        self.mode.steps()
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn step(&self) -> Step {
        self.steps()[self.state.position]
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.state.values
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.state.values.get(name)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    pub fn connection_verified(&self) -> bool {
        self.connection_verified
    }

    pub fn files_preview(&self) -> Option<&[RemoteFile]> {
        self.files_preview.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    pub fn storage_id(&self) -> Option<i64> {
        self.storage_id
    }

    pub fn provider_name(&self) -> &str {
        self.value(PROVIDER).and_then(Value::as_str).unwrap_or("s3")
    }

    pub fn provider(&self) -> Result<&'r ProviderDef, WizardError> {
        let name = self.provider_name();
        self.registry
            .get(name)
            .ok_or_else(|| WizardError::UnknownProvider(name.to_string()))
    }

    // --- Field updates ---

    /// Updates one field. The field's error clears immediately; edits to
    /// connection-affecting or import-settings fields also clear any prior
    /// connection-test result and file preview. That rule lives here and
    /// nowhere else.
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.state.values.insert(name.to_string(), value);
        self.errors.remove(name);
        if CONNECTION_FIELDS.contains(&name) || IMPORT_SETTINGS_FIELDS.contains(&name) {
            self.invalidate_results();
        }
    }

    /// Switches the selected provider: provider-specific values reset to
    /// the new provider's defaults while `title` and `project` survive, and
    /// any confirmed connection test or loaded preview is cleared.
    pub fn select_provider(&mut self, name: &str) -> Result<(), WizardError> {
        self.apply_provider_defaults(name)?;
        self.errors.remove(PROVIDER);
        self.invalidate_results();
        Ok(())
    }

    fn apply_provider_defaults(&mut self, name: &str) -> Result<(), WizardError> {
        let def = self
            .registry
            .get(name)
            .ok_or_else(|| WizardError::UnknownProvider(name.to_string()))?;
        def.check_consistency()?;

        let mut values = self.common_values();
        for key in [TITLE, "use_blob_urls", "recursive_scan", "regex_filter"] {
            if let Some(existing) = self.state.values.get(key) {
                values.insert(key.to_string(), existing.clone());
            }
        }
        values.extend(def.default_values());
        values.insert(PROVIDER.to_string(), Value::from(name));
        self.state.values = values;
        debug!(provider = name, "provider defaults applied");
        Ok(())
    }

    fn invalidate_results(&mut self) {
        if self.connection_verified || self.files_preview.is_some() {
            debug!("connection parameters changed; clearing verified state and preview");
        }
        self.connection_verified = false;
        self.files_preview = None;
    }

    // --- Validation ---

    fn schema_for_step(&self, step: Step) -> Result<Option<Schema>, WizardError> {
        match step {
            Step::SelectProvider => Ok(Some(provider_step_schema())),
            Step::ConfigureConnection => Ok(Some(assemble_schema(self.provider()?, self.mode))),
            // Preview and review content is informational or derived.
            Step::Preview | Step::Review => Ok(None),
        }
    }

    /// Validates one field against the current step's schema, updating only
    /// that field's error entry.
    pub fn validate_field(&mut self, name: &str) -> Result<bool, WizardError> {
        let Some(schema) = self.schema_for_step(self.step())? else {
            return Ok(true);
        };
        match schema.validate_field(name, &self.state.values) {
            Some(message) => {
                self.errors.insert(name.to_string(), message);
                Ok(false)
            }
            None => {
                self.errors.remove(name);
                Ok(true)
            }
        }
    }

    /// Validates the current step, replacing the whole error map. Steps
    /// without a schema are always valid.
    pub fn validate_all(&mut self) -> Result<bool, WizardError> {
        match self.schema_for_step(self.step())? {
            Some(schema) => {
                self.errors = schema.validate(&self.state.values);
                Ok(self.errors.is_empty())
            }
            None => {
                self.errors.clear();
                Ok(true)
            }
        }
    }

    /// Validates the full assembled form regardless of step; used for the
    /// terminal transition and submission.
    fn validate_full(&mut self) -> Result<bool, WizardError> {
        let schema = assemble_schema(self.provider()?, self.mode);
        self.errors = schema.validate(&self.state.values);
        Ok(self.errors.is_empty())
    }

    // --- Step sequencing ---

    /// Validates and advances. On the terminal step the full form is
    /// validated and `Advance::Submit` asks the driver to run
    /// [`Self::create_or_update`].
    pub fn next(&mut self) -> Result<Advance, WizardError> {
        if self.state.position + 1 == self.steps().len() {
            if !self.validate_full()? {
                return Err(WizardError::Validation);
            }
            return Ok(Advance::Submit);
        }
        if !self.validate_all()? {
            return Err(WizardError::Validation);
        }
        self.state.position += 1;
        Ok(Advance::Moved(self.step()))
    }

    /// Steps back without validation; a no-op on the first step.
    pub fn previous(&mut self) {
        self.state.position = self.state.position.saturating_sub(1);
    }

    /// Direct navigation. Edit mode allows any in-bounds step; create mode
    /// rejects skipping ahead of the current position.
    pub fn jump_to(&mut self, position: usize) -> Result<(), WizardError> {
        if position >= self.steps().len() {
            return Err(WizardError::StepOutOfBounds(position));
        }
        if self.mode == Mode::Create && position > self.state.position {
            return Err(WizardError::StepNotReached(position));
        }
        self.state.position = position;
        Ok(())
    }

    // --- Remote operations ---

    fn payload(&self) -> Value {
        clean_payload(&self.state.values, self.mode, self.storage_id)
    }

    fn op_params(&self, op: ApiOperation) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("target".to_string(), Value::from(self.target.as_str()));
        params.insert("type".to_string(), Value::from(self.provider_name()));
        match op {
            ApiOperation::StorageFiles => {
                params.insert("limit".to_string(), Value::from(PREVIEW_LIMIT));
            }
            ApiOperation::CreateStorage => {
                params.insert(PROJECT.to_string(), Value::from(self.project));
            }
            ApiOperation::UpdateStorage => {
                params.insert(PROJECT.to_string(), Value::from(self.project));
                if let Some(pk) = self.storage_id {
                    params.insert("pk".to_string(), Value::from(pk));
                }
            }
            ApiOperation::ValidateStorage => {}
        }
        params
    }

    /// Submits the cleaned values to the validation endpoint. Success sets
    /// the verified flag; any failure clears it. Never auto-retried.
    pub async fn test_connection(
        &mut self,
        gateway: &dyn ApiGateway,
    ) -> Result<bool, WizardError> {
        if self.busy.test_connection {
            return Err(WizardError::Busy("test connection"));
        }
        if !self.validate_all()? {
            return Err(WizardError::Validation);
        }

        self.busy.test_connection = true;
        let result = gateway
            .call(
                ApiOperation::ValidateStorage,
                &self.op_params(ApiOperation::ValidateStorage),
                &self.payload(),
            )
            .await;
        self.busy.test_connection = false;

        match result {
            Ok(response) => {
                self.connection_verified = response.ok();
                debug!(verified = self.connection_verified, "connection test finished");
                Ok(self.connection_verified)
            }
            Err(err) => {
                self.connection_verified = false;
                Err(err)
            }
        }
    }

    /// Fetches a bounded listing of remote files. Refused while a preview
    /// is already loaded; the caller must change a field to invalidate it
    /// first.
    pub async fn load_files_preview(
        &mut self,
        gateway: &dyn ApiGateway,
    ) -> Result<bool, WizardError> {
        if self.busy.load_preview {
            return Err(WizardError::Busy("load preview"));
        }
        if self.files_preview.is_some() {
            return Err(WizardError::PreviewLoaded);
        }
        if !self.validate_all()? {
            return Err(WizardError::Validation);
        }

        self.busy.load_preview = true;
        let result = gateway
            .call(
                ApiOperation::StorageFiles,
                &self.op_params(ApiOperation::StorageFiles),
                &self.payload(),
            )
            .await;
        self.busy.load_preview = false;

        match result {
            Ok(response) if response.ok() => {
                let files = response
                    .body
                    .get("files")
                    .cloned()
                    .map(serde_json::from_value::<Vec<RemoteFile>>);
                match files {
                    Some(Ok(files)) => {
                        debug!(count = files.len(), "file preview loaded");
                        self.files_preview = Some(files);
                        Ok(true)
                    }
                    // Malformed listing is a plain operation failure.
                    _ => {
                        self.files_preview = None;
                        Ok(false)
                    }
                }
            }
            Ok(_) => {
                self.files_preview = None;
                Ok(false)
            }
            Err(err) => {
                self.files_preview = None;
                Err(err)
            }
        }
    }

    /// Submits the cleaned values to the create endpoint, or to the update
    /// endpoint when editing an existing record. Success marks the session
    /// complete; failure leaves the wizard open.
    pub async fn create_or_update(
        &mut self,
        gateway: &dyn ApiGateway,
    ) -> Result<bool, WizardError> {
        if self.busy.submit {
            return Err(WizardError::Busy("submit"));
        }
        if !self.validate_full()? {
            return Err(WizardError::Validation);
        }

        let op = if self.storage_id.is_some() {
            ApiOperation::UpdateStorage
        } else {
            ApiOperation::CreateStorage
        };

        self.busy.submit = true;
        let result = gateway.call(op, &self.op_params(op), &self.payload()).await;
        self.busy.submit = false;

        match result {
            Ok(response) if response.ok() => {
                self.state.is_complete = true;
                debug!(op = op.name(), "storage saved");
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
