use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use tether_core::{
    Advance, ApiGateway, ApiOperation, ApiResponse, Mode, ProviderRegistry, Step, Target,
    WizardError, WizardSession, CREDENTIAL_PLACEHOLDER,
};

/// Records every call and answers from a canned response table.
#[derive(Default)]
struct MockGateway {
    responses: Mutex<Vec<(ApiOperation, ApiResponse)>>,
    calls: Mutex<Vec<(ApiOperation, Map<String, Value>, Value)>>,
}

impl MockGateway {
    fn respond(self, op: ApiOperation, status: u16, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((op, ApiResponse { status, body }));
        self
    }

    fn calls(&self) -> Vec<(ApiOperation, Map<String, Value>, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn call(
        &self,
        op: ApiOperation,
        params: &Map<String, Value>,
        body: &Value,
    ) -> Result<ApiResponse, WizardError> {
        self.calls
            .lock()
            .unwrap()
            .push((op, params.clone(), body.clone()));
        let response = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .find(|(candidate, _)| *candidate == op)
            .map(|(_, response)| response.clone())
            .unwrap_or(ApiResponse {
                status: 404,
                body: Value::Null,
            });
        Ok(response)
    }
}

fn fill_s3(session: &mut WizardSession<'_>) {
    session.set_field("title", json!("My storage"));
    session.set_field("bucket", json!("b1"));
    session.set_field("aws_access_key_id", json!("k1"));
    session.set_field("aws_secret_access_key", json!("s1"));
}

#[tokio::test]
async fn connection_test_success_is_invalidated_by_a_connection_field_edit() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    let gateway =
        MockGateway::default().respond(ApiOperation::ValidateStorage, 200, json!({"ok": true}));

    fill_s3(&mut session);
    assert!(session.test_connection(&gateway).await.unwrap());
    assert!(session.connection_verified());

    session.set_field("region_name", json!("eu-west-1"));
    assert!(!session.connection_verified());
}

#[tokio::test]
async fn failed_connection_test_clears_the_verified_flag() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    fill_s3(&mut session);

    let ok = MockGateway::default().respond(ApiOperation::ValidateStorage, 200, json!({}));
    assert!(session.test_connection(&ok).await.unwrap());

    let failing = MockGateway::default().respond(
        ApiOperation::ValidateStorage,
        500,
        json!({"detail": "no route to host"}),
    );
    assert!(!session.test_connection(&failing).await.unwrap());
    assert!(!session.connection_verified());
}

#[tokio::test]
async fn preview_reload_is_refused_until_a_field_change_invalidates_it() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    fill_s3(&mut session);

    let gateway = MockGateway::default().respond(
        ApiOperation::StorageFiles,
        200,
        json!({"files": [{"key": "tasks/0001.json", "size": 1536}]}),
    );

    assert!(session.load_files_preview(&gateway).await.unwrap());
    assert_eq!(session.files_preview().unwrap().len(), 1);
    assert_eq!(session.files_preview().unwrap()[0].key, "tasks/0001.json");

    // Second click is a no-op while a preview is present.
    assert!(matches!(
        session.load_files_preview(&gateway).await,
        Err(WizardError::PreviewLoaded)
    ));

    session.set_field("bucket", json!("b2"));
    assert!(session.files_preview().is_none());
    assert!(session.load_files_preview(&gateway).await.unwrap());
}

#[tokio::test]
async fn preview_request_is_bounded_to_the_page_limit() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    fill_s3(&mut session);

    let gateway =
        MockGateway::default().respond(ApiOperation::StorageFiles, 200, json!({"files": []}));
    session.load_files_preview(&gateway).await.unwrap();

    let calls = gateway.calls();
    let (op, params, _) = &calls[0];
    assert_eq!(*op, ApiOperation::StorageFiles);
    assert_eq!(params.get("limit"), Some(&json!(10)));
    assert_eq!(params.get("target"), Some(&json!("import")));
    assert_eq!(params.get("type"), Some(&json!("s3")));
}

#[test]
fn switching_provider_resets_fields_but_keeps_title_and_project() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 42, Target::Import).unwrap();

    session.set_field("title", json!("Shared drive"));
    session.set_field("bucket", json!("b1"));

    session.select_provider("redis").unwrap();
    assert_eq!(session.value("title"), Some(&json!("Shared drive")));
    assert_eq!(session.value("project"), Some(&json!(42)));
    assert_eq!(session.value("port"), Some(&json!("6379")));
    assert_eq!(session.value("bucket"), None);
    assert!(!session.connection_verified());
    assert!(session.files_preview().is_none());
}

#[test]
fn switching_to_an_unknown_provider_is_a_blocking_error() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    assert!(matches!(
        session.select_provider("gopher-storage"),
        Err(WizardError::UnknownProvider(_))
    ));
}

#[test]
fn edit_mode_starts_on_configure_connection_with_masked_credentials() {
    let registry = ProviderRegistry::with_builtins();
    let storage = json!({"id": 3, "type": "redis", "host": "r1", "port": "6379"});
    let session = WizardSession::edit(&registry, 1, Target::Import, &storage).unwrap();

    assert_eq!(session.mode(), Mode::Edit);
    assert_eq!(session.steps().len(), 3);
    assert_eq!(session.step(), Step::ConfigureConnection);
    assert_eq!(session.value("host"), Some(&json!("r1")));
    assert_eq!(
        session.value("password"),
        Some(&json!(CREDENTIAL_PLACEHOLDER))
    );
}

#[tokio::test]
async fn unchanged_credentials_are_absent_from_the_update_payload() {
    let registry = ProviderRegistry::with_builtins();
    let storage = json!({
        "id": 7,
        "type": "s3",
        "title": "Old storage",
        "bucket": "b1",
        "presign": true,
        "presign_ttl": 15
    });
    let mut session = WizardSession::edit(&registry, 1, Target::Import, &storage).unwrap();
    let gateway = MockGateway::default().respond(ApiOperation::UpdateStorage, 200, json!({}));

    assert!(session.create_or_update(&gateway).await.unwrap());
    assert!(session.is_complete());

    let calls = gateway.calls();
    let (op, params, body) = &calls[0];
    assert_eq!(*op, ApiOperation::UpdateStorage);
    assert_eq!(params.get("pk"), Some(&json!(7)));
    let body = body.as_object().unwrap();
    assert!(!body.contains_key("aws_access_key_id"));
    assert!(!body.contains_key("aws_secret_access_key"));
    assert_eq!(body.get("bucket"), Some(&json!("b1")));
    assert_eq!(body.get("id"), Some(&json!(7)));
}

#[test]
fn previous_is_a_no_op_on_the_first_step() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    assert_eq!(session.position(), 0);
    session.previous();
    assert_eq!(session.position(), 0);
}

#[test]
fn create_mode_rejects_jumping_ahead_edit_mode_does_not() {
    let registry = ProviderRegistry::with_builtins();

    let mut create = WizardSession::create(&registry, 1, Target::Import).unwrap();
    assert!(matches!(
        create.jump_to(2),
        Err(WizardError::StepNotReached(2))
    ));
    assert!(create.jump_to(0).is_ok());

    let storage = json!({"id": 1, "type": "localfiles", "path": "/data/"});
    let mut edit = WizardSession::edit(&registry, 1, Target::Import, &storage).unwrap();
    assert!(edit.jump_to(2).is_ok());
    assert_eq!(edit.step(), Step::Review);
    assert!(matches!(
        edit.jump_to(3),
        Err(WizardError::StepOutOfBounds(3))
    ));
}

#[tokio::test]
async fn create_flow_walks_every_step_and_submits_on_the_terminal_one() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 5, Target::Import).unwrap();
    let gateway =
        MockGateway::default().respond(ApiOperation::CreateStorage, 201, json!({"id": 11}));

    assert_eq!(session.step(), Step::SelectProvider);
    assert_eq!(session.next().unwrap(), Advance::Moved(Step::ConfigureConnection));

    // Required fields gate the step transition.
    assert!(matches!(session.next(), Err(WizardError::Validation)));
    assert!(session.errors().contains_key("bucket"));

    fill_s3(&mut session);
    assert_eq!(session.next().unwrap(), Advance::Moved(Step::Preview));
    assert_eq!(session.next().unwrap(), Advance::Moved(Step::Review));
    assert_eq!(session.next().unwrap(), Advance::Submit);

    assert!(session.create_or_update(&gateway).await.unwrap());
    assert!(session.is_complete());

    let calls = gateway.calls();
    let (op, params, body) = &calls[0];
    assert_eq!(*op, ApiOperation::CreateStorage);
    assert_eq!(params.get("project"), Some(&json!(5)));
    assert_eq!(
        body.as_object().unwrap().get("title"),
        Some(&json!("My storage"))
    );
}

#[tokio::test]
async fn failed_save_leaves_the_wizard_open() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    fill_s3(&mut session);

    let gateway = MockGateway::default().respond(
        ApiOperation::CreateStorage,
        400,
        json!({"detail": "bucket does not exist"}),
    );
    assert!(!session.create_or_update(&gateway).await.unwrap());
    assert!(!session.is_complete());
}

#[test]
fn edit_mode_with_an_unknown_storage_type_fails_fast() {
    let registry = ProviderRegistry::with_builtins();
    let storage = json!({"id": 1, "type": "gopher-storage"});
    assert!(matches!(
        WizardSession::edit(&registry, 1, Target::Import, &storage),
        Err(WizardError::UnknownProvider(_))
    ));
}

#[test]
fn field_errors_clear_the_instant_the_value_changes() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Import).unwrap();
    session.jump_to(0).unwrap();
    session.next().unwrap();

    assert!(matches!(session.next(), Err(WizardError::Validation)));
    assert!(session.errors().contains_key("bucket"));

    session.set_field("bucket", json!("b1"));
    assert!(!session.errors().contains_key("bucket"));
}

#[tokio::test]
async fn export_target_is_threaded_through_operation_params() {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, 1, Target::Export).unwrap();
    fill_s3(&mut session);

    let gateway = MockGateway::default().respond(ApiOperation::ValidateStorage, 200, json!({}));
    session.test_connection(&gateway).await.unwrap();

    let calls = gateway.calls();
    assert_eq!(calls[0].1.get("target"), Some(&json!("export")));
}
