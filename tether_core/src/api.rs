//! API gateway seam: every remote operation goes through a single
//! `call(operation, params, body)` entry point so drivers and tests can
//! swap the transport.

use async_trait::async_trait;
use serde_json::{Map, Value};
use url::Url;

use crate::error::WizardError;

/// The four remote operations the wizard performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    ValidateStorage,
    StorageFiles,
    CreateStorage,
    UpdateStorage,
}

impl ApiOperation {
    pub fn name(self) -> &'static str {
        match self {
            ApiOperation::ValidateStorage => "validateStorage",
            ApiOperation::StorageFiles => "storageFiles",
            ApiOperation::CreateStorage => "createStorage",
            ApiOperation::UpdateStorage => "updateStorage",
        }
    }
}

/// Response envelope: HTTP-style status plus the decoded body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn call(
        &self,
        op: ApiOperation,
        params: &Map<String, Value>,
        body: &Value,
    ) -> Result<ApiResponse, WizardError>;
}

/// reqwest-backed gateway against the platform API.
pub struct HttpGateway {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, WizardError> {
        let base = Url::parse(base_url)
            .map_err(|e| WizardError::BadBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            token,
        })
    }

    fn endpoint(&self, op: ApiOperation, params: &Map<String, Value>) -> Result<Url, WizardError> {
        let target = str_param(params, "target").unwrap_or("import");
        let kind = str_param(params, "type").unwrap_or("s3");

        let path = match op {
            ApiOperation::ValidateStorage => {
                format!("api/storages/{target}/{kind}/validate")
            }
            ApiOperation::StorageFiles => format!("api/storages/{target}/{kind}/files"),
            ApiOperation::CreateStorage => format!("api/storages/{target}/{kind}"),
            ApiOperation::UpdateStorage => {
                let pk = params
                    .get("pk")
                    .and_then(Value::as_i64)
                    .ok_or(WizardError::MissingParam("pk"))?;
                format!("api/storages/{target}/{kind}/{pk}")
            }
        };

        let mut url = self
            .base
            .join(&path)
            .map_err(|e| WizardError::BadBaseUrl(e.to_string()))?;
        for key in ["project", "limit"] {
            if let Some(value) = params.get(key) {
                url.query_pairs_mut().append_pair(key, &plain(value));
            }
        }
        Ok(url)
    }
}

fn str_param<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn call(
        &self,
        op: ApiOperation,
        params: &Map<String, Value>,
        body: &Value,
    ) -> Result<ApiResponse, WizardError> {
        let url = self.endpoint(op, params)?;
        tracing::debug!(op = op.name(), %url, "calling storage API");

        let mut request = match op {
            ApiOperation::UpdateStorage => self.client.patch(url),
            _ => self.client.post(url),
        };
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {token}"));
        }

        let response = request.json(body).send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn endpoints_are_scoped_by_target_and_type() {
        let gw = HttpGateway::new("http://localhost:8080/", None).unwrap();

        let url = gw
            .endpoint(
                ApiOperation::ValidateStorage,
                &params(&[("target", json!("export")), ("type", json!("redis"))]),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/storages/export/redis/validate"
        );

        let url = gw
            .endpoint(
                ApiOperation::StorageFiles,
                &params(&[
                    ("target", json!("import")),
                    ("type", json!("s3")),
                    ("limit", json!(10)),
                ]),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/storages/import/s3/files?limit=10"
        );
    }

    #[test]
    fn update_requires_a_pk() {
        let gw = HttpGateway::new("http://localhost:8080/", None).unwrap();
        let missing = gw.endpoint(
            ApiOperation::UpdateStorage,
            &params(&[("type", json!("s3"))]),
        );
        assert!(missing.is_err());

        let url = gw
            .endpoint(
                ApiOperation::UpdateStorage,
                &params(&[("type", json!("s3")), ("pk", json!(42))]),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/storages/import/s3/42"
        );
    }
}
