use crate::models::Source;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status})"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub sync_url: String,
}

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_SYNC_URL: &str = "http://localhost:8090";

fn env_string(env: &wasm_bindgen::JsValue, upper: &str, lower: &str) -> Option<String> {
    // Both spellings are accepted: UPPER_CASE (documented in README) and
    // lower_case (legacy/implementation detail).
    for key in [upper, lower] {
        if let Ok(v) = js_sys::Reflect::get(env, &(*key).into()) {
            if let Some(s) = v.as_string() {
                return Some(s);
            }
        }
    }
    None
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut api_url = DEFAULT_API_URL.to_string();
        let mut sync_url = DEFAULT_SYNC_URL.to_string();

        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Some(url) = env_string(&env, "API_URL", "api_url") {
                        api_url = url;
                    }
                    if let Some(url) = env_string(&env, "SYNC_URL", "sync_url") {
                        sync_url = url;
                    }
                }
            }
        }

        Self { api_url, sync_url }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize, Debug)]
struct SourceListResponse {
    data: Vec<Source>,
}

/// Client for the dashboard backend (currently only the source list).
///
/// Source fetch failures never affect editing; callers surface them as an
/// empty list plus an inline notice.
#[derive(Clone)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    pub async fn get_source_list(&self) -> ApiResult<Vec<Source>> {
        let client = reqwest::Client::new();
        let res = client
            .get(format!("{}/api/fetch-sources", self.base_url))
            .send()
            .await
            .map_err(ApiError::network)?;

        if !res.status().is_success() {
            return Err(ApiError::http(res.status(), "Failed to fetch sources"));
        }

        let body: SourceListResponse = res.json().await.map_err(ApiError::parse)?;
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_list_response_contract_deserialize() {
        let json = r#"{"data": [
            {"id": 1, "name": "events", "type": "clickhouse", "credentials": {}},
            {"id": 2, "name": "", "type": "bigquery"}
        ]}"#;
        let parsed: SourceListResponse =
            serde_json::from_str(json).expect("source list should parse");
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].source_type, "clickhouse");
        // name/credentials are optional on the wire.
        assert_eq!(parsed.data[1].name, "");
        assert!(parsed.data[1].credentials.is_null());
    }

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:8080".to_string());
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_api_error_display_is_message() {
        let e = ApiError {
            kind: ApiErrorKind::Http,
            message: "Failed to fetch sources (500)".to_string(),
        };
        assert_eq!(e.to_string(), "Failed to fetch sources (500)");
    }
}
