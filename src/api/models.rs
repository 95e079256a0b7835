use serde::Serialize;
use serde_json::Value;

/// Envelope returned by `POST /bfhl`. Exactly one of `data`/`error` is set.
#[derive(Debug, Serialize)]
pub struct BfhlResponse {
    pub is_success: bool,
    pub official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BfhlResponse {
    pub fn success(official_email: &str, data: Value) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(official_email: &str, error: impl Into<String>) -> Self {
        Self {
            is_success: false,
            official_email: official_email.to_string(),
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub is_success: bool,
    pub official_email: String,
}

#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub routes: Vec<RouteInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub is_success: bool,
    pub error: String,
}
