//! HTTP transport seam for the API client.
//!
//! `HttpTransport` abstracts the single operation the client needs from
//! an HTTP stack: execute a request, hand back status and body. The
//! production implementation wraps `reqwest`; tests substitute a scripted
//! transport so the refresh/retry behavior can be exercised without a
//! server.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use super::ApiError;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A request the client wants executed. Cloneable so the interceptor can
/// replay it after a session refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    /// POST with no body (`/logout`, `/refresh-token`).
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            method: Method::PATCH,
            path: path.into(),
            body: None,
        }
    }
}

/// Status and body of an executed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_auth_expired(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Production transport backed by `reqwest`.
///
/// The cookie store carries the opaque session credential the server
/// issues on login, so a replayed request automatically picks up
/// whatever the refresh endpoint set.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(ApiResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let req = ApiRequest::get("/get-user");
        assert_eq!(req.method, Method::GET);
        assert!(req.body.is_none());

        let req = ApiRequest::post("/login", serde_json::json!({"email": "a@b.com"}));
        assert_eq!(req.method, Method::POST);
        assert!(req.body.is_some());
    }

    #[test]
    fn test_base_url_join() {
        let transport = ReqwestTransport::new("http://localhost:5000/api/").expect("client builds");
        assert_eq!(transport.url("/login"), "http://localhost:5000/api/login");
    }

    #[test]
    fn test_response_json_error() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: "not json".to_string(),
        };
        let parsed: Result<serde_json::Value, _> = response.json();
        assert!(matches!(parsed, Err(ApiError::InvalidResponse(_))));
    }
}
