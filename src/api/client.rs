use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, ApiResult, AuthApi, Credential, RechargeApi, UnauthorizedHook};
use crate::dto::*;
use crate::history::HistoryFilters;
use crate::models::{Operator, Plan, Recharge, ServiceType, Summary, User};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Where the browser and the server find the recharge backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// REST client for the recharge backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credential: Credential,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, credential: Credential) -> ApiResult<Self> {
        let base_url = Url::parse(config.api_base_url.trim())
            .map_err(|e| ApiError::InvalidRequest(format!("bad API URL {}: {e}", config.api_base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "API URL {} cannot carry a path",
                config.api_base_url
            )));
        }

        let builder = reqwest::Client::builder();
        // Browser fetch has no client-level timeout.
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            credential,
            on_unauthorized: None,
        })
    }

    /// Install the handler run whenever the backend answers 401.
    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    /// Same backend and connection pool, bound to another credential slot.
    /// The unauthorized hook is not carried over.
    pub fn with_credential(&self, credential: Credential) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credential,
            on_unauthorized: None,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL joined with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("cannot extend {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "Backend request");
        let request = self.http.request(method, url);
        Ok(match self.credential.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Send and return the raw body of a successful response.
    async fn send_raw(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return Ok(body);
        }

        let message = error_message(status, &body);
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected credential");
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(ApiError::Unauthorized(message));
        }

        tracing::warn!(status = status.as_u16(), %message, "Backend call failed");
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        self.send::<Envelope<T>>(request).await.map(|envelope| envelope.data)
    }
}

/// The backend's `message` field, else a generic status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}

impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let builder = self.request(Method::POST, &["auth", "login"])?.json(request);
        self.send_data(builder).await
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<()> {
        let builder = self.request(Method::POST, &["auth", "signup"])?.json(request);
        self.send_raw(builder).await.map(|_| ())
    }

    async fn current_user(&self) -> ApiResult<User> {
        let builder = self.request(Method::GET, &["auth", "me"])?;
        self.send::<ProfileBody>(builder).await.map(ProfileBody::into_user)
    }
}

impl RechargeApi for ApiClient {
    async fn services(&self) -> ApiResult<Vec<ServiceDto>> {
        let builder = self.request(Method::GET, &["services"])?;
        self.send_data(builder).await
    }

    async fn operators(&self, service_type: ServiceType) -> ApiResult<Vec<Operator>> {
        let builder = self
            .request(Method::GET, &["operators"])?
            .query(&[("serviceType", service_type.as_str())]);
        self.send_data::<Option<Vec<Operator>>>(builder)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn plans(&self, operator_code: &str, identifier: &str) -> ApiResult<Vec<Plan>> {
        let mut builder = self.request(Method::GET, &["operators", operator_code, "plans"])?;
        if !identifier.is_empty() {
            builder = builder.query(&[("identifier", identifier)]);
        }
        self.send_data::<Option<Vec<Plan>>>(builder)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn initiate_recharge(&self, request: &RechargeRequest) -> ApiResult<RechargeAccepted> {
        let builder = self.request(Method::POST, &["recharge"])?.json(request);
        self.send_data(builder).await
    }

    async fn recharge_status(&self, transaction_id: &str) -> ApiResult<Recharge> {
        let builder = self.request(Method::GET, &["recharge", transaction_id])?;
        self.send_data(builder).await
    }

    async fn retry_recharge(&self, transaction_id: &str) -> ApiResult<RetryAccepted> {
        let builder = self.request(Method::POST, &["recharge", "retry", transaction_id])?;
        self.send_data(builder).await
    }

    async fn history(&self, filters: &HistoryFilters) -> ApiResult<HistoryPage> {
        let builder = self
            .request(Method::GET, &["recharge", "history"])?
            .query(&filters.to_query());
        self.send_data(builder).await
    }

    async fn summary(&self) -> ApiResult<Summary> {
        let builder = self.request(Method::GET, &["recharge", "summary", "metrics"])?;
        self.send_data(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig {
            api_base_url: base.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config, Credential::default()).expect("client")
    }

    #[test]
    fn endpoint_encodes_path_segments() {
        let url = client("http://localhost:5000/api")
            .endpoint(&["recharge", "TX 1/2"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/recharge/TX%201%2F2");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let url = client("http://localhost:5000/api/").endpoint(&["services"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/services");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = ClientConfig {
            api_base_url: "mailto:ops@example.com".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config, Credential::default()),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn error_message_prefers_backend_text() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"message":"Duplicate recharge"}"#),
            "Duplicate recharge"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>"),
            "Request failed with status code 502"
        );
    }
}
