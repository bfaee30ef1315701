use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::request::{decode, Method, RawRequest, Request, RequestData};
use crate::store::{TokenStorage, ACCESS_TOKEN_KEY};
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tokio::sync::Mutex;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The two session capabilities the client needs when a request comes back 401.
pub trait SessionHandler: Send + Sync {
    /// Exchange the stored refresh token for a new access token and persist it.
    fn refresh_access_token(&self) -> BoxFuture<'_, Result<String, HandlerError>>;

    /// End the session: clear token storage and the default authorization header.
    fn logout(&self) -> BoxFuture<'_, ()>;
}

/// HTTP client for the snapfeed backend.
///
/// Every request gets the current bearer token attached. A 401 on a request
/// that has not been retried yet runs the refresh protocol: the registered
/// [`SessionHandler`] refreshes the token and the request is resubmitted once.
/// If refresh fails the handler logs the session out and the original 401 is
/// returned. Refreshes are serialised, so requests failing together share a
/// single refresh call.
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    storage: Arc<dyn TokenStorage>,
    default_token: RwLock<Option<String>>,
    session_handler: RwLock<Option<Weak<dyn SessionHandler>>>,
    refresh_lock: Mutex<()>,
}

/// An outbound call as seen by the inbound interceptor.
#[derive(Debug)]
struct PendingRequest {
    method: Method,
    endpoint: String,
    /// Bearer token attached to the latest attempt.
    token: Option<String>,
    retried: bool,
}

impl Client {
    pub fn new(config: ClientConfig, storage: Arc<dyn TokenStorage>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        tracing::debug!(base_url = %config.base_url, "API client created");

        Ok(Self {
            http,
            config,
            storage,
            default_token: RwLock::new(None),
            session_handler: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    /// Set or clear the default `Authorization` header for subsequent requests.
    pub fn set_token(&self, token: Option<&str>) {
        *self
            .default_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.map(str::to_string);
    }

    /// Replace the active session handler. The client holds it weakly.
    pub fn register_session_handler(&self, handler: Weak<dyn SessionHandler>) {
        *self
            .session_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
        tracing::debug!("Session handler registered");
    }

    fn session_handler(&self) -> Option<Arc<dyn SessionHandler>> {
        self.session_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Token attached to the next request: storage first, then the default header.
    fn bearer_token(&self) -> Option<String> {
        self.storage.access_token().or_else(|| {
            self.default_token
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: Request,
    {
        self.dispatch(&request, true).await
    }

    /// Send without entering the refresh protocol; a 401 is returned as is.
    pub async fn send_without_refresh<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: Request,
    {
        self.dispatch(&request, false).await
    }

    /// Untyped call through the full interceptor chain.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let mut request = RawRequest::new(method, path);
        request.body = body;
        self.send(request).await
    }

    /// Reports whether the backend answers `GET /health/` with a 2xx.
    pub async fn check_health(&self) -> bool {
        match self.send(crate::endpoints::health::HealthCheck).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Backend health check failed");
                false
            }
        }
    }

    async fn dispatch<R>(&self, request: &R, refreshable: bool) -> Result<R::Response, ApiError>
    where
        R: Request,
    {
        let mut pending = PendingRequest {
            method: request.method(),
            endpoint: request.endpoint().into_owned(),
            token: None,
            retried: false,
        };

        loop {
            pending.token = self.bearer_token();

            match self.execute(request, &pending).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_unauthorized() && refreshable && !pending.retried => {
                    pending.retried = true;
                    if self.recover(&pending).await {
                        tracing::debug!(
                            method = %pending.method,
                            endpoint = %pending.endpoint,
                            "Resubmitting request after token refresh"
                        );
                        continue;
                    }
                    log_failure(&pending, &err);
                    return Err(err);
                }
                Err(err) => {
                    log_failure(&pending, &err);
                    return Err(err);
                }
            }
        }
    }

    async fn execute<R>(&self, request: &R, pending: &PendingRequest) -> Result<R::Response, ApiError>
    where
        R: Request,
    {
        let url = self.config.url(&pending.endpoint);
        let mut builder = self.http.request(pending.method.clone(), &url);

        if let Some(token) = &pending.token {
            builder = builder.bearer_auth(token);
        }

        builder = match request.data() {
            RequestData::Empty => builder,
            RequestData::Query(query) => builder.query(query),
            RequestData::Json(body) => builder.json(body),
            RequestData::Multipart(form) => builder.multipart(form),
        };

        tracing::debug!(
            method = %pending.method,
            endpoint = %pending.endpoint,
            authenticated = pending.token.is_some(),
            "API request"
        );

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), endpoint = %pending.endpoint, "API response");

        let bytes = response.bytes().await?;
        if status.is_success() {
            Ok(decode(&bytes)?)
        } else {
            Err(ApiError::from_status(status, &bytes))
        }
    }

    /// Run the refresh protocol for a request that came back 401.
    /// Returns true when the request should be resubmitted.
    async fn recover(&self, pending: &PendingRequest) -> bool {
        let _guard = self.refresh_lock.lock().await;

        // Another request refreshed while this one waited for the lock.
        let current = self.storage.access_token();
        if current.is_some() && current != pending.token {
            tracing::debug!(endpoint = %pending.endpoint, "Access token already refreshed");
            return true;
        }

        if self.storage.refresh_token().is_none() {
            tracing::debug!(endpoint = %pending.endpoint, "No refresh token stored");
            return false;
        }

        let Some(handler) = self.session_handler() else {
            tracing::debug!(endpoint = %pending.endpoint, "No session handler registered");
            return false;
        };

        match handler.refresh_access_token().await {
            Ok(token) => {
                if let Err(e) = self.storage.set(ACCESS_TOKEN_KEY, &token) {
                    tracing::warn!(error = %e, "Failed to persist refreshed access token");
                }
                self.set_token(Some(&token));
                tracing::info!("Access token refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                handler.logout().await;
                false
            }
        }
    }
}

fn log_failure(pending: &PendingRequest, err: &ApiError) {
    let endpoint = pending.endpoint.as_str();
    match err {
        ApiError::Server { status, .. } => {
            tracing::error!(status = status.as_u16(), endpoint, "Server error");
        }
        ApiError::Client { status, .. } if *status == StatusCode::FORBIDDEN => {
            tracing::warn!(endpoint, "Access forbidden");
        }
        ApiError::Client { status, .. } if *status == StatusCode::NOT_FOUND => {
            tracing::warn!(endpoint, "Resource not found");
        }
        ApiError::Client { status, .. } => {
            tracing::debug!(status = status.as_u16(), endpoint, "Request rejected");
        }
        ApiError::Network(e) => {
            tracing::error!(error = %e, endpoint, timeout = e.is_timeout(), "No response from backend");
        }
        other => {
            tracing::warn!(error = %other, endpoint, "Request failed");
        }
    }
}
