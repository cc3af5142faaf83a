//! HTTP client for the `/auth` endpoints (REST).

use crate::core::login_flow::LoginFlowError;
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uda_api_models::{
    ApiErrorBody, AuthResponse, FacebookLoginRequest, LoginRequest, RefreshRequest,
    RegisterRequest, UpdateProfileRequest, UserProfile,
};

const FALLBACK_ERROR: &str = "API Error";

/// Failure talking to the club backend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-2xx response; carries the server's `{error}` message.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message.
        message: String,
    },
    /// A 2xx body that did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the server rejected the credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

impl From<ApiError> for LoginFlowError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => Self::Backend {
                status: Some(status),
                message,
            },
            other => Self::Backend {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

/// REST client bound to one API base and, optionally, a bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    /// Base URL, e.g. `/api/v1`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
}

impl ApiClient {
    /// Client for `base_url` with an optional bearer token.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    /// Same base URL, different token.
    #[must_use]
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self::new(self.base_url.clone(), token)
    }

    fn request(&self, req: Request) -> Request {
        match &self.token {
            Some(token) if !token.trim().is_empty() => {
                req.header("Authorization", &format!("Bearer {token}"))
            }
            _ => req,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if response.ok() {
            return response
                .json::<T>()
                .await
                .map_err(|err| ApiError::Decode(err.to_string()));
        }
        let status = response.status();
        let message = response
            .json::<ApiErrorBody>()
            .await
            .map_or_else(|_| FALLBACK_ERROR.to_string(), |body| body.error);
        Err(ApiError::Status { status, message })
    }

    async fn send<T: DeserializeOwned>(req: Request) -> Result<T, ApiError> {
        let response = req
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::read(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::send(self.request(Request::get(&self.url(path)))).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self
            .request(Request::post(&self.url(path)))
            .json(body)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::send(req).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self
            .request(Request::put(&self.url(path)))
            .json(body)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::send(req).await
    }

    /// Exchange a Facebook user access token for a club session.
    pub async fn facebook(&self, access_token: &str) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/facebook",
            &FacebookLoginRequest {
                access_token: access_token.to_string(),
            },
        )
        .await
    }

    /// Email/password sign-in.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Create an account and sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/register", request).await
    }

    /// Trade a refresh token for a new session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/refresh",
            &RefreshRequest {
                refresh_token: refresh_token.to_string(),
            },
        )
        .await
    }

    /// Profile of the signed-in member.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_json("/auth/me").await
    }

    /// Update the signed-in member's profile.
    pub async fn update_me(&self, update: &UpdateProfileRequest) -> Result<UserProfile, ApiError> {
        self.put_json("/auth/me", update).await
    }
}
