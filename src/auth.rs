//! Account backend: login, registration and user lookup.
//!
//! Login returns the user record as base64-encoded JSON next to the access
//! token. Lookups authenticate with that token as a bearer credential.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::endpoint::{InvalidBaseUrl, endpoint};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const FETCH_FAILED: &str = "Failed to fetch user data";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    BaseUrl(#[from] InvalidBaseUrl),
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AuthConfig {
    /// Defaults with `TRIP_AUTH_BASE_URL` applied when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRIP_AUTH_BASE_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Base64-encoded JSON user record.
    pub user: String,
}

/// A logged-in user and the token for later requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedUser {
    user_id: Option<String>,
    username: Option<String>,
    first_name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decodes the login payload into a user.
///
/// The email is always the name the user logged in with. A payload that is
/// not base64 JSON yields a bare user carrying only that name.
pub fn decode_user_payload(payload: &str, login_name: &str) -> User {
    let decoded = STANDARD
        .decode(payload.trim())
        .map_err(|err| err.to_string())
        .and_then(|bytes| serde_json::from_slice::<EncodedUser>(&bytes).map_err(|err| err.to_string()));

    match decoded {
        Ok(encoded) => User {
            user_id: encoded.user_id.unwrap_or_default(),
            username: encoded.username.unwrap_or_else(|| login_name.to_string()),
            first_name: encoded.first_name.unwrap_or_default(),
            last_name: None,
            email: login_name.to_string(),
            avatar_url: encoded.avatar_url,
        },
        Err(err) => {
            warn!(error = %err, "undecodable user payload, using login name");
            User {
                user_id: String::new(),
                username: login_name.to_string(),
                first_name: String::new(),
                last_name: None,
                email: login_name.to_string(),
                avatar_url: None,
            }
        }
    }
}

/// Turns a failed response into an error, preferring the backend's message.
fn rejection(response: reqwest::blocking::Response, fallback: &str) -> AuthError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    AuthError::Rejected { status, message }
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AuthConfig,
    client: reqwest::blocking::Client,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn login(&self, request: &LoginRequest) -> Result<Session, AuthError> {
        let url = endpoint(&self.config.base_url, &["api", "users", "auth", "login"])?;
        debug!(%url, username = %request.username, "logging in");

        let response = self.client.post(url).json(request).send()?;
        if !response.status().is_success() {
            let err = rejection(response, LOGIN_FAILED);
            warn!(error = %err, "login rejected");
            return Err(err);
        }

        let body: LoginResponse = response.json()?;
        let user = decode_user_payload(&body.user, &request.username);
        info!(user_id = %user.user_id, "logged in");

        Ok(Session {
            user,
            token: body.access_token,
        })
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        let url = endpoint(&self.config.base_url, &["api", "users", "register"])?;
        debug!(%url, username = %request.username, "registering");

        let response = self.client.post(url).json(request).send()?;
        if !response.status().is_success() {
            let err = rejection(response, REGISTRATION_FAILED);
            warn!(error = %err, "registration rejected");
            return Err(err);
        }

        Ok(response.json()?)
    }

    pub fn user_by_email(&self, email: &str, token: &str) -> Result<User, AuthError> {
        self.fetch_user(&["api", "users", "email", email], token)
    }

    pub fn user_by_id(&self, user_id: &str, token: &str) -> Result<User, AuthError> {
        self.fetch_user(&["api", "users", user_id], token)
    }

    fn fetch_user(&self, segments: &[&str], token: &str) -> Result<User, AuthError> {
        let url = endpoint(&self.config.base_url, segments)?;
        debug!(%url, "fetching user");

        let response = self.client.get(url).bearer_auth(token).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "user lookup failed");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: FETCH_FAILED.to_string(),
            });
        }

        Ok(response.json()?)
    }
}
