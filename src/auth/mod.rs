//! Client for the external authentication API and the locally persisted
//! session.
//!
//! Everything here is fail-soft: transport failures become
//! `success: false` results with a connectivity message, and token trouble
//! resolves to a forced logout. Nothing in this module raises an error past
//! its caller for network or storage problems, so the UI layer needs no
//! error handling of its own.

pub mod session;
pub mod token;
pub mod types;

use crate::nav::{Navigator, LOGIN_PATH};
use crate::APP_USER_AGENT;
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use self::session::SessionStore;
use self::types::{
    CurrentUser, LoginResponse, LoginResult, RecoveryResponse, RecoveryResult, TokenValidation,
};
use serde_json::json;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info_span, warn, Instrument};
use url::Url;

/// Delay before the post-logout redirect, long enough for a visible message.
pub const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_millis(500);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CONNECTIVITY_ERROR: &str =
    "Connection error: the authentication service could not be reached.";

/// Placeholder authorization rule: only the `admin` account is an admin.
#[must_use]
pub fn is_admin(username: &str) -> bool {
    username == "admin"
}

/// Configuration for the authentication client.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Base URL of the authentication API, e.g. `http://localhost:3001/api`.
    pub api_base_url: String,
    /// Health endpoint override; defaults to `/health` at the API origin.
    pub health_url: Option<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            health_url: None,
        }
    }

    fn effective_health_url(&self) -> Result<String> {
        if let Some(health_url) = &self.health_url {
            return Ok(health_url.clone());
        }

        let url = Url::parse(&self.api_base_url)?;

        let scheme = url.scheme();

        let host = url
            .host()
            .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
            .to_owned();

        let port = match url.port() {
            Some(p) => p,
            None => match scheme {
                "http" => 80,
                "https" => 443,
                _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
            },
        };

        Ok(format!("{scheme}://{host}:{port}/health"))
    }
}

/// Authentication client holding the session store and the navigation
/// handle. Constructed explicitly and handed to whatever UI layer needs it;
/// there is no module-level instance.
pub struct AuthService {
    config: AuthConfig,
    client: Client,
    store: SessionStore,
    navigator: Navigator,
}

impl AuthService {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AuthConfig, store: SessionStore, navigator: Navigator) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            client,
            store,
            navigator,
        })
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Authenticate against the backend. The response fields pass through
    /// verbatim; on success with a token present the session is persisted as
    /// part of this call, so callers cannot forget to commit it. Transport
    /// failures map to a failed result with a connectivity message.
    pub async fn login(&self, username: &str, password: SecretString) -> LoginResult {
        let username = username.trim();
        let url = format!("{}/login", self.config.api_base_url);
        let payload = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let span = info_span!("auth.login", http.method = "POST", url = %url);
        let response = async {
            let response = self.client.post(&url).json(&payload).send().await?;
            response.json::<LoginResponse>().await
        }
        .instrument(span)
        .await;

        match response {
            Ok(data) => {
                if data.success {
                    if let Some(token) = &data.token {
                        self.store.save(token, username, data.user.as_ref());
                        debug!("login succeeded for {username}");
                    }
                }

                LoginResult {
                    success: data.success,
                    message: data.message,
                    user: data.user,
                    attempts_left: data.attempts_left,
                    token: data.token,
                }
            }
            Err(err) => {
                warn!("login request failed: {err}");
                LoginResult {
                    success: false,
                    message: CONNECTIVITY_ERROR.to_string(),
                    ..LoginResult::default()
                }
            }
        }
    }

    /// Request a password recovery email. The address is trimmed and
    /// lowercased before it is sent.
    pub async fn forgot_password(&self, email: &str) -> RecoveryResult {
        let email = email.trim().to_lowercase();
        let url = format!("{}/forgot-password", self.config.api_base_url);
        let payload = json!({ "email": email });

        let span = info_span!("auth.forgot_password", http.method = "POST", url = %url);
        let response = async {
            let response = self.client.post(&url).json(&payload).send().await?;
            response.json::<RecoveryResponse>().await
        }
        .instrument(span)
        .await;

        match response {
            Ok(data) => {
                debug!("password recovery requested for {email}");
                RecoveryResult {
                    success: data.success,
                    message: data.message,
                }
            }
            Err(err) => {
                warn!("password recovery request failed: {err}");
                RecoveryResult {
                    success: false,
                    message: CONNECTIVITY_ERROR.to_string(),
                }
            }
        }
    }

    /// Validate the stored token against the current clock. An expired token
    /// forces a logout as a side effect; an undecodable one is reported
    /// without touching the session.
    #[must_use]
    pub fn validate_token(&self) -> TokenValidation {
        self.validate_token_at(unix_now())
    }

    /// Expiry check against an explicit clock, for deterministic tests.
    #[must_use]
    pub fn validate_token_at(&self, now_unix_seconds: i64) -> TokenValidation {
        let Some(stored) = self.store.token() else {
            return TokenValidation {
                valid: false,
                message: Some("token not found".to_string()),
                user: None,
            };
        };

        let claims = match token::decode(&stored) {
            Ok(claims) => claims,
            Err(err) => {
                warn!("stored token failed to decode: {err}");
                return TokenValidation {
                    valid: false,
                    message: Some("invalid token".to_string()),
                    user: None,
                };
            }
        };

        if let Some(exp) = claims.exp {
            if now_unix_seconds >= exp {
                debug!("stored token expired, logging out");
                self.logout();
                return TokenValidation {
                    valid: false,
                    message: Some("token expired".to_string()),
                    user: None,
                };
            }
        }

        TokenValidation {
            valid: true,
            message: None,
            user: self.current_user(),
        }
    }

    /// Clear the session and schedule the redirect back to the login page.
    /// Safe to call repeatedly; a second call reschedules the redirect.
    pub fn logout(&self) {
        self.store.clear();
        debug!("logged out");
        self.navigator.schedule(LOGIN_PATH, LOGOUT_REDIRECT_DELAY);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Snapshot of the stored user. The info record falls back to
    /// `{"username": …}` when missing or corrupt.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        let username = self.store.username()?;
        let info = self
            .store
            .user_info()
            .unwrap_or_else(|| json!({ "username": username }));

        Some(CurrentUser {
            is_admin: is_admin(&username),
            username,
            info,
        })
    }

    /// Probe the backend health endpoint. Informational only; failures are
    /// logged and reported as `false`.
    pub async fn check_api_status(&self) -> bool {
        let url = match self.config.effective_health_url() {
            Ok(url) => url,
            Err(err) => {
                warn!("cannot determine health endpoint: {err}");
                return false;
            }
        };

        let span = info_span!("auth.health", http.method = "GET", url = %url);
        match self.client.get(&url).send().instrument(span).await {
            Ok(response) if response.status().is_success() => {
                debug!("authentication API is reachable");
                true
            }
            Ok(response) => {
                warn!("authentication API returned {}", response.status());
                false
            }
            Err(err) => {
                warn!("authentication API is not reachable: {err}");
                false
            }
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};
    use serde_json::{json, Value};
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NOW: i64 = 1_700_000_000;

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn token_with_claims(claims: &Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
        format!("{header}.{claims}.signature")
    }

    fn service(base_url: &str) -> AuthService {
        AuthService::new(
            AuthConfig::new(base_url),
            SessionStore::in_memory(),
            Navigator::new(),
        )
        .expect("client")
    }

    #[test]
    fn health_url_derives_from_api_origin() -> Result<()> {
        let config = AuthConfig::new("http://localhost:3000/api");
        assert_eq!(config.effective_health_url()?, "http://localhost:3000/health");

        let config = AuthConfig::new("https://example.com/api");
        assert_eq!(config.effective_health_url()?, "https://example.com:443/health");
        Ok(())
    }

    #[test]
    fn health_url_override_wins() -> Result<()> {
        let mut config = AuthConfig::new("http://localhost:3000/api");
        config.health_url = Some("http://status.local/healthz".to_string());
        assert_eq!(config.effective_health_url()?, "http://status.local/healthz");
        Ok(())
    }

    #[test]
    fn health_url_rejects_unsupported_scheme() {
        let config = AuthConfig::new("ftp://example.com/api");
        let err = config.effective_health_url().expect_err("expected error");
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn admin_rule_matches_only_admin() {
        assert!(is_admin("admin"));
        assert!(!is_admin("Admin"));
        assert!(!is_admin("usuario"));
    }

    #[tokio::test]
    async fn login_success_persists_session() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({
                "username": "admin",
                "password": "admin123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login successful",
                "token": "t1",
                "user": { "role": "admin" }
            })))
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let result = service
            .login("  admin  ", SecretString::from("admin123".to_string()))
            .await;

        assert!(result.success);
        assert_eq!(result.token.as_deref(), Some("t1"));
        assert!(service.is_authenticated());
        assert_eq!(service.store().username().as_deref(), Some("admin"));
        assert_eq!(service.store().user_info(), Some(json!({ "role": "admin" })));
    }

    #[tokio::test]
    async fn login_success_without_token_is_not_persisted() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login successful"
            })))
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let result = service
            .login("admin", SecretString::from("admin123".to_string()))
            .await;

        assert!(result.success);
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn login_failure_passes_fields_through() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Username ou senha incorretos",
                "attemptsLeft": 1
            })))
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let result = service
            .login("admin", SecretString::from("wrong".to_string()))
            .await;

        assert!(!result.success);
        assert_eq!(result.message, "Username ou senha incorretos");
        assert_eq!(result.attempts_left, Some(1));
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn login_transport_failure_fails_soft() {
        let service = service("http://127.0.0.1:1/api");
        let result = service
            .login("admin", SecretString::from("admin123".to_string()))
            .await;

        assert!(!result.success);
        assert_eq!(result.message, CONNECTIVITY_ERROR);
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn login_non_json_response_fails_soft() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let result = service
            .login("admin", SecretString::from("admin123".to_string()))
            .await;

        assert!(!result.success);
        assert_eq!(result.message, CONNECTIVITY_ERROR);
    }

    #[tokio::test]
    async fn forgot_password_normalizes_email() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/forgot-password"))
            .and(body_json(json!({ "email": "user@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Email enviado"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let result = service.forgot_password("  User@Example.COM ").await;

        assert!(result.success);
        assert_eq!(result.message, "Email enviado");
    }

    #[tokio::test]
    async fn forgot_password_transport_failure_fails_soft() {
        let service = service("http://127.0.0.1:1/api");
        let result = service.forgot_password("user@example.com").await;

        assert!(!result.success);
        assert_eq!(result.message, CONNECTIVITY_ERROR);
    }

    #[tokio::test]
    async fn validate_token_without_session() {
        let service = service("http://127.0.0.1:1/api");
        let validation = service.validate_token_at(NOW);

        assert!(!validation.valid);
        assert_eq!(validation.message.as_deref(), Some("token not found"));
    }

    #[tokio::test]
    async fn validate_token_rejects_undecodable_without_side_effects() {
        let service = service("http://127.0.0.1:1/api");
        service.store().save("garbage", "admin", None);

        let validation = service.validate_token_at(NOW);

        assert!(!validation.valid);
        assert_eq!(validation.message.as_deref(), Some("invalid token"));
        // the session must be left untouched
        assert!(service.is_authenticated());
        assert_eq!(service.navigator().pending(), None);
    }

    #[tokio::test]
    async fn validate_token_expired_forces_logout() {
        let service = service("http://127.0.0.1:1/api");
        let token = token_with_claims(&json!({ "exp": NOW - 60 }));
        service.store().save(&token, "admin", None);

        let validation = service.validate_token_at(NOW);

        assert!(!validation.valid);
        assert_eq!(validation.message.as_deref(), Some("token expired"));
        assert!(!service.is_authenticated());
        assert_eq!(service.store().get(), session::Session::default());

        let pending = service.navigator().pending().expect("redirect scheduled");
        assert_eq!(pending.target, LOGIN_PATH);
        assert_eq!(pending.delay, LOGOUT_REDIRECT_DELAY);
    }

    #[tokio::test]
    async fn validate_token_expiry_boundary_is_inclusive() {
        let service = service("http://127.0.0.1:1/api");
        let token = token_with_claims(&json!({ "exp": NOW }));
        service.store().save(&token, "admin", None);

        let validation = service.validate_token_at(NOW);
        assert!(!validation.valid);
    }

    #[tokio::test]
    async fn validate_token_accepts_future_expiry() {
        let service = service("http://127.0.0.1:1/api");
        let token = token_with_claims(&json!({ "exp": NOW + 3600 }));
        service.store().save(&token, "admin", Some(&json!({ "role": "admin" })));

        let validation = service.validate_token_at(NOW);

        assert!(validation.valid);
        let user = validation.user.expect("user snapshot");
        assert_eq!(user.username, "admin");
        assert!(user.is_admin);
        assert_eq!(user.info, json!({ "role": "admin" }));
    }

    #[tokio::test]
    async fn validate_token_without_expiry_claim_is_valid() {
        let service = service("http://127.0.0.1:1/api");
        let token = token_with_claims(&json!({ "sub": "usuario" }));
        service.store().save(&token, "usuario", None);

        let validation = service.validate_token_at(NOW);

        assert!(validation.valid);
        let user = validation.user.expect("user snapshot");
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let service = service("http://127.0.0.1:1/api");
        service.store().save("t1", "admin", None);

        service.logout();
        assert_eq!(service.store().get(), session::Session::default());

        service.logout();
        assert_eq!(service.store().get(), session::Session::default());
        assert_eq!(
            service.navigator().pending().map(|pending| pending.target),
            Some(LOGIN_PATH.to_string())
        );
    }

    #[tokio::test]
    async fn current_user_falls_back_to_username_record() {
        let service = service("http://127.0.0.1:1/api");
        service.store().save("t1", "usuario", None);

        let user = service.current_user().expect("user");
        assert_eq!(user.username, "usuario");
        assert!(!user.is_admin);
        assert_eq!(user.info, json!({ "username": "usuario" }));
    }

    #[tokio::test]
    async fn check_api_status_reports_reachability() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let mut config = AuthConfig::new("http://127.0.0.1:1/api");
        config.health_url = Some(format!("{}/health", server.uri()));
        let service = AuthService::new(config, SessionStore::in_memory(), Navigator::new())
            .expect("client");

        assert!(service.check_api_status().await);
    }

    #[tokio::test]
    async fn check_api_status_is_false_when_unreachable() {
        let service = service("http://127.0.0.1:1/api");
        assert!(!service.check_api_status().await);
    }
}
