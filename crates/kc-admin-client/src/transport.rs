//! Authenticated HTTP transport for the Keycloak admin REST API.
//!
//! [`AdminClient`] owns the connection pool and the [`AdminSession`]. It is
//! the only place credentials are exchanged or renewed; managers borrow it to
//! issue calls.

use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

use crate::config::AdminConfig;
use crate::error::{AdminError, AdminResult};
use crate::session::{AdminSession, TokenResponse};

/// Connect timeout for admin calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Credentials of the administrative principal.
#[derive(Clone)]
pub struct Credentials {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
    /// Realm to log into (usually `master`).
    pub login_realm: String,
    /// Client used for the password grant (usually `admin-cli`).
    pub client_id: String,
}

impl Credentials {
    /// Builds credentials from configuration.
    #[must_use]
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            username: config.bootstrap_username.clone(),
            password: config.bootstrap_password.clone(),
            login_realm: config.login_realm.clone(),
            client_id: config.client_id.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("login_realm", &self.login_realm)
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Token endpoint error body.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// API client for making authenticated requests to a Keycloak server.
#[derive(Debug)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session: Mutex<AdminSession>,
}

impl AdminClient {
    /// Exchanges credentials for an admin session and returns a ready client.
    ///
    /// Fails with [`AdminError::Authentication`] when the token endpoint
    /// rejects the credentials and with [`AdminError::Transport`] when the
    /// server cannot be reached.
    pub async fn authenticate(
        server_url: &str,
        credentials: Credentials,
        request_timeout: Duration,
    ) -> AdminResult<Self> {
        let base_url = Url::parse(server_url)
            .map_err(|e| AdminError::Config(format!("invalid server URL {server_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AdminError::Config(format!("invalid server URL {server_url:?}")));
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
            .build()?;

        let token_url = token_url(&base_url, &credentials.login_realm)?;
        let issued_at = Instant::now();
        let response = password_grant(&http, &token_url, &credentials).await?;
        let session = AdminSession::from_token_response(response, issued_at);

        info!(
            server = %base_url,
            username = %credentials.username,
            realm = %credentials.login_realm,
            "authenticated"
        );

        Ok(Self {
            http,
            base_url,
            credentials,
            session: Mutex::new(session),
        })
    }

    /// Authenticates using the credentials and timeouts from configuration.
    pub async fn from_config(server_url: &str, config: &AdminConfig) -> AdminResult<Self> {
        Self::authenticate(
            server_url,
            Credentials::from_config(config),
            config.request_timeout(),
        )
        .await
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns a snapshot of the current session.
    pub async fn session(&self) -> AdminSession {
        self.session.lock().await.clone()
    }

    /// Builds an admin API URL from path segments under `/admin`.
    ///
    /// Segments are percent-encoded, so realm names never alter the path.
    pub fn admin_url(&self, segments: &[&str]) -> AdminResult<Url> {
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push("admin");
        all.extend_from_slice(segments);
        join_segments(&self.base_url, &all)
    }

    /// Makes a GET request and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AdminResult<T> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Makes a POST request, discarding any response body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> AdminResult<()> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        check_status(response).await?;
        Ok(())
    }

    /// Makes a PUT request, discarding any response body.
    pub async fn put_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> AdminResult<()> {
        let response = self.send(Method::PUT, url, Some(body)).await?;
        check_status(response).await?;
        Ok(())
    }

    /// Sends an authorized request.
    ///
    /// A 401 is answered once by logging in again and resending; a second 401
    /// is returned to the caller.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> AdminResult<Response> {
        let token = self.bearer_token().await?;
        debug!(%method, %url, "admin request");
        let response = self
            .build(method.clone(), url.clone(), body)
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(%url, "admin request rejected with 401, logging in again");
        let token = {
            let mut session = self.session.lock().await;
            self.login(&mut session).await?;
            session.access_token().to_string()
        };

        Ok(self.build(method, url, body).bearer_auth(&token).send().await?)
    }

    fn build<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> reqwest::RequestBuilder {
        let request = self.http.request(method, url);
        match body {
            Some(body) => request.json(body),
            None => request,
        }
    }

    /// Returns a valid bearer token, renewing the session first if needed.
    async fn bearer_token(&self) -> AdminResult<String> {
        let mut session = self.session.lock().await;
        if session.needs_renewal(Instant::now()) {
            self.renew(&mut session).await?;
        }
        Ok(session.access_token().to_string())
    }

    /// Renews with the refresh token when possible, otherwise logs in again.
    async fn renew(&self, session: &mut AdminSession) -> AdminResult<()> {
        let now = Instant::now();
        if let Some(refresh_token) = session.usable_refresh_token(now).map(str::to_string) {
            let token_url = token_url(&self.base_url, &self.credentials.login_realm)?;
            let form = [
                ("grant_type", "refresh_token"),
                ("client_id", self.credentials.client_id.as_str()),
                ("refresh_token", refresh_token.as_str()),
            ];
            match exchange(&self.http, &token_url, &form).await {
                Ok(response) => {
                    *session = AdminSession::from_token_response(response, now);
                    debug!("admin session refreshed");
                    return Ok(());
                }
                Err(AdminError::Authentication(reason)) => {
                    debug!(%reason, "refresh rejected, logging in again");
                }
                Err(e) => return Err(e),
            }
        }
        self.login(session).await
    }

    async fn login(&self, session: &mut AdminSession) -> AdminResult<()> {
        let token_url = token_url(&self.base_url, &self.credentials.login_realm)?;
        let issued_at = Instant::now();
        let response = password_grant(&self.http, &token_url, &self.credentials).await?;
        *session = AdminSession::from_token_response(response, issued_at);
        debug!("admin session renewed with password grant");
        Ok(())
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> AdminResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AdminError::Config(format!("invalid server URL {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn token_url(base: &Url, login_realm: &str) -> AdminResult<Url> {
    join_segments(
        base,
        &["realms", login_realm, "protocol", "openid-connect", "token"],
    )
}

async fn password_grant(
    http: &reqwest::Client,
    token_url: &Url,
    credentials: &Credentials,
) -> AdminResult<TokenResponse> {
    let form = [
        ("grant_type", "password"),
        ("client_id", credentials.client_id.as_str()),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ];
    exchange(http, token_url, &form).await
}

/// Posts a token request. 400 and 401 mean the grant was rejected.
async fn exchange(
    http: &reqwest::Client,
    token_url: &Url,
    form: &[(&str, &str)],
) -> AdminResult<TokenResponse> {
    let response = http.post(token_url.clone()).form(form).send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
        let reason = match serde_json::from_str::<OAuthErrorBody>(&body) {
            Ok(err) => err.error_description.unwrap_or(err.error),
            Err(_) => format!("token endpoint returned {}", status.as_u16()),
        };
        return Err(AdminError::Authentication(reason));
    }

    Err(AdminError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Maps non-success statuses to errors.
async fn check_status(response: Response) -> AdminResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    if status == StatusCode::UNAUTHORIZED {
        return Err(AdminError::Authentication(format!(
            "admin call rejected: {body}"
        )));
    }
    Err(AdminError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_url_is_under_login_realm() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let url = token_url(&base, "master").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/realms/master/protocol/openid-connect/token"
        );
    }

    #[test]
    fn segments_keep_base_path() {
        let base = Url::parse("http://localhost:8080/auth/").unwrap();
        let url = join_segments(&base, &["admin", "realms"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/auth/admin/realms");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let url = join_segments(&base, &["admin", "realms", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/admin/realms/a%2Fb%20c");
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            login_realm: "master".to_string(),
            client_id: "admin-cli".to_string(),
        };
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
