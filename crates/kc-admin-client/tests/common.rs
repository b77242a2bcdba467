//! Common test utilities: a mock Keycloak admin API.

use std::net::TcpListener;

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use kc_admin_client::{AdminClient, AdminConfig};

/// Token handed out by the mock token endpoint.
pub const ACCESS_TOKEN: &str = "test-access-token";

/// Token endpoint path for the master realm.
pub const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";

/// Initializes tracing once for the test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_admin_client=debug")
        .with_test_writer()
        .try_init();
}

/// Returns a token endpoint response body.
pub fn token_body(access_token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": access_token,
        "expires_in": expires_in,
        "refresh_expires_in": 1800,
        "refresh_token": "test-refresh-token",
        "token_type": "Bearer",
        "not-before-policy": 0,
        "scope": "profile email"
    })
}

/// Returns a profile configuration body with the given attribute names.
pub fn profile_body(names: &[&str]) -> Value {
    let attributes: Vec<Value> = names
        .iter()
        .map(|name| json!({ "name": name, "displayName": format!("${{{name}}}") }))
        .collect();
    json!({
        "attributes": attributes,
        "groups": [{ "name": "user-metadata", "displayHeader": "User metadata" }]
    })
}

/// A mock Keycloak server.
pub struct MockKeycloak {
    /// Underlying mock server.
    pub server: MockServer,
}

impl MockKeycloak {
    /// Starts a server that answers readiness probes and password grants.
    pub async fn start() -> Self {
        init_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Keycloak</html>"))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Starts a server whose root keeps answering 503, as during boot.
    pub async fn start_unready() -> Self {
        init_tracing();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Starts a server with a working password grant.
    pub async fn with_login() -> Self {
        let keycloak = Self::start().await;
        keycloak.mount_password_grant(ACCESS_TOKEN, 300).await;
        keycloak
    }

    /// Base URL of the mock.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mounts a password grant returning `access_token`.
    pub async fn mount_password_grant(&self, access_token: &str, expires_in: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains("grant_type=password"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body(access_token, expires_in)),
            )
            .mount(&self.server)
            .await;
    }

    /// Configuration pointing at this mock with short timeouts.
    pub fn config(&self) -> AdminConfig {
        AdminConfig {
            server_url: Some(self.url()),
            startup_timeout_secs: 1,
            request_timeout_secs: 2,
            poll_interval_millis: 50,
            ..AdminConfig::default()
        }
    }

    /// Authenticates against the mock.
    pub async fn client(&self) -> AdminClient {
        AdminClient::from_config(&self.url(), &self.config())
            .await
            .expect("mock login succeeds")
    }

    /// Requests received so far, filtered by method and path.
    pub async fn requests(&self, http_method: &str, request_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .collect()
    }

    /// All requests received so far other than readiness probes.
    pub async fn api_requests(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() != "/")
            .collect()
    }
}

/// Returns a local URL nothing listens on.
pub fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Decodes a request body as JSON.
pub fn json_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("JSON request body")
}
