//! Session bootstrap against an external identity provider
//!
//! Sign-in is best effort: the badge in the header is the only consumer, so a
//! failure is logged and the session carries on without a handle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use url::Url;
use uuid::Uuid;

pub const DEFAULT_AUTH_BASE: &str = "https://identitytoolkit.googleapis.com";

/// Opaque user id issued by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHandle(String);

impl UserHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Used when a provider signs in without reporting an id
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Short form for the header, e.g. `User ID: 1a2b3c4d...`
    pub fn badge(&self) -> String {
        let short: String = self.0.chars().take(8).collect();
        format!("User ID: {}...", short)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider rejected sign-in ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("identity configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<UserHandle, IdentityError>;

    fn name(&self) -> &'static str;
}

/// No provider configured: a fresh random id per session
pub struct LocalIdentity;

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_in(&self) -> Result<UserHandle, IdentityError> {
        Ok(UserHandle::random())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Firebase Authentication settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseSettings {
    /// Web API key of the Firebase project
    pub api_key: String,
    #[serde(default = "default_auth_base")]
    pub auth_base_url: String,
}

fn default_auth_base() -> String {
    DEFAULT_AUTH_BASE.to_string()
}

/// Firebase Identity Toolkit REST sign-in, anonymous or with a custom token
pub struct FirebaseIdentity {
    client: reqwest::Client,
    settings: FirebaseSettings,
    custom_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest {
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomTokenRequest<'a> {
    token: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    local_id: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

impl FirebaseIdentity {
    pub fn new(
        settings: FirebaseSettings,
        custom_token: Option<String>,
    ) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            settings,
            custom_token,
        })
    }

    fn endpoint(&self, method: &str) -> Result<Url, IdentityError> {
        let raw = format!(
            "{}/v1/accounts:{}",
            self.settings.auth_base_url.trim_end_matches('/'),
            method
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| IdentityError::Configuration(format!("{}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", &self.settings.api_key);
        Ok(url)
    }

    async fn post<B: Serialize + ?Sized, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R, IdentityError> {
        let response = self
            .client
            .post(self.endpoint(method)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn lookup_local_id(&self, id_token: &str) -> Result<Option<String>, IdentityError> {
        let lookup: LookupResponse = self.post("lookup", &LookupRequest { id_token }).await?;
        Ok(lookup.users.into_iter().next().map(|u| u.local_id))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self) -> Result<UserHandle, IdentityError> {
        let local_id = match self.custom_token.as_deref() {
            Some(token) => {
                let signed: SignInResponse = self
                    .post(
                        "signInWithCustomToken",
                        &CustomTokenRequest {
                            token,
                            return_secure_token: true,
                        },
                    )
                    .await?;
                match (signed.local_id, signed.id_token) {
                    (Some(id), _) => Some(id),
                    (None, Some(id_token)) => self.lookup_local_id(&id_token).await?,
                    (None, None) => None,
                }
            }
            None => {
                let signed: SignInResponse = self
                    .post(
                        "signUp",
                        &SignUpRequest {
                            return_secure_token: true,
                        },
                    )
                    .await?;
                signed.local_id
            }
        };

        Ok(local_id
            .filter(|id| !id.is_empty())
            .map(UserHandle::new)
            .unwrap_or_else(UserHandle::random))
    }

    fn name(&self) -> &'static str {
        "firebase"
    }
}

/// Pick a provider for the current configuration
pub fn provider_for(
    firebase: Option<&FirebaseSettings>,
    custom_token: Option<String>,
) -> Box<dyn IdentityProvider> {
    if let Some(settings) = firebase {
        match FirebaseIdentity::new(settings.clone(), custom_token) {
            Ok(provider) => return Box::new(provider),
            Err(e) => error!(error = %e, "Could not set up Firebase sign-in"),
        }
    }
    Box::new(LocalIdentity)
}

/// Sign in once. Failures are logged, never surfaced.
pub async fn bootstrap(provider: &dyn IdentityProvider) -> Option<UserHandle> {
    match provider.sign_in().await {
        Ok(handle) => {
            info!(provider = provider.name(), user_id = handle.id(), "Signed in");
            Some(handle)
        }
        Err(e) => {
            error!(provider = provider.name(), error = %e, "Error signing in");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn firebase(server: &MockServer, custom_token: Option<&str>) -> FirebaseIdentity {
        FirebaseIdentity::new(
            FirebaseSettings {
                api_key: "web-key".to_string(),
                auth_base_url: server.uri(),
            },
            custom_token.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_badge_shortens_id() {
        let handle = UserHandle::new("abcdefghijkl");
        assert_eq!(handle.badge(), "User ID: abcdefgh...");
        assert_eq!(UserHandle::new("ab").badge(), "User ID: ab...");
    }

    #[tokio::test]
    async fn test_local_identity_issues_uuid() {
        let handle = LocalIdentity.sign_in().await.unwrap();
        assert!(Uuid::parse_str(handle.id()).is_ok());
    }

    #[tokio::test]
    async fn test_anonymous_sign_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .and(query_param("key", "web-key"))
            .and(body_json(json!({ "returnSecureToken": true })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "idToken": "tok", "localId": "anon-user-42" })),
            )
            .mount(&server)
            .await;

        let handle = firebase(&server, None).sign_in().await.unwrap();
        assert_eq!(handle.id(), "anon-user-42");
    }

    #[tokio::test]
    async fn test_custom_token_sign_in_looks_up_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithCustomToken"))
            .and(body_json(json!({ "token": "custom", "returnSecureToken": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "idToken": "id-tok" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .and(body_json(json!({ "idToken": "id-tok" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "users": [ { "localId": "user-7" } ] })),
            )
            .mount(&server)
            .await;

        let handle = firebase(&server, Some("custom")).sign_in().await.unwrap();
        assert_eq!(handle.id(), "user-7");
    }

    #[tokio::test]
    async fn test_rejected_sign_in_bootstraps_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("OPERATION_NOT_ALLOWED"))
            .mount(&server)
            .await;

        let provider = firebase(&server, None);
        let err = provider.sign_in().await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { status: 400, .. }));
        assert!(bootstrap(&provider).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_local_id_falls_back_to_random() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let handle = firebase(&server, None).sign_in().await.unwrap();
        assert!(Uuid::parse_str(handle.id()).is_ok());
    }

    #[test]
    fn test_provider_selection() {
        assert_eq!(provider_for(None, None).name(), "local");
        let settings = FirebaseSettings {
            api_key: "k".to_string(),
            auth_base_url: DEFAULT_AUTH_BASE.to_string(),
        };
        assert_eq!(provider_for(Some(&settings), None).name(), "firebase");
    }
}
