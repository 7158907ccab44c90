//! Social-network provider adapter.
//!
//! The social provider sends client credentials in the token exchange form
//! body and its profile carries gender and a picture URL. Native SDK logins
//! hand over an access token directly instead of a code.

use reqwest::Client;
use serde::Deserialize;

use super::{async_trait, AccessToken, AuthorizationArtifact, ProviderAdapter, ProviderCredentials};
use crate::error::{IdentityError, IdentityResult, ProviderKind};
use crate::profile::{normalize_email, ExternalProfile};

/// Social provider endpoint paths.
const AUTHORIZE_PATH: &str = "/oauth/authorize";
const TOKEN_PATH: &str = "/oauth/token";
const PROFILE_PATH: &str = "/v1/me";

/// Fields requested from the profile endpoint.
const PROFILE_FIELDS: &str = "id,name,email,birthday,gender,picture";

/// Social token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SocialTokenResponse {
    access_token: String,
    token_type: Option<String>,
    expires_in: Option<i64>,
}

/// Social profile response.
#[derive(Debug, Deserialize)]
struct SocialProfile {
    id: String,
    name: Option<String>,
    email: Option<String>,
    birthday: Option<String>,
    gender: Option<String>,
    picture: Option<String>,
}

/// Social-network provider adapter.
#[derive(Clone)]
pub struct SocialAdapter {
    credentials: ProviderCredentials,
    base_url: String,
    http_client: Client,
}

impl SocialAdapter {
    /// Create a new social adapter against the given API host.
    #[must_use]
    pub fn new(credentials: ProviderCredentials, base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
            http_client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl ProviderAdapter for SocialAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Social
    }

    fn authorization_url(&self, state: &str, redirect_uri: &str) -> String {
        format!(
            "{}{AUTHORIZE_PATH}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.base_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode("email public_profile"),
            urlencoding::encode(state),
        )
    }

    async fn exchange(&self, artifact: &AuthorizationArtifact) -> IdentityResult<AccessToken> {
        let code = match artifact {
            AuthorizationArtifact::Code(code) => code,
            AuthorizationArtifact::Token(token) => return Ok(AccessToken::new(token.clone())),
        };

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::ProviderAuth {
                provider: ProviderKind::Social,
                status: status.as_u16(),
            });
        }

        let token: SocialTokenResponse =
            response
                .json()
                .await
                .map_err(|e| IdentityError::ProviderProtocol {
                    provider: ProviderKind::Social,
                    reason: e.to_string(),
                })?;

        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_profile(&self, access_token: &AccessToken) -> IdentityResult<ExternalProfile> {
        let response = self
            .http_client
            .get(format!("{}{PROFILE_PATH}", self.base_url))
            .query(&[("fields", PROFILE_FIELDS)])
            .bearer_auth(access_token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::ProviderAuth {
                provider: ProviderKind::Social,
                status: status.as_u16(),
            });
        }

        let profile: SocialProfile =
            response
                .json()
                .await
                .map_err(|e| IdentityError::ProviderProtocol {
                    provider: ProviderKind::Social,
                    reason: e.to_string(),
                })?;

        Ok(ExternalProfile {
            provider: ProviderKind::Social,
            external_id: profile.id,
            email: normalize_email(profile.email),
            display_name: profile.name,
            birthdate: profile.birthday,
            avatar_url: profile.picture,
            gender: profile.gender,
        })
    }
}
