//! Financial-wallet provider adapter.
//!
//! The wallet provider exchanges authorization codes with HTTP Basic client
//! authentication and reports birthdates as `MM/DD/YYYY`.

use reqwest::Client;
use serde::Deserialize;

use super::{async_trait, AccessToken, AuthorizationArtifact, ProviderAdapter, ProviderCredentials};
use crate::error::{IdentityError, IdentityResult, ProviderKind};
use crate::profile::{normalize_email, ExternalProfile};

/// Wallet provider endpoint paths.
const AUTHORIZE_PATH: &str = "/authorize";
const TOKEN_PATH: &str = "/oauth2/token";
const PROFILE_PATH: &str = "/v0/me";
const CARDS_PATH: &str = "/v0/me/cards";

/// Wallet token response.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct WalletTokenResponse {
    access_token: String,
    token_type: Option<String>,
    expires_in: Option<i64>,
}

/// Wallet profile response.
#[derive(Debug, Deserialize)]
struct WalletProfile {
    id: String,
    email: Option<String>,
    name: Option<String>,
    birthdate: Option<String>,
    picture: Option<String>,
    #[serde(rename = "memberAt")]
    member_at: Option<String>,
}

/// One wallet card (currency account) from the cards listing.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct WalletCard {
    pub id: String,
    pub label: Option<String>,
    pub currency: String,
    pub balance: String,
    pub available: Option<String>,
}

/// Balance summary for a wallet user, filtered to one currency.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WalletBalances {
    pub cards: Vec<WalletCard>,
    pub member_since: Option<String>,
}

/// Financial-wallet provider adapter.
#[derive(Clone)]
pub struct WalletAdapter {
    credentials: ProviderCredentials,
    base_url: String,
    http_client: Client,
}

impl WalletAdapter {
    /// Create a new wallet adapter against the given API host.
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

    async fn fetch_cards(&self, access_token: &AccessToken) -> IdentityResult<Vec<WalletCard>> {
        let response = self
            .http_client
            .get(format!("{}{CARDS_PATH}", self.base_url))
            .bearer_auth(access_token.as_str())
            .header("Range", "items=0-100")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::ProviderAuth {
                provider: ProviderKind::Wallet,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::ProviderProtocol {
                provider: ProviderKind::Wallet,
                reason: e.to_string(),
            })
    }

    async fn fetch_raw_profile(&self, access_token: &AccessToken) -> IdentityResult<WalletProfile> {
        let response = self
            .http_client
            .get(format!("{}{PROFILE_PATH}", self.base_url))
            .bearer_auth(access_token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::ProviderAuth {
                provider: ProviderKind::Wallet,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::ProviderProtocol {
                provider: ProviderKind::Wallet,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ProviderAdapter for WalletAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Wallet
    }

    fn authorization_url(&self, state: &str, _redirect_uri: &str) -> String {
        // The wallet provider pins the redirect URI in the client
        // registration, so only client id, scope, and state go on the URL.
        format!(
            "{}{AUTHORIZE_PATH}?client_id={}&response_type=code&scope={}&state={}",
            self.base_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode("user:read cards:read"),
            urlencoding::encode(state),
        )
    }

    async fn exchange(&self, artifact: &AuthorizationArtifact) -> IdentityResult<AccessToken> {
        let code = match artifact {
            AuthorizationArtifact::Code(code) => code,
            AuthorizationArtifact::Token(token) => return Ok(AccessToken::new(token.clone())),
        };

        let params = [
            ("code", code.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::ProviderAuth {
                provider: ProviderKind::Wallet,
                status: status.as_u16(),
            });
        }

        let token: WalletTokenResponse =
            response
                .json()
                .await
                .map_err(|e| IdentityError::ProviderProtocol {
                    provider: ProviderKind::Wallet,
                    reason: e.to_string(),
                })?;

        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_profile(&self, access_token: &AccessToken) -> IdentityResult<ExternalProfile> {
        let profile = self.fetch_raw_profile(access_token).await?;

        Ok(ExternalProfile {
            provider: ProviderKind::Wallet,
            external_id: profile.id,
            email: normalize_email(profile.email),
            display_name: profile.name,
            birthdate: profile.birthdate,
            avatar_url: profile.picture,
            gender: None,
        })
    }

    async fn balances(
        &self,
        access_token: &AccessToken,
        currency: &str,
    ) -> IdentityResult<WalletBalances> {
        let profile = self.fetch_raw_profile(access_token).await?;
        let cards = self.fetch_cards(access_token).await?;

        Ok(WalletBalances {
            cards: cards
                .into_iter()
                .filter(|card| card.currency == currency)
                .collect(),
            member_since: profile.member_at,
        })
    }
}
