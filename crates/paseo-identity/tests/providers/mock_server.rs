//! Mock provider endpoint infrastructure.
//!
//! Stands in for the wallet and social provider APIs so adapter tests run
//! without external dependencies.

use serde_json::json;
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common::{MockProfile, MockToken};

/// Mount a successful wallet token exchange.
///
/// The wallet provider authenticates clients with HTTP Basic credentials on
/// the token endpoint.
pub async fn mount_wallet_token_success(
    server: &MockServer,
    token: &MockToken,
    client_id: &str,
    client_secret: &str,
) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(basic_auth(client_id, client_secret))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token.access_token,
            "token_type": token.token_type,
            "expires_in": token.expires_in,
        })))
        .mount(server)
        .await;
}

/// Mount a failing wallet token exchange with an OAuth error body.
pub async fn mount_wallet_token_error(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "The authorization code has expired or is invalid",
        })))
        .mount(server)
        .await;
}

/// Mount a wallet token endpoint that returns an unparseable body.
pub async fn mount_wallet_token_garbage(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(server)
        .await;
}

/// Mount the wallet profile endpoint for a bearer token.
pub async fn mount_wallet_profile(server: &MockServer, profile: &MockProfile, access_token: &str) {
    Mock::given(method("GET"))
        .and(path("/v0/me"))
        .and(header("authorization", format!("Bearer {access_token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": profile.provider_id,
            "email": profile.email,
            "name": profile.name,
            "birthdate": profile.birthdate,
            "picture": profile.avatar_url,
            "memberAt": profile.member_since,
        })))
        .mount(server)
        .await;
}

/// Mount a wallet profile endpoint that rejects every token.
pub async fn mount_wallet_profile_rejected(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v0/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_token",
        })))
        .mount(server)
        .await;
}

/// Mount the wallet cards listing.
pub async fn mount_wallet_cards(server: &MockServer, access_token: &str) {
    Mock::given(method("GET"))
        .and(path("/v0/me/cards"))
        .and(header("authorization", format!("Bearer {access_token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "card-pso",
                "label": "Rewards",
                "currency": "PSO",
                "balance": "42.0",
                "available": "40.0",
            },
            {
                "id": "card-usd",
                "label": "Cash",
                "currency": "USD",
                "balance": "10.0",
                "available": "10.0",
            },
        ])))
        .mount(server)
        .await;
}

/// Mount a successful social token exchange.
pub async fn mount_social_token_success(server: &MockServer, token: &MockToken) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token.access_token,
            "token_type": token.token_type,
            "expires_in": token.expires_in,
        })))
        .mount(server)
        .await;
}

/// Mount a failing social token exchange.
pub async fn mount_social_token_error(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": "access_denied",
            "error_description": "The user denied the authorization request",
        })))
        .mount(server)
        .await;
}

/// Mount the social profile endpoint for a bearer token.
pub async fn mount_social_profile(server: &MockServer, profile: &MockProfile, access_token: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", format!("Bearer {access_token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": profile.provider_id,
            "name": profile.name,
            "email": profile.email,
            "birthday": profile.birthdate,
            "gender": profile.gender,
            "picture": profile.avatar_url,
        })))
        .mount(server)
        .await;
}

/// Mount a social profile endpoint that returns an unparseable body.
pub async fn mount_social_profile_garbage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
        .mount(server)
        .await;
}
