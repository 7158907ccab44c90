//! Wallet adapter tests against mock provider endpoints.

use chrono::NaiveDate;
use wiremock::MockServer;

use paseo_identity::{
    AccessToken, AuthorizationArtifact, IdentityError, ProviderAdapter, ProviderKind, WalletAdapter,
};

use super::common::{test_credentials, MockProfile, MockToken};
use super::mock_server::{
    mount_wallet_cards, mount_wallet_profile, mount_wallet_profile_rejected,
    mount_wallet_token_error, mount_wallet_token_garbage, mount_wallet_token_success,
};

fn adapter(server: &MockServer) -> WalletAdapter {
    WalletAdapter::new(test_credentials(), server.uri())
}

#[tokio::test]
async fn test_wallet_exchange_uses_basic_auth_and_returns_token() {
    let server = MockServer::start().await;
    let token = MockToken::wallet();
    mount_wallet_token_success(&server, &token, "test-client-id", "test-client-secret").await;

    let result = adapter(&server)
        .exchange(&AuthorizationArtifact::Code("auth-code".to_string()))
        .await
        .unwrap();

    assert_eq!(result.as_str(), token.access_token);
}

#[tokio::test]
async fn test_wallet_exchange_rejection_maps_to_provider_auth() {
    let server = MockServer::start().await;
    mount_wallet_token_error(&server, 400).await;

    let err = adapter(&server)
        .exchange(&AuthorizationArtifact::Code("expired-code".to_string()))
        .await
        .unwrap_err();

    match err {
        IdentityError::ProviderAuth { provider, status } => {
            assert_eq!(provider, ProviderKind::Wallet);
            assert_eq!(status, 400);
        }
        other => panic!("expected ProviderAuth, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wallet_exchange_garbage_body_maps_to_provider_protocol() {
    let server = MockServer::start().await;
    mount_wallet_token_garbage(&server).await;

    let err = adapter(&server)
        .exchange(&AuthorizationArtifact::Code("auth-code".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::ProviderProtocol { .. }));
}

#[tokio::test]
async fn test_wallet_profile_is_normalized() {
    let server = MockServer::start().await;
    let profile = MockProfile::wallet();
    mount_wallet_profile(&server, &profile, "wlt_mock_access_token").await;

    let result = adapter(&server)
        .fetch_profile(&AccessToken::new("wlt_mock_access_token"))
        .await
        .unwrap();

    assert_eq!(result.provider, ProviderKind::Wallet);
    assert_eq!(result.external_id, "wallet-user-1");
    // Email is lowercased during normalization.
    assert_eq!(result.email.as_deref(), Some("jane@x.com"));
    assert_eq!(result.display_name.as_deref(), Some("Jane Doe"));
    assert_eq!(
        result.birthday(),
        NaiveDate::from_ymd_opt(1990, 4, 10)
    );
    assert!(result.gender.is_none());

    let (first, last) = result.name_parts();
    assert_eq!(first, "Jane");
    assert_eq!(last, "Doe");
}

#[tokio::test]
async fn test_wallet_profile_rejected_token_maps_to_provider_auth() {
    let server = MockServer::start().await;
    mount_wallet_profile_rejected(&server).await;

    let err = adapter(&server)
        .fetch_profile(&AccessToken::new("revoked-token"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IdentityError::ProviderAuth { status: 401, .. }
    ));
}

#[tokio::test]
async fn test_wallet_balances_filters_by_currency() {
    let server = MockServer::start().await;
    let profile = MockProfile::wallet();
    mount_wallet_profile(&server, &profile, "wlt_mock_access_token").await;
    mount_wallet_cards(&server, "wlt_mock_access_token").await;

    let balances = adapter(&server)
        .balances(&AccessToken::new("wlt_mock_access_token"), "PSO")
        .await
        .unwrap();

    assert_eq!(balances.cards.len(), 1);
    assert_eq!(balances.cards[0].id, "card-pso");
    assert_eq!(balances.cards[0].balance, "42.0");
    assert_eq!(
        balances.member_since.as_deref(),
        Some("2021-06-01T00:00:00.000Z")
    );
}
