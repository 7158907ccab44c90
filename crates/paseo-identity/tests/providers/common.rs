//! Common test fixtures for provider adapter tests.

use paseo_identity::ProviderCredentials;

/// Mock profile data served by the provider endpoints.
#[derive(Debug, Clone)]
pub struct MockProfile {
    pub provider_id: String,
    pub email: String,
    pub name: String,
    pub birthdate: String,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub member_since: Option<String>,
}

impl MockProfile {
    #[must_use]
    pub fn wallet() -> Self {
        Self {
            provider_id: "wallet-user-1".to_string(),
            email: "Jane@X.com".to_string(),
            name: "Jane Doe".to_string(),
            birthdate: "04/10/1990".to_string(),
            avatar_url: None,
            gender: None,
            member_since: Some("2021-06-01T00:00:00.000Z".to_string()),
        }
    }

    #[must_use]
    pub fn social() -> Self {
        Self {
            provider_id: "soc-42".to_string(),
            email: "Jane@Social.Example".to_string(),
            name: "Jane Doe".to_string(),
            birthdate: "04/10/1990".to_string(),
            avatar_url: Some("https://cdn.social.test/p.jpg".to_string()),
            gender: Some("female".to_string()),
            member_since: None,
        }
    }
}

/// Mock token payload returned by the token endpoints.
#[derive(Debug, Clone)]
pub struct MockToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl MockToken {
    #[must_use]
    pub fn wallet() -> Self {
        Self {
            access_token: "wlt_mock_access_token".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
        }
    }

    #[must_use]
    pub fn social() -> Self {
        Self {
            access_token: "soc_mock_access_token".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 5_184_000,
        }
    }
}

/// Credentials every adapter test runs with.
#[must_use]
pub fn test_credentials() -> ProviderCredentials {
    ProviderCredentials {
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
    }
}
