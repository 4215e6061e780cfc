//! Token verification and account info
//!
//! The console refuses to do anything until the access token checks out
//! against /authorization_tokens/me. Subscription days degrade gracefully:
//! a failed lookup logs a warning and reports zero days instead of
//! blocking the whole session.

use tracing::{info, warn};

use crate::models::{AppError, AppResult, ClientPoint, SubscriptionDays, TokenInfo};
use crate::providers::http::ApiClient;

pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Verify the configured token and return its access modules.
    /// A 401 is reported as an invalid token rather than a generic
    /// API failure so callers can prompt for a new one.
    pub async fn verify_token(&self) -> AppResult<TokenInfo> {
        if self.api.config().token.is_none() {
            return Err(AppError::invalid_token("No access token configured"));
        }

        let info: TokenInfo = match self.api.get("/authorization_tokens/me").await {
            Ok(info) => info,
            Err(e) if e.code.is_auth_failure() => {
                return Err(AppError::invalid_token("Access token rejected by the API"));
            }
            Err(e) => return Err(e),
        };

        info!(
            "✅ Token verified, modules: {:?}",
            info.access_modules.iter().map(|m| m.as_str()).collect::<Vec<_>>()
        );
        Ok(info)
    }

    /// The restaurant location this token belongs to
    pub async fn client_point(&self) -> AppResult<ClientPoint> {
        self.api.get("/client_points/me").await
    }

    /// Remaining paid subscription days, zero when the lookup fails
    pub async fn subscription_days(&self) -> SubscriptionDays {
        match self.api.get("/client_points/me/subscription_days").await {
            Ok(days) => days,
            Err(e) => {
                warn!("⚠️ Subscription days unavailable: {}", e);
                SubscriptionDays { days: 0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;

    #[tokio::test]
    async fn test_verify_without_token_fails_fast() {
        let api = ApiClient::new(AdminConfig::default());
        let auth = AuthClient::new(api);
        let err = auth.verify_token().await.unwrap_err();
        assert_eq!(err.code, crate::models::ErrorCode::AuthInvalidToken);
    }
}
