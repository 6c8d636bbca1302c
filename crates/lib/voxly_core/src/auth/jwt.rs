//! JWT token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use crate::error::{AuthError, AuthResult, TokenRejection};
use crate::models::auth::TokenClaims;

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 bearer tokens. Holds no durable state.
#[derive(Clone)]
pub struct TokenAuthority {
    secret: Vec<u8>,
    expiry: Duration,
}

impl TokenAuthority {
    pub fn new(secret: impl AsRef<[u8]>, expiry: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            expiry,
        }
    }

    /// Configured token lifetime.
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Sign a token for `user_id` valid from now until now + expiry.
    pub fn issue(&self, user_id: &str) -> AuthResult<IssuedToken> {
        if self.secret.is_empty() {
            return Err(AuthError::Signing("signing secret is empty".into()));
        }
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.expiry)
            .ok_or_else(|| AuthError::Signing("token lifetime out of range".into()))?;
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AuthError::Signing(format!("jwt encode: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and `nbf <= now <= exp`, returning the subject.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        self.claims(token).map(|c| c.user_id)
    }

    /// Verify and return the full claim set.
    pub fn claims(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let rejection = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::ImmatureSignature => TokenRejection::NotYetValid,
                    ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                    _ => TokenRejection::Malformed,
                };
                debug!(reason = %rejection, "token rejected");
                AuthError::InvalidToken(rejection)
            })
    }
}
