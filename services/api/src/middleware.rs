//! Authentication middleware for JWT token validation
//!
//! Access tokens are issued by the hosted auth provider and signed with a
//! shared HS256 secret. This service only verifies them.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Audience claim carried by user access tokens
const TOKEN_AUDIENCE: &str = "authenticated";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration time
    pub exp: u64,
    pub aud: String,
}

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Verifies bearer tokens against the shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[TOKEN_AUDIENCE]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected access token: {}", e);
                ApiError::Unauthorized
            })?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let user = state.jwt.verify(bearer.token())?;

    // Insert the user into the request extensions
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token(secret: &str, aud: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: Uuid::nil(),
            email: Some("maker@example.com".to_string()),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as u64,
            aud: aud.to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        let user = JwtVerifier::new(SECRET)
            .verify(&token(SECRET, TOKEN_AUDIENCE, 3600))
            .unwrap();
        assert_eq!(user.id, Uuid::nil());
        assert_eq!(user.email.as_deref(), Some("maker@example.com"));
    }

    #[test]
    fn test_rejected_tokens() {
        let verifier = JwtVerifier::new(SECRET);
        assert!(verifier.verify(&token("other-secret", TOKEN_AUDIENCE, 3600)).is_err());
        assert!(verifier.verify(&token(SECRET, "anon", 3600)).is_err());
        assert!(verifier.verify(&token(SECRET, TOKEN_AUDIENCE, -3600)).is_err());
        assert!(verifier.verify("garbage").is_err());
    }
}
