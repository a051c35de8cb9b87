use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::UserId;

/// JWT Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user UUID)
    pub aud: String, // Audience
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: i64, // Expiration timestamp
    pub iat: i64, // Issued at timestamp
    pub iss: String,
    #[serde(default)]
    pub jti: Option<String>,
}

impl Claims {
    /// The caller's identity. `None` if `sub` is not a UUID.
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }
}

/// JWT Service - verifies bearer tokens (HS256 shared secret)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }

    /// Create a token for a user, valid for `ttl`.
    ///
    /// Production tokens come from the identity provider; this is for tests
    /// and local tooling that share the secret.
    pub fn create_token(
        &self,
        user_id: UserId,
        email: Option<String>,
        ttl: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            aud: self.audience.clone(),
            email,
            role: Some("authenticated".to_string()),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token
    ///
    /// Returns claims if signature, issuer, audience and expiry all check out
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service(secret: &str) -> JwtService {
        JwtService::new(secret, "test_issuer".to_string(), "authenticated".to_string())
    }

    #[test]
    fn test_create_and_verify_token() {
        let service = service("test_secret_key");
        let user_id = UserId::new();

        let token = service
            .create_token(user_id, Some("player@example.com".to_string()), Duration::hours(1))
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.email.as_deref(), Some("player@example.com"));
        assert_eq!(claims.iss, "test_issuer");
        assert_eq!(claims.aud, "authenticated");
    }

    #[test]
    fn test_invalid_token() {
        let result = service("test_secret_key").verify_token("invalid_token");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = service("secret1")
            .create_token(UserId::new(), None, Duration::hours(1))
            .unwrap();

        // Token created with secret1 should not verify with secret2
        assert!(service("secret2").verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience() {
        let issuer = JwtService::new("s", "test_issuer".to_string(), "anon".to_string());
        let token = issuer
            .create_token(UserId::new(), None, Duration::hours(1))
            .unwrap();

        assert!(service("s").verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = service("test_secret_key");
        // Well past the default 60s leeway
        let token = service
            .create_token(UserId::new(), None, Duration::hours(-2))
            .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject_has_no_user_id() {
        let claims = Claims {
            sub: "service-role".to_string(),
            aud: "authenticated".to_string(),
            email: None,
            role: None,
            exp: 0,
            iat: 0,
            iss: "test_issuer".to_string(),
            jti: None,
        };
        assert_eq!(claims.user_id(), None);
    }
}
