use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::models::Role;

pub const ISSUER: &str = "dhanlaxmi-saree-sadan";
pub const AUDIENCE: &str = "dhanlaxmi-users";
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Identity carried inside a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: String,
    email: String,
    role: Role,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Returned for every failed verification; the cause is only logged.
#[derive(Debug, Error, PartialEq)]
#[error("invalid or expired session token")]
pub struct TokenRejected;

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        // Expiry is exact; no clock tolerance.
        validation.leeway = 0;

        TokenService {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, payload: &SessionPayload) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(payload, Utc::now())
    }

    fn issue_at(
        &self,
        payload: &SessionPayload,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            user_id: payload.user_id.clone(),
            email: payload.email.clone(),
            role: payload.role,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<SessionPayload, TokenRejected> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(SessionPayload {
                user_id: data.claims.user_id,
                email: data.claims.email,
                role: data.claims.role,
            }),
            Err(e) => {
                warn!("Session token rejected: {}", e);
                Err(TokenRejected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn payload() -> SessionPayload {
        SessionPayload {
            user_id: "2b1f6c1e-4c55-4c4e-9a51-8d8f7a1c0a11".to_string(),
            email: "asha@example.com".to_string(),
            role: Role::User,
        }
    }

    fn forge(claims: &Claims, secret: &str, alg: Algorithm) -> String {
        encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims_with(iss: &str, aud: &str) -> Claims {
        let now = Utc::now();
        Claims {
            user_id: "u-1".to_string(),
            email: "asha@example.com".to_string(),
            role: Role::Admin,
            iss: iss.to_string(),
            aud: aud.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(1)).timestamp(),
        }
    }

    #[test]
    fn issued_token_verifies_to_same_payload() {
        let service = TokenService::new(&test_config());
        let token = service.issue(&payload()).unwrap();
        assert_eq!(service.verify(&token), Ok(payload()));

        let admin = SessionPayload { role: Role::Admin, ..payload() };
        let token = service.issue(&admin).unwrap();
        assert_eq!(service.verify(&token), Ok(admin));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let mut other = test_config();
        other.jwt_secret = "a-completely-different-secret".to_string();
        let token = TokenService::new(&other).issue(&payload()).unwrap();

        let service = TokenService::new(&test_config());
        assert_eq!(service.verify(&token), Err(TokenRejected));
    }

    #[test]
    fn wrong_issuer_or_audience_is_rejected() {
        let config = test_config();
        let service = TokenService::new(&config);

        let good = forge(&claims_with(ISSUER, AUDIENCE), &config.jwt_secret, Algorithm::HS256);
        assert!(service.verify(&good).is_ok());

        let bad_iss = forge(&claims_with("someone-else", AUDIENCE), &config.jwt_secret, Algorithm::HS256);
        assert_eq!(service.verify(&bad_iss), Err(TokenRejected));

        let bad_aud = forge(&claims_with(ISSUER, "other-users"), &config.jwt_secret, Algorithm::HS256);
        assert_eq!(service.verify(&bad_aud), Err(TokenRejected));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let config = test_config();
        let service = TokenService::new(&config);
        let token = forge(&claims_with(ISSUER, AUDIENCE), &config.jwt_secret, Algorithm::HS512);
        assert_eq!(service.verify(&token), Err(TokenRejected));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new(&test_config());
        let token = service
            .issue_at(&payload(), Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1))
            .unwrap();
        assert_eq!(service.verify(&token), Err(TokenRejected));
    }

    #[test]
    fn token_expired_seconds_ago_is_rejected() {
        let service = TokenService::new(&test_config());
        let issued = Utc::now() - Duration::days(TOKEN_TTL_DAYS) - Duration::seconds(5);
        let token = service.issue_at(&payload(), issued).unwrap();
        assert_eq!(service.verify(&token), Err(TokenRejected));

        let fresh = Utc::now() - Duration::days(TOKEN_TTL_DAYS) + Duration::seconds(30);
        let token = service.issue_at(&payload(), fresh).unwrap();
        assert_eq!(service.verify(&token), Ok(payload()));
    }

    #[test]
    fn garbage_and_tampered_tokens_are_rejected() {
        let service = TokenService::new(&test_config());
        assert_eq!(service.verify("not-a-token"), Err(TokenRejected));
        assert_eq!(service.verify(""), Err(TokenRejected));

        let token = service.issue(&payload()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_body = forge(&claims_with(ISSUER, AUDIENCE), "x", Algorithm::HS256);
        parts[1] = forged_body.split('.').nth(1).unwrap();
        assert_eq!(service.verify(&parts.join(".")), Err(TokenRejected));
    }

    #[test]
    fn token_expires_after_seven_days() {
        let service = TokenService::new(&test_config());
        let issued = Utc::now();
        let token = service.issue_at(&payload(), issued).unwrap();
        let data = decode::<Claims>(&token, &service.decoding, &service.validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(data.claims.iss, ISSUER);
        assert_eq!(data.claims.aud, AUDIENCE);
    }
}
