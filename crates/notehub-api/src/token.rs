use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use notehub_types::api::{AdminClaims, UserClaims};

use crate::error::ApiError;

pub const ADMIN_ROLE: &str = "admin";

/// Issues and verifies the two token shapes: user tokens carrying
/// `{sub, email}` with a 1 hour TTL, and admin tokens carrying only a role
/// claim with a 12 hour TTL. The signing secret is injected at construction;
/// nothing else in the process holds it. There is no revocation — logout is
/// a client-side discard and a stolen token stays valid until expiry.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue_user(&self, user_id: Uuid, email: &str) -> Result<String, ApiError> {
        self.issue_user_with_ttl(user_id, email, Duration::hours(1))
    }

    fn issue_user_with_ttl(
        &self,
        user_id: Uuid,
        email: &str,
        ttl: Duration,
    ) -> Result<String, ApiError> {
        let claims = UserClaims {
            sub: user_id,
            email: email.to_string(),
            exp: expiry(ttl),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("token encoding failed: {}", e).into())
    }

    pub fn issue_admin(&self) -> Result<String, ApiError> {
        self.issue_admin_with_ttl(Duration::hours(12))
    }

    fn issue_admin_with_ttl(&self, ttl: Duration) -> Result<String, ApiError> {
        let claims = AdminClaims {
            role: ADMIN_ROLE.to_string(),
            exp: expiry(ttl),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("token encoding failed: {}", e).into())
    }

    pub fn verify_user(&self, token: &str) -> Result<UserClaims, ApiError> {
        decode::<UserClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| invalid_token())
    }

    pub fn verify_admin(&self, token: &str) -> Result<AdminClaims, ApiError> {
        let claims = decode::<AdminClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| invalid_token())?;
        if claims.role != ADMIN_ROLE {
            return Err(invalid_token());
        }
        Ok(claims)
    }
}

fn invalid_token() -> ApiError {
    ApiError::unauthorized("Access denied: Invalid or expired token")
}

fn expiry(ttl: Duration) -> usize {
    (chrono::Utc::now() + ttl).timestamp() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_token_round_trips() {
        let svc = TokenService::new("test-secret");
        let id = Uuid::new_v4();

        let token = svc.issue_user(id, "a@x.com").unwrap();
        let claims = svc.verify_user(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn admin_token_round_trips() {
        let svc = TokenService::new("test-secret");

        let token = svc.issue_admin().unwrap();
        let claims = svc.verify_admin(&token).unwrap();
        assert_eq!(claims.role, ADMIN_ROLE);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = TokenService::new("test-secret");
        let id = Uuid::new_v4();

        // Past the default 60s decode leeway.
        let token = svc
            .issue_user_with_ttl(id, "a@x.com", Duration::seconds(-120))
            .unwrap();
        assert!(svc.verify_user(&token).is_err());
    }

    #[test]
    fn tokens_do_not_cross_roles() {
        let svc = TokenService::new("test-secret");

        let user_token = svc.issue_user(Uuid::new_v4(), "a@x.com").unwrap();
        assert!(svc.verify_admin(&user_token).is_err());

        let admin_token = svc.issue_admin().unwrap();
        assert!(svc.verify_user(&admin_token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let svc = TokenService::new("test-secret");
        let other = TokenService::new("other-secret");

        let token = svc.issue_user(Uuid::new_v4(), "a@x.com").unwrap();
        assert!(other.verify_user(&token).is_err());

        assert!(svc.verify_user("not-a-token").is_err());
        assert!(svc.verify_user("").is_err());
    }
}
