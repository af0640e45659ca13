use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, Claims, LoginInput};
use super::errors::AuthError;

/// Subject placed in every issued token.
pub const FIXED_SUBJECT: &str = "1";

/// Token signing configuration
#[derive(Clone)]
pub struct TokenConfig {
    pub jwt_secret: String,
    pub ttl_secs: u64,
}

impl From<&configs::AuthConfig> for TokenConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self { jwt_secret: c.jwt_secret.clone(), ttl_secs: c.token_ttl_secs }
    }
}

/// Auth business service independent of web framework
pub struct AuthService {
    cfg: TokenConfig,
}

impl AuthService {
    pub fn new(cfg: TokenConfig) -> Self { Self { cfg } }

    /// Issue an HS256 token for `username`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenConfig, domain::LoginInput};
    /// let svc = AuthService::new(TokenConfig { jwt_secret: "secret".into(), ttl_secs: 60 });
    /// let session = svc.login(LoginInput { username: "alice".into(), password: "x".into() }).unwrap();
    /// assert_eq!(svc.verify(&session.access_token).unwrap().username, "alice");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let iat = Utc::now().timestamp() as usize;
        let claims = Claims {
            username: input.username,
            sub: FIXED_SUBJECT.to_string(),
            iat,
            exp: iat + self.cfg.ttl_secs as usize,
        };
        let access_token = encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        info!("token_issued");
        Ok(AuthSession { access_token })
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token_rejected");
                AuthError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(secret: &str) -> AuthService {
        AuthService::new(TokenConfig { jwt_secret: secret.into(), ttl_secs: 3600 })
    }

    fn login(svc: &AuthService, user: &str) -> String {
        svc.login(LoginInput { username: user.into(), password: "whatever".into() }).unwrap().access_token
    }

    #[test]
    fn issued_token_carries_username_and_fixed_subject() {
        let s = svc("k1");
        let claims = s.verify(&login(&s, "bob")).unwrap();
        assert_eq!(claims.username, "bob");
        assert_eq!(claims.sub, FIXED_SUBJECT);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn any_password_is_accepted() {
        let s = svc("k1");
        assert!(s.login(LoginInput { username: "bob".into(), password: String::new() }).is_ok());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = login(&svc("k1"), "bob");
        assert!(matches!(svc("k2").verify(&token), Err(AuthError::Unauthorized)));
        assert!(svc("k1").verify("not-a-token").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let s = svc("k1");
        let past = Utc::now().timestamp() as usize - 7200;
        let claims = Claims { username: "bob".into(), sub: FIXED_SUBJECT.into(), iat: past, exp: past + 60 };
        let token = encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(b"k1")).unwrap();
        assert!(matches!(s.verify(&token), Err(AuthError::Unauthorized)));
    }
}
