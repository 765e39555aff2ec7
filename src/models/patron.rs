//! Patron identity carried by bearer tokens

use serde::{Deserialize, Serialize};

/// JWT claims for an authenticated patron
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatronClaims {
    pub sub: String,
    pub user_id: i32,
    /// Login known to the catalog, when it differs from `sub`
    #[serde(default)]
    pub cat_username: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl PatronClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Catalog credentials of the current patron
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatronSession {
    pub user_id: i32,
    pub cat_username: String,
}

impl From<PatronClaims> for PatronSession {
    fn from(claims: PatronClaims) -> Self {
        Self {
            user_id: claims.user_id,
            cat_username: claims.cat_username.unwrap_or(claims.sub),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp_offset: i64) -> PatronClaims {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        PatronClaims {
            sub: "reader".to_string(),
            user_id: 42,
            cat_username: None,
            exp: now + exp_offset,
            iat: now,
        }
    }

    #[test]
    fn test_token_roundtrip_and_session() {
        let token = claims(3600).create_token("secret").unwrap();
        let decoded = PatronClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 42);

        let session = PatronSession::from(decoded);
        assert_eq!(session.cat_username, "reader");
    }

    #[test]
    fn test_token_wrong_secret_or_expired() {
        let token = claims(3600).create_token("secret").unwrap();
        assert!(PatronClaims::from_token(&token, "other").is_err());

        let expired = claims(-3600).create_token("secret").unwrap();
        assert!(PatronClaims::from_token(&expired, "secret").is_err());
    }
}
