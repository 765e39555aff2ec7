//! Patron catalog login lookup

use crate::models::{PatronClaims, PatronSession};

/// Source of the current patron's catalog credentials
pub trait CatalogLogin: Send + Sync {
    fn stored_catalog_login(&self) -> Option<PatronSession>;
}

/// Login taken from the request's bearer token, if one was presented
#[derive(Debug, Clone, Default)]
pub struct BearerLogin {
    session: Option<PatronSession>,
}

impl BearerLogin {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl From<Option<PatronClaims>> for BearerLogin {
    fn from(claims: Option<PatronClaims>) -> Self {
        Self {
            session: claims.map(PatronSession::from),
        }
    }
}

impl CatalogLogin for BearerLogin {
    fn stored_catalog_login(&self) -> Option<PatronSession> {
        self.session.clone()
    }
}
