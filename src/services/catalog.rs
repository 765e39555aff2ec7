//! Catalog (ILS) connection used by the title hold logic

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        hold::{HOLDS_FUNCTION, TITLE_LEVEL},
        CapabilityDescriptor, HoldRequestDescriptor, HoldingItem, PatronSession, PolicyMode,
    },
    repository::Repository,
};

/// Catalog operations consumed by the hold logic.
///
/// Implementations own their I/O; the hold logic only sequences calls and
/// propagates failures unchanged.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogConnection: Send + Sync {
    /// Deployment-wide title hold mode
    async fn get_title_holds_mode(&self) -> AppResult<PolicyMode>;

    /// Copies of a record, in catalog order
    async fn get_holding(&self, id: &str) -> AppResult<Vec<HoldingItem>>;

    /// Whether `function` is supported for `id`, and how
    async fn check_function(&self, function: &str, id: &str) -> AppResult<Option<CapabilityDescriptor>>;

    /// Server-side validation of a hold request for a patron
    async fn check_request_is_valid(
        &self,
        id: &str,
        data: &HoldRequestDescriptor,
        patron: &PatronSession,
    ) -> AppResult<bool>;

    /// Catalog-native hold URL
    async fn get_hold_link(&self, id: &str, data: &HoldRequestDescriptor) -> AppResult<String>;
}

/// Catalog backed by the local PostgreSQL database
#[derive(Clone)]
pub struct SqlCatalog {
    repository: Repository,
    config: CatalogConfig,
}

impl SqlCatalog {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }
}

/// Record ids are numeric in the local catalog
fn parse_record_id(id: &str) -> AppResult<i32> {
    id.trim()
        .parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("Record {} not found", id)))
}

/// Substitute the url-encoded record id into a hold link template
pub fn expand_hold_link(template: &str, id: &str) -> String {
    template.replace("{id}", &urlencoding::encode(id))
}

#[async_trait]
impl CatalogConnection for SqlCatalog {
    async fn get_title_holds_mode(&self) -> AppResult<PolicyMode> {
        Ok(self.config.title_holds_mode)
    }

    async fn get_holding(&self, id: &str) -> AppResult<Vec<HoldingItem>> {
        let item_id = parse_record_id(id)?;
        self.repository.holdings.get_holdings(item_id).await
    }

    async fn check_function(&self, function: &str, id: &str) -> AppResult<Option<CapabilityDescriptor>> {
        if function != HOLDS_FUNCTION {
            return Ok(None);
        }

        let Some(holds_function) = self.config.holds_function.clone() else {
            tracing::debug!("Holds not supported by catalog (record {})", id);
            return Ok(None);
        };

        Ok(Some(CapabilityDescriptor {
            function: holds_function,
            signed_keys: self.config.hmac_keys.clone(),
        }))
    }

    async fn check_request_is_valid(
        &self,
        id: &str,
        data: &HoldRequestDescriptor,
        patron: &PatronSession,
    ) -> AppResult<bool> {
        if data.get("level") != Some(TITLE_LEVEL) {
            return Ok(false);
        }
        let item_id = parse_record_id(id)?;
        self.repository
            .holdings
            .title_hold_allowed(item_id, patron.user_id)
            .await
    }

    async fn get_hold_link(&self, id: &str, _data: &HoldRequestDescriptor) -> AppResult<String> {
        let template = self.config.hold_link_template.as_deref().ok_or_else(|| {
            AppError::Catalog("No hold link template configured for the catalog".to_string())
        })?;
        Ok(expand_hold_link(template, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id("123").unwrap(), 123);
        assert_eq!(parse_record_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_record_id("abc"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_expand_hold_link() {
        assert_eq!(
            expand_hold_link("https://ils.example.org/record/{id}/hold", "12 3"),
            "https://ils.example.org/record/12%203/hold"
        );
    }
}
