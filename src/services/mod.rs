//! Business logic services

pub mod auth;
pub mod catalog;
pub mod eligibility;
pub mod holdings;
pub mod signing;
pub mod title_holds;

use std::sync::Arc;

use crate::{
    config::{CatalogConfig, HoldsConfig},
    error::AppResult,
    repository::Repository,
};

use self::{
    auth::CatalogLogin, catalog::CatalogConnection, eligibility::HiddenLocations,
    signing::RequestSigner, title_holds::TitleHolds,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    /// `None` when the deployment has no catalog connection
    pub catalog: Option<Arc<dyn CatalogConnection>>,
    pub signer: Arc<dyn RequestSigner>,
    pub hidden_locations: Arc<HiddenLocations>,
    pub holds_config: HoldsConfig,
    pub repository: Option<Repository>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        catalog_config: CatalogConfig,
        holds_config: HoldsConfig,
    ) -> AppResult<Self> {
        let catalog: Option<Arc<dyn CatalogConnection>> = if catalog_config.enabled {
            Some(Arc::new(catalog::SqlCatalog::new(repository.clone(), catalog_config)))
        } else {
            tracing::warn!("Catalog connection disabled, title holds will never be offered");
            None
        };

        let signer = signing::HmacSigner::new(&holds_config.hmac_key)?;

        Ok(Self::with_parts(catalog, Arc::new(signer), holds_config, Some(repository)))
    }

    /// Assemble services from already built collaborators
    pub fn with_parts(
        catalog: Option<Arc<dyn CatalogConnection>>,
        signer: Arc<dyn RequestSigner>,
        holds_config: HoldsConfig,
        repository: Option<Repository>,
    ) -> Self {
        let hidden_locations = Arc::new(HiddenLocations::new(holds_config.hide_holdings.iter().cloned()));
        Self {
            catalog,
            signer,
            hidden_locations,
            holds_config,
            repository,
        }
    }

    /// Title hold evaluation bound to one request's patron login
    pub fn title_holds<'a>(&'a self, login: &'a dyn CatalogLogin) -> TitleHolds<'a> {
        TitleHolds::new(
            self.catalog.as_deref(),
            login,
            self.signer.as_ref(),
            &self.hidden_locations,
            &self.holds_config,
        )
    }
}
