//! Title hold logic: decides whether a record gets a hold action and builds it

use crate::{
    config::HoldsConfig,
    error::AppResult,
    models::{
        hold::HOLDS_FUNCTION, CapabilityDescriptor, HoldLink, HoldRequestDescriptor,
        HoldingItem, PatronSession, PolicyMode,
    },
    services::{
        auth::CatalogLogin,
        catalog::CatalogConnection,
        eligibility::{self, Eligibility, HiddenLocations},
        holdings::HoldingsCache,
        signing::{self, RequestSigner},
    },
};

/// Title hold evaluation for one request.
///
/// Borrows its collaborators; build a new one per request.
pub struct TitleHolds<'a> {
    catalog: Option<&'a dyn CatalogConnection>,
    login: &'a dyn CatalogLogin,
    signer: &'a dyn RequestSigner,
    hidden: &'a HiddenLocations,
    allow_holds_override: bool,
}

impl<'a> TitleHolds<'a> {
    pub fn new(
        catalog: Option<&'a dyn CatalogConnection>,
        login: &'a dyn CatalogLogin,
        signer: &'a dyn RequestSigner,
        hidden: &'a HiddenLocations,
        config: &HoldsConfig,
    ) -> Self {
        Self {
            catalog,
            login,
            signer,
            hidden,
            allow_holds_override: config.allow_holds_override,
        }
    }

    /// Hold action for a record, or `None` when no hold must be offered
    pub async fn get_hold(&self, id: &str) -> AppResult<Option<HoldLink>> {
        let mut cache = HoldingsCache::new();
        self.get_hold_with(id, &mut cache).await
    }

    /// Same as [`get_hold`](Self::get_hold), sharing `cache` with other
    /// evaluations of the same request
    pub async fn get_hold_with(
        &self,
        id: &str,
        cache: &mut HoldingsCache,
    ) -> AppResult<Option<HoldLink>> {
        let Some(catalog) = self.catalog else {
            tracing::debug!("No catalog connection, no hold for record {}", id);
            return Ok(None);
        };

        let mode = match catalog.get_title_holds_mode().await? {
            PolicyMode::Disabled => return Ok(None),
            PolicyMode::Driver => PolicyMode::Driver,
            configured => self.resolve_mode(catalog, id, configured, cache).await?,
        };

        let patron = match mode {
            PolicyMode::Disabled => return Ok(None),
            PolicyMode::Driver => match self.login.stored_catalog_login() {
                Some(patron) => Some(patron),
                None => {
                    tracing::debug!("Driver title holds need a patron login (record {})", id);
                    return Ok(None);
                }
            },
            PolicyMode::Always | PolicyMode::Availability => None,
        };

        let Some(capability) = catalog.check_function(HOLDS_FUNCTION, id).await? else {
            return Ok(None);
        };

        let holdings: &[HoldingItem] = match mode {
            PolicyMode::Availability => cache.fetch(catalog, id).await?,
            _ => &[],
        };

        match eligibility::evaluate(mode, holdings, self.hidden) {
            Eligibility::NoOffer => Ok(None),
            Eligibility::Delegate => match patron {
                Some(patron) => self.delegated_hold(catalog, id, &patron, &capability).await,
                None => Ok(None),
            },
            Eligibility::Offer => self.hold_link(catalog, id, &capability).await.map(Some),
        }
    }

    /// Apply per-copy hold overrides to the configured mode
    async fn resolve_mode(
        &self,
        catalog: &dyn CatalogConnection,
        id: &str,
        configured: PolicyMode,
        cache: &mut HoldingsCache,
    ) -> AppResult<PolicyMode> {
        if !self.allow_holds_override {
            return Ok(configured);
        }
        let holdings = cache.fetch(catalog, id).await?;
        let mode = eligibility::resolve_override(configured, true, holdings);
        if mode != configured {
            tracing::debug!("All copies of record {} disable holds", id);
        }
        Ok(mode)
    }

    /// The catalog validates the title request for the patron before it is signed
    async fn delegated_hold(
        &self,
        catalog: &dyn CatalogConnection,
        id: &str,
        patron: &PatronSession,
        capability: &CapabilityDescriptor,
    ) -> AppResult<Option<HoldLink>> {
        let data = HoldRequestDescriptor::title(id);
        if !catalog.check_request_is_valid(id, &data, patron).await? {
            tracing::debug!(
                "Catalog rejected title hold on record {} for patron {}",
                id,
                patron.user_id
            );
            return Ok(None);
        }

        let token = signing::hold_details(&data, &capability.signed_keys, self.signer)?;
        Ok(Some(HoldLink::Token(token)))
    }

    async fn hold_link(
        &self,
        catalog: &dyn CatalogConnection,
        id: &str,
        capability: &CapabilityDescriptor,
    ) -> AppResult<HoldLink> {
        let data = HoldRequestDescriptor::title(id);
        if capability.builds_own_link() {
            return Ok(HoldLink::CatalogUrl(catalog.get_hold_link(id, &data).await?));
        }
        let token = signing::hold_details(&data, &capability.signed_keys, self.signer)?;
        Ok(HoldLink::Token(token))
    }
}
