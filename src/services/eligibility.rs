//! Title hold eligibility rules
//!
//! Pure functions over a policy mode and a record's holdings. Nothing here talks
//! to the catalog: callers fetch holdings (through `HoldingsCache`) and pass them
//! in.

use std::collections::HashSet;

use crate::models::{HoldingItem, PolicyMode};

/// Locations whose copies never count as available
#[derive(Debug, Clone, Default)]
pub struct HiddenLocations(HashSet<String>);

impl HiddenLocations {
    pub fn new<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(locations.into_iter().map(Into::into).collect())
    }

    /// A missing location never matches
    pub fn hides(&self, location: Option<&str>) -> bool {
        location.map_or(false, |l| self.0.contains(l))
    }
}

/// Outcome of the eligibility state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Do not offer a hold
    NoOffer,
    /// Let the catalog validate the request for the current patron
    Delegate,
    /// Offer a hold
    Offer,
}

/// Effective mode once per-copy overrides are applied.
///
/// With overrides enabled, a record whose copies are all marked
/// `hold_override = "disabled"` (including a record without copies) is
/// disabled whatever the configured mode.
pub fn resolve_override(
    configured: PolicyMode,
    override_enabled: bool,
    holdings: &[HoldingItem],
) -> PolicyMode {
    if !override_enabled {
        return configured;
    }
    if holdings.iter().all(HoldingItem::is_hold_disabled) {
        PolicyMode::Disabled
    } else {
        configured
    }
}

/// Whether some visible copy is available right now
pub fn any_available(holdings: &[HoldingItem], hidden: &HiddenLocations) -> bool {
    holdings
        .iter()
        .any(|h| h.is_available() && !hidden.hides(h.location.as_deref()))
}

pub fn evaluate(mode: PolicyMode, holdings: &[HoldingItem], hidden: &HiddenLocations) -> Eligibility {
    match mode {
        PolicyMode::Disabled => Eligibility::NoOffer,
        PolicyMode::Driver => Eligibility::Delegate,
        PolicyMode::Always => Eligibility::Offer,
        PolicyMode::Availability => {
            if any_available(holdings, hidden) {
                Eligibility::NoOffer
            } else {
                Eligibility::Offer
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden(locations: &[&str]) -> HiddenLocations {
        HiddenLocations::new(locations.iter().copied())
    }

    #[test]
    fn test_disabled_never_offers() {
        let holdings = vec![HoldingItem::new(false, "Stacks"), HoldingItem::default()];
        assert_eq!(evaluate(PolicyMode::Disabled, &holdings, &hidden(&[])), Eligibility::NoOffer);
        assert_eq!(evaluate(PolicyMode::Disabled, &[], &hidden(&[])), Eligibility::NoOffer);
    }

    #[test]
    fn test_driver_delegates_and_always_offers() {
        let holdings = vec![HoldingItem::new(true, "Annex")];
        assert_eq!(evaluate(PolicyMode::Driver, &holdings, &hidden(&[])), Eligibility::Delegate);
        assert_eq!(evaluate(PolicyMode::Always, &holdings, &hidden(&[])), Eligibility::Offer);
    }

    #[test]
    fn test_hidden_location_is_not_available() {
        let holdings = vec![HoldingItem::new(true, "Stacks")];
        assert!(!any_available(&holdings, &hidden(&["Stacks"])));
        assert_eq!(
            evaluate(PolicyMode::Availability, &holdings, &hidden(&["Stacks"])),
            Eligibility::Offer
        );
    }

    #[test]
    fn test_visible_available_copy_blocks_hold() {
        let holdings = vec![HoldingItem::new(true, "Annex")];
        assert!(any_available(&holdings, &hidden(&["Stacks"])));
        assert_eq!(
            evaluate(PolicyMode::Availability, &holdings, &hidden(&["Stacks"])),
            Eligibility::NoOffer
        );
    }

    #[test]
    fn test_no_holdings_offers_hold() {
        assert!(!any_available(&[], &hidden(&["Stacks"])));
        assert_eq!(evaluate(PolicyMode::Availability, &[], &hidden(&[])), Eligibility::Offer);
    }

    #[test]
    fn test_partial_holdings_fail_closed() {
        let no_availability = HoldingItem {
            available: None,
            location: Some("Annex".to_string()),
            hold_override: None,
        };
        let no_location = HoldingItem {
            available: Some(true),
            location: None,
            hold_override: None,
        };
        let hidden = hidden(&["Stacks"]);
        assert!(!any_available(&[no_availability], &hidden));
        // a copy without location cannot be hidden
        assert!(any_available(&[no_location], &hidden));
    }

    #[test]
    fn test_mixed_holdings() {
        let holdings = vec![
            HoldingItem::new(false, "Annex"),
            HoldingItem::new(true, "Stacks"),
            HoldingItem::new(true, "Reserve"),
        ];
        assert!(!any_available(&holdings, &hidden(&["Stacks", "Reserve"])));
        assert!(any_available(&holdings, &hidden(&["Stacks"])));
    }

    #[test]
    fn test_override_all_disabled() {
        let holdings = vec![
            HoldingItem::default().with_hold_override("disabled"),
            HoldingItem::default().with_hold_override("disabled"),
        ];
        assert_eq!(resolve_override(PolicyMode::Always, true, &holdings), PolicyMode::Disabled);
        assert_eq!(resolve_override(PolicyMode::Always, false, &holdings), PolicyMode::Always);
    }

    #[test]
    fn test_override_keeps_mode_when_one_copy_differs() {
        let unflagged = vec![
            HoldingItem::default().with_hold_override("disabled"),
            HoldingItem::default(),
        ];
        let other_value = vec![
            HoldingItem::default().with_hold_override("disabled"),
            HoldingItem::default().with_hold_override("enabled"),
        ];
        assert_eq!(
            resolve_override(PolicyMode::Availability, true, &unflagged),
            PolicyMode::Availability
        );
        assert_eq!(resolve_override(PolicyMode::Always, true, &other_value), PolicyMode::Always);
    }

    #[test]
    fn test_override_empty_holdings_is_vacuously_disabled() {
        assert_eq!(resolve_override(PolicyMode::Always, true, &[]), PolicyMode::Disabled);
    }
}
