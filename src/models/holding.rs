//! Holding (per-copy catalog data) and title-hold policy types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Value of `hold_override` that suppresses holds on a copy
pub const HOLD_OVERRIDE_DISABLED: &str = "disabled";

/// Title hold policy mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Never offer title holds
    Disabled,
    /// Let the catalog validate the request for the logged-in patron
    Driver,
    /// Offer a title hold whenever the catalog supports holds
    Always,
    /// Offer a title hold only when no visible copy is available
    Availability,
}

impl Default for PolicyMode {
    fn default() -> Self {
        PolicyMode::Disabled
    }
}

impl std::str::FromStr for PolicyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" => Ok(PolicyMode::Disabled),
            "driver" => Ok(PolicyMode::Driver),
            "always" => Ok(PolicyMode::Always),
            "availability" => Ok(PolicyMode::Availability),
            other => Err(format!("Unknown title holds mode: {}", other)),
        }
    }
}

impl std::fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PolicyMode::Disabled => "disabled",
            PolicyMode::Driver => "driver",
            PolicyMode::Always => "always",
            PolicyMode::Availability => "availability",
        };
        write!(f, "{}", label)
    }
}

/// One copy of a bibliographic record as reported by the catalog.
///
/// Every field is optional: a partially populated catalog row must degrade
/// eligibility instead of failing the evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HoldingItem {
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hold_override: Option<String>,
}

impl HoldingItem {
    pub fn new(available: bool, location: impl Into<String>) -> Self {
        Self {
            available: Some(available),
            location: Some(location.into()),
            hold_override: None,
        }
    }

    pub fn with_hold_override(mut self, value: impl Into<String>) -> Self {
        self.hold_override = Some(value.into());
        self
    }

    /// Missing availability counts as unavailable
    pub fn is_available(&self) -> bool {
        self.available.unwrap_or(false)
    }

    pub fn is_hold_disabled(&self) -> bool {
        self.hold_override.as_deref() == Some(HOLD_OVERRIDE_DISABLED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_mode_parse() {
        assert_eq!("always".parse::<PolicyMode>(), Ok(PolicyMode::Always));
        assert_eq!(" Availability ".parse::<PolicyMode>(), Ok(PolicyMode::Availability));
        assert_eq!("driver".parse::<PolicyMode>(), Ok(PolicyMode::Driver));
        assert!("sometimes".parse::<PolicyMode>().is_err());
        assert_eq!(PolicyMode::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_policy_mode_serde() {
        let mode: PolicyMode = serde_json::from_str("\"availability\"").unwrap();
        assert_eq!(mode, PolicyMode::Availability);
        assert_eq!(serde_json::to_string(&PolicyMode::Always).unwrap(), "\"always\"");
    }

    #[test]
    fn test_partial_holding_fails_closed() {
        let holding: HoldingItem = serde_json::from_str("{}").unwrap();
        assert!(!holding.is_available());
        assert!(holding.location.is_none());
        assert!(!holding.is_hold_disabled());

        let holding: HoldingItem =
            serde_json::from_str(r#"{"available": true, "hold_override": "disabled"}"#).unwrap();
        assert!(holding.is_available());
        assert!(holding.is_hold_disabled());
    }
}
