//! Hold request and hold action types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name of the hold capability queried on the catalog
pub const HOLDS_FUNCTION: &str = "Holds";

/// Capability function meaning "the catalog builds the hold link itself"
pub const HOLD_LINK_FUNCTION: &str = "getHoldLink";

/// Query parameter carrying the request signature
pub const HASH_KEY_PARAM: &str = "hashKey";

pub const HOLD_ACTION: &str = "Hold";
pub const HOLD_ANCHOR: &str = "#tabnav";
pub const TITLE_LEVEL: &str = "title";

/// Fields describing a hold request, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoldRequestDescriptor(IndexMap<String, String>);

impl HoldRequestDescriptor {
    /// Title-level request for a record: `{id, level: "title"}`
    pub fn title(id: &str) -> Self {
        Self::default().with("id", id).with("level", TITLE_LEVEL)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Answer to "can holds be performed, and how"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Catalog function that handles the hold (`getHoldLink` or a placement function)
    pub function: String,
    /// Request fields covered by the signature, in signing order
    pub signed_keys: Vec<String>,
}

impl CapabilityDescriptor {
    pub fn builds_own_link(&self) -> bool {
        self.function == HOLD_LINK_FUNCTION
    }
}

/// Locally signed hold action handed to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActionToken {
    /// Always `Hold`
    pub action: String,
    /// Record the hold applies to
    pub record: String,
    /// Signed query string (`key=value&...&hashKey=<signature>`)
    pub query: String,
    /// Always `#tabnav`
    pub anchor: String,
}

impl ActionToken {
    pub fn new(record: impl Into<String>, query: String) -> Self {
        Self {
            action: HOLD_ACTION.to_string(),
            record: record.into(),
            query,
            anchor: HOLD_ANCHOR.to_string(),
        }
    }
}

/// Positive hold decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldLink {
    /// Action token signed by this server
    Token(ActionToken),
    /// Complete URL built by the catalog
    CatalogUrl(String),
}
