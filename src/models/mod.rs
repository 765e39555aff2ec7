//! Data models for title holds

pub mod hold;
pub mod holding;
pub mod patron;

// Re-export commonly used types
pub use hold::{ActionToken, CapabilityDescriptor, HoldLink, HoldRequestDescriptor};
pub use holding::{HoldingItem, PolicyMode};
pub use patron::{PatronClaims, PatronSession};
