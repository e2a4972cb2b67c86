//! Application identity, identifiers, and redacting secret wrappers.

pub mod id;
pub mod identity;
pub mod secret;

pub use id::*;
pub use identity::*;
pub use secret::*;
