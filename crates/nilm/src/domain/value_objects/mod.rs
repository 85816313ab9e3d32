//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod appliance_kind;
mod status_class;
mod user_scope;

pub use appliance_kind::*;
pub use status_class::*;
pub use user_scope::*;
