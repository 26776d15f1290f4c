//! Domain Services
//!
//! Stateless functions over domain types.

pub mod identity;

pub use identity::{assign_identities, compose_identity, identity_of};
