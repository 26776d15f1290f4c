//! Domain Layer
//!
//! Workspace-independent rules: path containment, descriptors and their
//! identities, and the ports the application layer talks through.
//!
//! ## Structure
//!
//! - `entities/` - Workspace roots, package and target descriptors
//! - `value_objects/` - Paths, change kinds, config sources and snapshots
//! - `services/` - Identity assignment
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
