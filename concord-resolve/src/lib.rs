//! Conflict resolution strategies for the Concord consistency engine.
//!
//! This crate is pure algorithm — no locks, no clocks, no background work.
//! Given the conflicting operations for an entity, it produces a single
//! resolved value plus a confidence score.
//!
//! # Strategies
//!
//! - **Built-in** ([`builtin`]): last-write-wins, first-write-wins, and
//!   field-level shallow merge, all deterministic over (timestamp, version)
//!   order.
//! - **Domain** ([`domain`]): entity-type-specific resolvers for the
//!   preference, session-memory, and behavioral-pattern domains.
//! - **Custom** ([`ResolverRegistry`]): a plugin registry keyed by entity
//!   type, so new domains add resolution semantics without touching the
//!   engine's dispatch.
//!
//! # Example
//!
//! ```
//! use concord_resolve::ResolverRegistry;
//!
//! let registry = ResolverRegistry::with_defaults();
//! assert!(registry.get("preference").is_some());
//! assert!(registry.get("unknown-domain").is_none());
//! ```

pub mod builtin;
pub mod confidence;
pub mod domain;
mod error;
mod strategy;

pub use builtin::{chronological, first_write_wins, last_write_wins, shallow_merge};
pub use domain::{PatternResolver, PreferenceResolver, SessionMemoryResolver};
pub use error::{ResolveError, ResolveResult};
pub use strategy::{EntityResolver, Resolved, ResolverRegistry};
