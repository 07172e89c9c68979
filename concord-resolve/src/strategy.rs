//! The custom-resolver seam: a trait per entity type plus a registry.
//!
//! Entity types with domain-specific merge semantics register an
//! [`EntityResolver`]. The engine dispatches `custom`-strategy rules through
//! the registry; unregistered entity types fall back to last-write-wins so
//! the resolve tick always makes forward progress.

use crate::error::ResolveResult;
use concord_types::{ConsistencyViolation, DataOperation};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The output of a resolution strategy.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The winning or merged value.
    pub value: Value,
    /// Confidence the resolver itself has in the outcome, if it has an
    /// opinion. Blended with the violation-kind base confidence.
    pub confidence: Option<f64>,
    /// Strategy-specific detail carried into the resolution record.
    pub metadata: Value,
}

/// Domain-specific conflict resolution for one entity type.
///
/// Implementations receive the violation being settled and the entity's
/// write operations ordered oldest-first. They must be deterministic:
/// resolving the same operations twice yields the same value.
pub trait EntityResolver: Send + Sync {
    /// Produces a resolved value from conflicting operations.
    fn resolve(
        &self,
        violation: &ConsistencyViolation,
        ops: &[DataOperation],
    ) -> ResolveResult<Resolved>;
}

/// Registry mapping entity types to their custom resolvers.
///
/// New entity types plug in without touching the engine's dispatch logic.
#[derive(Default, Clone)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, Arc<dyn EntityResolver>>,
}

impl ResolverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in domain resolvers
    /// (preference, session memory, behavioral pattern).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("preference", Arc::new(crate::domain::PreferenceResolver));
        registry.register(
            "session_memory",
            Arc::new(crate::domain::SessionMemoryResolver),
        );
        registry.register("pattern", Arc::new(crate::domain::PatternResolver));
        registry
    }

    /// Registers a resolver for an entity type, replacing any existing one.
    pub fn register(&mut self, entity_type: impl Into<String>, resolver: Arc<dyn EntityResolver>) {
        self.resolvers.insert(entity_type.into(), resolver);
    }

    /// Looks up the resolver for an entity type.
    #[must_use]
    pub fn get(&self, entity_type: &str) -> Option<&Arc<dyn EntityResolver>> {
        self.resolvers.get(entity_type)
    }

    /// Returns the registered entity types.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("entity_types", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}
