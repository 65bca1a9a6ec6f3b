//! Per-resource version counters
//!
//! Lock-free monotonic counters, one per resource kind. Bumped on every
//! mutation so collaborators can tell stale derived data from fresh
//! without diffing snapshots.

use dashmap::DashMap;

/// Resource keys tracked by the engine
pub const RES_CATALOG: &str = "catalog";
pub const RES_STOCK: &str = "stock";
pub const RES_ORDERS: &str = "orders";
pub const RES_CART: &str = "cart";

#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<&'static str, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a resource's version and return the new value
    pub fn increment(&self, resource: &'static str) -> u64 {
        let mut entry = self.versions.entry(resource).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version, 0 for a resource never mutated
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_start_at_zero_and_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get(RES_CATALOG), 0);
        assert_eq!(versions.increment(RES_CATALOG), 1);
        assert_eq!(versions.increment(RES_CATALOG), 2);
        assert_eq!(versions.get(RES_CATALOG), 2);
        // independent per resource
        assert_eq!(versions.get(RES_CART), 0);
    }
}
