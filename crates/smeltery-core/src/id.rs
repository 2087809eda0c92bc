use serde::{Deserialize, Serialize};

/// Identifies a component (metal, fluid) in the catalog. Cheap to copy and compare.
///
/// Id `0` is reserved for the `unknown` component, which every catalog contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    /// The sentinel produced when a mixture matches no recipe.
    pub const UNKNOWN: ComponentId = ComponentId(0);

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

/// Identifies a mixture ratio recipe in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies a fuel definition in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FuelId(pub u32);

/// Unique identity of a built catalog. Resolution caches are keyed by it, so a
/// mixture resolved against one catalog is never answered from another's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogRevision(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_id_equality() {
        let a = ComponentId(3);
        let b = ComponentId(3);
        let c = ComponentId(4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unknown_is_zero() {
        assert_eq!(ComponentId::UNKNOWN, ComponentId(0));
        assert!(ComponentId(0).is_unknown());
        assert!(!ComponentId(1).is_unknown());
    }

    #[test]
    fn ids_are_ordered() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(ComponentId(2), "tin");
        map.insert(ComponentId(1), "copper");
        let names: Vec<_> = map.values().copied().collect();
        assert_eq!(names, vec!["copper", "tin"]);
    }
}
