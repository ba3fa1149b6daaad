//! Enumeration of every known package name

use indexmap::IndexMap;

use crate::version::compare::natural_cmp;
use crate::version::registry::ResolverRegistry;

/// All statically known package names, including expanded release families
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    by_category: IndexMap<String, Vec<String>>,
}

impl PackageCatalog {
    pub fn from_registry(registry: &ResolverRegistry) -> Self {
        let by_category = registry
            .categories()
            .iter()
            .map(|category| {
                let mut names: Vec<String> = category
                    .entries()
                    .iter()
                    .flat_map(|entry| entry.matcher.expand())
                    .collect();
                names.sort_by(|a, b| natural_cmp(a, b));
                names.dedup();
                (category.name().to_string(), names)
            })
            .collect();

        Self { by_category }
    }

    /// Names grouped per category, categories in priority order
    pub fn by_category(&self) -> &IndexMap<String, Vec<String>> {
        &self.by_category
    }

    /// Every known name in natural order, without duplicates
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_category.values().flatten().cloned().collect();
        names.sort_by(|a, b| natural_cmp(a, b).then_with(|| a.cmp(b)));
        names.dedup();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_category
            .values()
            .any(|names| names.iter().any(|n| n == name))
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(|names| names.is_empty())
    }
}
