//! Memoized dependency maps, keyed by the structural identity of the type model.
//!
//! The cache is owned by the caller; nothing in the analysis keeps global state.

use std::sync::Arc;

use dashmap::DashMap;
use mg_core::dependency::DependencyMap;
use mg_core::model::TypeModel;
use mg_core::Result;
use tracing::trace;

use crate::builder::build_dependency_map;

#[derive(Default)]
pub struct DependencyCache {
    inner: DashMap<TypeModel, Arc<DependencyMap>>,
}

impl DependencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The map for `ty`, building it on first request. Two structurally equal models share
    /// one entry. Build failures are not cached.
    pub fn get_or_build(&self, ty: &TypeModel) -> Result<Arc<DependencyMap>> {
        if let Some(entry) = self.inner.get(ty) {
            trace!(ty = %ty.name, "dependency cache hit");
            return Ok(entry.value().clone());
        }
        let map = Arc::new(build_dependency_map(ty)?);
        let entry = self.inner.entry(ty.clone()).or_insert(map);
        Ok(entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mg_core::model::{AnnotationInstance, MemberModel, TypeRef};

    fn person() -> TypeModel {
        TypeModel::new("Person")
            .with_member(
                MemberModel::field("_name", TypeRef::new("string"))
                    .with_annotation(AnnotationInstance::notify_backing()),
            )
            .with_member(
                MemberModel::property("Display", TypeRef::new("string")).with_references(["Name"]),
            )
    }

    #[test]
    fn structurally_equal_models_share_an_entry() {
        let cache = DependencyCache::new();
        let first = cache.get_or_build(&person()).unwrap();
        let second = cache.get_or_build(&person()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn changed_models_get_their_own_entry() {
        let cache = DependencyCache::new();
        cache.get_or_build(&person()).unwrap();
        let renamed = TypeModel {
            name: "Employee".into(),
            ..person()
        };
        cache.get_or_build(&renamed).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
