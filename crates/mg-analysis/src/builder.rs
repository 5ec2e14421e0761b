use mg_core::dependency::{DependencyMap, MissingDependency};
use mg_core::model::{decode_depends_on, AnnotationKind, MemberModel, TypeModel};
use mg_core::naming::canonical_notify_name;
use mg_core::Result;
use tracing::{debug, trace};

/// Node name a member occupies in the dependency graph: backing fields are known by their
/// canonical notify-name, everything else by its own name.
pub fn node_name(member: &MemberModel) -> String {
    if member.is_backing_field() {
        canonical_notify_name(&member.name)
    } else {
        member.name.clone()
    }
}

/// Resolve a name written in a DependsOn annotation to its graph node.
///
/// Accepts a backing field's raw name, its canonical notify-name, or the name of a property
/// of the type. Methods, nested types and plain fields are not dependencies; `None` is
/// returned for them as for unknown names.
pub fn resolve_dependency(ty: &TypeModel, name: &str) -> Option<String> {
    if let Some(field) = ty.backing_fields().find(|f| f.name == name) {
        return Some(canonical_notify_name(&field.name));
    }
    if ty
        .backing_fields()
        .any(|f| canonical_notify_name(&f.name) == name)
    {
        return Some(name.to_string());
    }
    ty.properties()
        .find(|p| p.name == name)
        .map(|p| p.name.clone())
}

fn explicit_edges(ty: &TypeModel) -> Result<DependencyMap> {
    let mut map = DependencyMap::new();
    for member in &ty.members {
        let consumer = node_name(member);
        for annotation in member.annotations_of(AnnotationKind::DependsOn) {
            for name in decode_depends_on(&member.name, annotation)? {
                match resolve_dependency(ty, &name) {
                    Some(producer) => {
                        trace!(%producer, %consumer, "explicit edge");
                        map.add_edge(producer, consumer.clone());
                    }
                    None => {
                        debug!(member = %member.name, dependency = %name, "dependency not found");
                        map.record_missing(MissingDependency {
                            member: member.name.clone(),
                            name,
                        });
                    }
                }
            }
        }
    }
    Ok(map)
}

fn inferred_edges(ty: &TypeModel) -> DependencyMap {
    let mut map = DependencyMap::new();
    let fields: Vec<(&str, String)> = ty
        .backing_fields()
        .map(|f| (f.name.as_str(), canonical_notify_name(&f.name)))
        .collect();

    for property in ty
        .properties()
        .filter(|p| !p.is_implicit && !p.is_generated)
    {
        for (raw, canonical) in &fields {
            if property.name == *canonical {
                continue;
            }
            let referenced = property
                .references
                .iter()
                .any(|r| r == raw || r == canonical);
            if referenced {
                trace!(producer = %canonical, consumer = %property.name, "inferred edge");
                map.add_edge(canonical.clone(), property.name.clone());
            }
        }
    }
    map
}

/// Build the dependency map of `ty`: DependsOn declarations merged with the references
/// found in hand-written property bodies. DependsOn names that resolve to nothing are
/// recorded as missing rather than dropped.
pub fn build_dependency_map(ty: &TypeModel) -> Result<DependencyMap> {
    let mut map = explicit_edges(ty)?;
    map.merge(&inferred_edges(ty));
    debug!(
        ty = %ty.name,
        edges = map.edge_count(),
        missing = map.missing().len(),
        "built dependency map"
    );
    Ok(map)
}
