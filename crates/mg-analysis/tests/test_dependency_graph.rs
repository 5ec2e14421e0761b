use mg_analysis::{build_dependency_map, cycle_closers, has_cycle, DependencyCache};
use mg_core::dependency::MissingDependency;
use mg_core::model::{AnnotationInstance, MemberModel, TypeModel, TypeRef};
use pretty_assertions::assert_eq;

fn notify_field(name: &str) -> MemberModel {
    MemberModel::field(name, TypeRef::new("string"))
        .with_annotation(AnnotationInstance::notify_backing())
}

fn person() -> TypeModel {
    TypeModel::new("Person")
        .in_namespace("People")
        .with_member(notify_field("_firstName"))
        .with_member(notify_field("_lastName"))
        .with_member(
            MemberModel::property("FullName", TypeRef::new("string"))
                .with_references(["_firstName", "_lastName"]),
        )
}

#[test]
fn full_name_is_inferred_from_both_fields() {
    let map = build_dependency_map(&person()).unwrap();
    let edges: Vec<(String, String)> = map.edge_set().into_iter().collect();
    assert_eq!(
        edges,
        vec![
            ("FirstName".to_string(), "FullName".to_string()),
            ("LastName".to_string(), "FullName".to_string()),
        ]
    );
    assert_eq!(has_cycle(&map), None);
}

#[test]
fn explicit_and_inferred_edges_are_unioned() {
    let ty = person().with_member(
        MemberModel::property("Initials", TypeRef::new("string"))
            .with_annotation(AnnotationInstance::depends_on(["FirstName", "_lastName"]))
            .with_references(["_firstName"]),
    );
    let map = build_dependency_map(&ty).unwrap();
    assert_eq!(
        map.consumers("FirstName").collect::<Vec<_>>(),
        vec!["Initials", "FullName"]
    );
    assert_eq!(
        map.consumers("LastName").collect::<Vec<_>>(),
        vec!["Initials", "FullName"]
    );
    assert_eq!(map.edge_count(), 4);
}

#[test]
fn unknown_dependency_is_recorded_as_missing() {
    let ty = person().with_member(
        MemberModel::property("Summary", TypeRef::new("string"))
            .with_annotation(AnnotationInstance::depends_on(["Bogus", "FullName"])),
    );
    let map = build_dependency_map(&ty).unwrap();
    assert_eq!(
        map.missing(),
        &[MissingDependency {
            member: "Summary".into(),
            name: "Bogus".into(),
        }]
    );
    assert_eq!(map.consumers("FullName").collect::<Vec<_>>(), vec!["Summary"]);
    assert!(!map.is_producer("Bogus"));
}

#[test]
fn mutual_depends_on_between_fields_is_a_cycle() {
    let ty = TypeModel::new("Loop")
        .with_member(
            notify_field("_a").with_annotation(AnnotationInstance::depends_on(["B"])),
        )
        .with_member(
            notify_field("_b").with_annotation(AnnotationInstance::depends_on(["_a"])),
        )
        .with_member(notify_field("_c"));
    let map = build_dependency_map(&ty).unwrap();
    assert_eq!(has_cycle(&map).as_deref(), Some("B"));
    assert_eq!(cycle_closers(&map), vec!["B".to_string()]);
}

#[test]
fn building_is_deterministic() {
    let ty = person().with_member(
        MemberModel::property("Label", TypeRef::new("string"))
            .with_annotation(AnnotationInstance::depends_on(["FullName", "LastName"])),
    );
    let first = build_dependency_map(&ty).unwrap();
    for _ in 0..8 {
        assert_eq!(build_dependency_map(&ty).unwrap(), first);
    }
}

#[test]
fn cache_returns_the_built_map() {
    let cache = DependencyCache::new();
    let ty = person();
    let cached = cache.get_or_build(&ty).unwrap();
    assert_eq!(*cached, build_dependency_map(&ty).unwrap());
    assert!(std::sync::Arc::ptr_eq(&cached, &cache.get_or_build(&ty).unwrap()));
    assert_eq!(cache.len(), 1);
}
