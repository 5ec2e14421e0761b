use std::collections::BTreeSet;
use std::sync::Arc;

use mg_analysis::build_dependency_map;
use mg_core::diagnostics::DiagnosticKind;
use mg_core::fragments::GeneratedUnit;
use mg_core::model::{AnnotationInstance, MemberModel, TypeModel, TypeRef};
use mg_core::oracle::KnownTypes;
use mg_csharp::{render_unit, PrinterConfig};
use pretty_assertions::assert_eq;

fn string() -> TypeRef {
    TypeRef::new("string")
}

fn notify_field(name: &str) -> MemberModel {
    MemberModel::field(name, string()).with_annotation(AnnotationInstance::notify_backing())
}

fn generate(ty: &TypeModel) -> mg_core::diagnostics::DiagnosticReport<GeneratedUnit> {
    let map = build_dependency_map(ty).unwrap();
    mg_csharp::generator(Arc::new(KnownTypes::standard())).generate(ty, &map)
}

/// Recover `(producer, consumer)` pairs from emitted property setters.
fn emitted_edges(unit: &GeneratedUnit) -> BTreeSet<(String, String)> {
    let mut edges = BTreeSet::new();
    for property in &unit.properties {
        let Some(declaration) = property.lines().find(|line| !line.starts_with('[')) else {
            continue;
        };
        let Some(name) = declaration.split_whitespace().last() else {
            continue;
        };
        for line in property.lines() {
            let Some(start) = line.find("nameof(") else {
                continue;
            };
            let rest = &line[start + "nameof(".len()..];
            if let Some(end) = rest.find(')') {
                edges.insert((name.to_string(), rest[..end].to_string()));
            }
        }
    }
    edges
}

fn profile() -> TypeModel {
    TypeModel::new("Profile")
        .in_namespace("App.Models")
        .with_member(notify_field("_firstName"))
        .with_member(notify_field("_lastName"))
        .with_member(
            MemberModel::field("_age", TypeRef::new("int"))
                .with_annotation(AnnotationInstance::notify_backing()),
        )
        .with_member(
            MemberModel::property("FullName", string())
                .with_references(["_firstName", "_lastName"]),
        )
        .with_member(
            MemberModel::property("Summary", string()).with_references(["_age", "_firstName"]),
        )
        .with_member(
            MemberModel::property("Badge", string())
                .with_annotation(AnnotationInstance::depends_on(["LastName"])),
        )
}

#[test]
fn emitted_cascades_match_the_dependency_map() {
    let ty = profile();
    let map = build_dependency_map(&ty).unwrap();
    let report = generate(&ty);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(emitted_edges(&report.value.unwrap()), map.edge_set());
}

#[test]
fn generation_is_deterministic() {
    let ty = profile();
    let config = PrinterConfig::default();
    let first = render_unit(&generate(&ty).value.unwrap(), &config);
    for _ in 0..5 {
        assert_eq!(render_unit(&generate(&ty).value.unwrap(), &config), first);
    }
}

#[test]
fn unknown_dependency_only_skips_its_declarer() {
    let ty = TypeModel::new("Person")
        .with_member(notify_field("_firstName"))
        .with_member(
            notify_field("_nickname").with_annotation(AnnotationInstance::depends_on(["Bogus"])),
        )
        .with_member(
            MemberModel::property("Summary", string())
                .with_annotation(AnnotationInstance::depends_on(["Bogus"])),
        );
    let report = generate(&ty);
    let found: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.member.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (DiagnosticKind::DependencyNotFound, "Summary"),
            (DiagnosticKind::DependencyNotFound, "_nickname"),
        ]
    );
    assert_eq!(
        report.diagnostics[0].message(),
        "Member 'Summary' depends on 'Bogus', which does not exist"
    );
    let unit = report.value.unwrap();
    assert_eq!(unit.properties.len(), 1);
    assert!(unit.properties[0].starts_with("public string FirstName\n"));
}

#[test]
fn only_the_cycle_closer_loses_its_property() {
    let ty = TypeModel::new("Loop")
        .with_member(notify_field("_a").with_annotation(AnnotationInstance::depends_on(["B"])))
        .with_member(notify_field("_b").with_annotation(AnnotationInstance::depends_on(["_a"])))
        .with_member(notify_field("_c"));
    let report = generate(&ty);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::CircularDependency);
    assert_eq!(report.diagnostics[0].member, "_b");
    assert_eq!(
        report.diagnostics[0].message(),
        "Property 'B' has a circular dependency"
    );

    let unit = report.value.unwrap();
    let declarations: Vec<_> = unit
        .properties
        .iter()
        .filter_map(|p| p.lines().next())
        .collect();
    assert_eq!(declarations, vec!["public string A", "public string C"]);
    assert!(!unit.properties[0].contains("nameof(B)"));
}

fn circular(report: &mg_core::diagnostics::DiagnosticReport<GeneratedUnit>) -> Vec<&str> {
    report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::CircularDependency)
        .map(|d| d.member.as_str())
        .collect()
}

#[test]
fn cycle_closed_by_a_hand_written_property_breaks_at_the_field() {
    // Full reads _a while _a declares it depends on Full.
    let ty = TypeModel::new("Loop")
        .with_member(notify_field("_a").with_annotation(AnnotationInstance::depends_on(["Full"])))
        .with_member(MemberModel::property("Full", string()).with_references(["_a"]))
        .with_member(notify_field("_c"));
    let report = generate(&ty);
    assert_eq!(report.diagnostics.len(), 2, "{:?}", report.diagnostics);
    assert_eq!(circular(&report), vec!["Full", "_a"]);
    assert_eq!(
        report.diagnostics[0].message(),
        "Property 'Full' has a circular dependency"
    );
    assert_eq!(
        report.diagnostics[1].message(),
        "Property 'A' has a circular dependency"
    );

    let unit = report.value.unwrap();
    let declarations: Vec<_> = unit
        .properties
        .iter()
        .filter_map(|p| p.lines().next())
        .collect();
    assert_eq!(declarations, vec!["public string C"]);
    assert!(unit.properties.iter().all(|p| !p.contains("nameof(Full)")));
}

#[test]
fn cycle_through_an_inferred_edge_suppresses_every_field_on_it() {
    // Total -> A -> B are declared; B -> Total is inferred from Total's body.
    let ty = TypeModel::new("Loop")
        .with_member(notify_field("_a").with_annotation(AnnotationInstance::depends_on(["Total"])))
        .with_member(notify_field("_b").with_annotation(AnnotationInstance::depends_on(["_a"])))
        .with_member(MemberModel::property("Total", string()).with_references(["_b"]))
        .with_member(notify_field("_c"));
    let report = generate(&ty);
    assert_eq!(circular(&report), vec!["Total", "_a", "_b"]);

    let unit = report.value.unwrap();
    assert_eq!(unit.properties.len(), 1);
    assert!(unit.properties[0].starts_with("public string C\n"));
    let emitted = emitted_edges(&unit);
    assert!(emitted.is_empty(), "{:?}", emitted);
}

#[test]
fn depends_on_a_method_is_not_found() {
    let ty = TypeModel::new("Person")
        .with_member(notify_field("_firstName"))
        .with_member(MemberModel::method("Refresh", TypeRef::void()))
        .with_member(
            MemberModel::property("Full", string())
                .with_annotation(AnnotationInstance::depends_on(["Refresh"])),
        );
    let report = generate(&ty);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::DependencyNotFound);
    assert_eq!(
        report.diagnostics[0].message(),
        "Member 'Full' depends on 'Refresh', which does not exist"
    );
}

#[test]
fn rendered_person_file() {
    let ty = TypeModel::new("Person")
        .in_namespace("People")
        .with_member(notify_field("_name"))
        .with_member(MemberModel::property("Greeting", string()).with_references(["_name"]));
    let text = render_unit(&generate(&ty).value.unwrap(), &PrinterConfig::default());
    let expected = "\
// <auto-generated/>
#nullable enable

using System.ComponentModel;
using System.Runtime.CompilerServices;

namespace People
{
    partial class Person : INotifyPropertyChanged
    {
        public event PropertyChangedEventHandler? PropertyChanged;

        protected virtual void OnPropertyChanged([CallerMemberName] string? propertyName = null)
        {
            PropertyChanged?.Invoke(this, new PropertyChangedEventArgs(propertyName));
        }

        public string Name
        {
            get => _name;
            set
            {
                _name = value;
                OnPropertyChanged();
                OnPropertyChanged(nameof(Greeting));
            }
        }
    }
}
";
    assert_eq!(text, expected);
}

#[test]
fn type_without_annotations_generates_nothing() {
    let ty = TypeModel::new("Plain")
        .with_member(MemberModel::field("_value", string()))
        .with_member(MemberModel::method("Run", TypeRef::void()));
    let report = generate(&ty);
    assert!(report.value.is_none());
    assert!(report.diagnostics.is_empty());
}

#[test]
fn properties_and_commands_share_one_unit() {
    let ty = TypeModel::new("Editor")
        .with_member(notify_field("_title"))
        .with_member(
            MemberModel::method("Save", TypeRef::void())
                .with_annotation(AnnotationInstance::command_method(None)),
        );
    let unit = generate(&ty).value.unwrap();
    assert_eq!(unit.properties.len(), 2);
    assert_eq!(unit.nested_types.len(), 1);
    assert_eq!(unit.interfaces, vec!["INotifyPropertyChanged"]);
    assert_eq!(
        unit.usings,
        vec![
            "using System.ComponentModel;",
            "using System.Runtime.CompilerServices;",
            "using System.Windows.Input;",
            "using System;",
        ]
    );
}
