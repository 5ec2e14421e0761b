use std::sync::Arc;

use mg_analysis::build_dependency_map;
use mg_core::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticReport};
use mg_core::fragments::GeneratedUnit;
use mg_core::model::{
    AnnotationInstance, AnnotationValue, MemberModel, TypeModel, TypeRef,
    COLLECTION_CHANGED_HANDLER, GETTER_ACCESS, IS_VIRTUAL, PROPERTY_CHANGED_HANDLER,
    SETTER_ACCESS,
};
use mg_core::oracle::KnownTypes;
use pretty_assertions::assert_eq;

fn string() -> TypeRef {
    TypeRef::new("string")
}

fn notify_field(name: &str, ty: TypeRef) -> MemberModel {
    MemberModel::field(name, ty).with_annotation(AnnotationInstance::notify_backing())
}

fn notify_field_with(name: &str, ty: TypeRef, annotation: AnnotationInstance) -> MemberModel {
    MemberModel::field(name, ty).with_annotation(annotation)
}

fn generate_with(ty: &TypeModel, known: KnownTypes) -> DiagnosticReport<GeneratedUnit> {
    let map = build_dependency_map(ty).unwrap();
    mg_csharp::generator(Arc::new(known)).generate(ty, &map)
}

fn generate(ty: &TypeModel) -> DiagnosticReport<GeneratedUnit> {
    generate_with(ty, KnownTypes::standard())
}

fn property<'a>(unit: &'a GeneratedUnit, name: &str) -> Option<&'a String> {
    let needle = format!(" {}\n", name);
    unit.properties
        .iter()
        .chain(unit.static_properties.iter())
        .find(|p| p.contains(&needle))
}

fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind).collect()
}

fn person() -> TypeModel {
    TypeModel::new("Person")
        .in_namespace("People")
        .with_member(notify_field("_firstName", string()))
        .with_member(notify_field("_lastName", string()))
        .with_member(
            MemberModel::property("FullName", string())
                .with_references(["_firstName", "_lastName"]),
        )
}

#[test]
fn first_name_setter_raises_itself_then_full_name() {
    let report = generate(&person());
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let unit = report.value.unwrap();

    let expected = "\
public string FirstName
{
    get => _firstName;
    set
    {
        _firstName = value;
        OnPropertyChanged();
        OnPropertyChanged(nameof(FullName));
    }
}";
    assert_eq!(property(&unit, "FirstName").unwrap(), expected);
    assert!(property(&unit, "LastName")
        .unwrap()
        .contains("OnPropertyChanged(nameof(FullName));"));

    assert_eq!(unit.interfaces, vec!["INotifyPropertyChanged"]);
    assert_eq!(unit.implementations.len(), 1);
    assert_eq!(
        unit.usings,
        vec![
            "using System.ComponentModel;",
            "using System.Runtime.CompilerServices;"
        ]
    );
}

#[test]
fn accessor_visibility_and_virtual_modifier() {
    let annotation = AnnotationInstance::notify_backing()
        .with_named(GETTER_ACCESS, AnnotationValue::enum_tag("Access", "Public"))
        .with_named(SETTER_ACCESS, AnnotationValue::enum_tag("Access", "Private"))
        .with_named(IS_VIRTUAL, AnnotationValue::Bool(true));
    let ty = TypeModel::new("Settings")
        .with_member(notify_field_with("_theme", string(), annotation));
    let unit = generate(&ty).value.unwrap();
    let text = property(&unit, "Theme").unwrap();
    assert!(text.starts_with("public virtual string Theme\n"));
    assert!(text.contains("\n    get => _theme;\n"));
    assert!(text.contains("\n    private set\n"));
}

#[test]
fn less_visible_getter_moves_the_property_level() {
    let annotation = AnnotationInstance::notify_backing()
        .with_named(GETTER_ACCESS, AnnotationValue::enum_tag("Access", "Private"))
        .with_named(SETTER_ACCESS, AnnotationValue::enum_tag("Access", "Internal"));
    let ty = TypeModel::new("Settings")
        .with_member(notify_field_with("_theme", string(), annotation));
    let unit = generate(&ty).value.unwrap();
    let text = property(&unit, "Theme").unwrap();
    assert!(text.starts_with("internal string Theme\n"));
    assert!(text.contains("\n    private get => _theme;\n"));
    assert!(text.contains("\n    set\n"));
}

#[test]
fn protected_and_internal_accessors_are_rejected() {
    let annotation = AnnotationInstance::notify_backing()
        .with_named(GETTER_ACCESS, AnnotationValue::enum_tag("Access", "Protected"))
        .with_named(SETTER_ACCESS, AnnotationValue::enum_tag("Access", "Internal"));
    let ty = TypeModel::new("Settings")
        .with_member(notify_field_with("_theme", string(), annotation))
        .with_member(notify_field("_language", string()));
    let report = generate(&ty);
    assert_eq!(
        kinds(&report.diagnostics),
        vec![DiagnosticKind::InvalidAccessorModifiers]
    );
    assert_eq!(
        report.diagnostics[0].message(),
        "Accessor options of field '_theme' are invalid: \
         protected getter and internal setter cannot share one property."
    );
    let unit = report.value.unwrap();
    assert!(property(&unit, "Theme").is_none());
    assert!(property(&unit, "Language").is_some());
}

#[test]
fn private_property_cannot_be_virtual() {
    let annotation = AnnotationInstance::notify_backing()
        .with_named(GETTER_ACCESS, AnnotationValue::enum_tag("Access", "Private"))
        .with_named(SETTER_ACCESS, AnnotationValue::enum_tag("Access", "Private"))
        .with_named(IS_VIRTUAL, AnnotationValue::Bool(true));
    let ty = TypeModel::new("Settings")
        .with_member(notify_field_with("_theme", string(), annotation))
        .with_member(notify_field("_language", string()));
    let report = generate(&ty);
    assert_eq!(
        kinds(&report.diagnostics),
        vec![DiagnosticKind::InvalidAccessorModifiers]
    );
    assert!(report.diagnostics[0]
        .message()
        .ends_with("A private property cannot be virtual."));
    assert!(property(&report.value.unwrap(), "Theme").is_none());
}

#[test]
fn private_accessors_without_virtual_are_accepted() {
    let annotation = AnnotationInstance::notify_backing()
        .with_named(GETTER_ACCESS, AnnotationValue::enum_tag("Access", "Private"))
        .with_named(SETTER_ACCESS, AnnotationValue::enum_tag("Access", "Private"));
    let ty = TypeModel::new("Settings")
        .with_member(notify_field_with("_theme", string(), annotation));
    let report = generate(&ty);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let unit = report.value.unwrap();
    let text = property(&unit, "Theme").unwrap();
    assert!(text.starts_with("private string Theme\n"));
    assert!(text.contains("\n    get => _theme;\n"));
}

#[test]
fn static_and_abstract_field_types_are_rejected() {
    let ty = TypeModel::new("Tools")
        .with_member(notify_field("_math", TypeRef::new("Math").in_namespace("System")))
        .with_member(notify_field("_stream", TypeRef::new("Stream").in_namespace("System.IO")))
        .with_member(notify_field("_name", string()));
    let report = generate(&ty);
    assert_eq!(
        kinds(&report.diagnostics),
        vec![DiagnosticKind::StaticField, DiagnosticKind::InvalidPropertyType]
    );
    assert_eq!(
        report.diagnostics[0].message(),
        "Field '_math' is of static type 'Math'"
    );
    let unit = report.value.unwrap();
    assert!(property(&unit, "Name").is_some());
    assert!(property(&unit, "Math").is_none());
    assert!(property(&unit, "Stream").is_none());
}

#[test]
fn existing_member_blocks_the_property() {
    let ty = TypeModel::new("Person")
        .with_member(notify_field("_name", string()))
        .with_member(MemberModel::property("Name", string()))
        .with_member(notify_field("_age", TypeRef::new("int")));
    let report = generate(&ty);
    assert_eq!(kinds(&report.diagnostics), vec![DiagnosticKind::PropertyNamingConflict]);
    assert_eq!(report.diagnostics[0].member, "_name");
    let unit = report.value.unwrap();
    assert_eq!(unit.properties.len(), 1);
    assert!(property(&unit, "Age").is_some());
}

#[test]
fn fields_mapping_to_the_same_name_conflict() {
    let ty = TypeModel::new("Person")
        .with_member(notify_field("_name", string()))
        .with_member(notify_field("name", string()));
    let report = generate(&ty);
    assert_eq!(kinds(&report.diagnostics), vec![DiagnosticKind::PropertyNamingConflict]);
    assert_eq!(report.diagnostics[0].member, "name");
}

#[test]
fn previously_generated_property_is_not_a_conflict() {
    let ty = TypeModel::new("Person")
        .with_member(notify_field("_name", string()))
        .with_member(
            MemberModel::property("Name", string())
                .with_references(["_name"])
                .into_generated(),
        );
    let report = generate(&ty);
    assert!(report.diagnostics.is_empty());
    assert!(property(&report.value.unwrap(), "Name").is_some());
}

fn is_open_type(handler: MemberModel) -> TypeModel {
    TypeModel::new("Door")
        .with_member(notify_field_with(
            "_isOpen",
            TypeRef::bool(),
            AnnotationInstance::notify_backing()
                .with_named(PROPERTY_CHANGED_HANDLER, AnnotationValue::string("OnIsOpenChanged")),
        ))
        .with_member(handler)
}

#[test]
fn property_changed_handler_is_cached_and_invoked() {
    let handler = MemberModel::method("OnIsOpenChanged", TypeRef::void())
        .with_accessibility(mg_core::model::Accessibility::Private)
        .with_parameter("sender", TypeRef::object().nullable())
        .with_parameter("e", TypeRef::new("EventArgs").in_namespace("System"));
    let report = generate(&is_open_type(handler));
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let unit = report.value.unwrap();
    assert_eq!(unit.fields, vec!["private EventHandler? _isOpenChangedHandler;"]);
    let text = property(&unit, "IsOpen").unwrap();
    let assign = text.find("_isOpen = value;").unwrap();
    let bind = text.find("_isOpenChangedHandler ??= OnIsOpenChanged;").unwrap();
    let invoke = text
        .find("_isOpenChangedHandler.Invoke(this, EventArgs.Empty);")
        .unwrap();
    let raise = text.find("OnPropertyChanged();").unwrap();
    assert!(assign < bind && bind < invoke && invoke < raise);
    assert!(unit.usings.contains(&"using System;".to_string()));
}

#[test]
fn property_changed_handler_shape_is_validated() {
    let wrong_args = MemberModel::method("OnIsOpenChanged", TypeRef::void())
        .with_parameter("sender", TypeRef::object())
        .with_parameter("e", TypeRef::new("int"));
    let report = generate(&is_open_type(wrong_args));
    assert_eq!(
        kinds(&report.diagnostics),
        vec![DiagnosticKind::InvalidPropertyChangedHandler]
    );
    assert_eq!(
        report.diagnostics[0].message(),
        "PropertyChangedHandler 'OnIsOpenChanged' for field '_isOpen' is invalid: Parameter 'e' must be EventArgs or derived from it, found int."
    );
    assert!(report.value.is_none());

    let returns_value = MemberModel::method("OnIsOpenChanged", TypeRef::bool())
        .with_parameter("sender", TypeRef::object())
        .with_parameter("e", TypeRef::new("EventArgs").in_namespace("System"));
    let report = generate(&is_open_type(returns_value));
    assert!(report.diagnostics[0]
        .message()
        .ends_with("Return type must be void, found bool."));

    let missing = TypeModel::new("Door").with_member(notify_field_with(
        "_isOpen",
        TypeRef::bool(),
        AnnotationInstance::notify_backing()
            .with_named(PROPERTY_CHANGED_HANDLER, AnnotationValue::string("Nope")),
    ));
    let report = generate(&missing);
    assert!(report.diagnostics[0]
        .message()
        .ends_with("Method not found on type 'Door'."));
}

fn observable(item: TypeRef) -> TypeRef {
    TypeRef::new("ObservableCollection")
        .in_namespace("System.Collections.ObjectModel")
        .with_args(vec![item])
}

fn items_type(field_ty: TypeRef, args_ty: TypeRef) -> TypeModel {
    TypeModel::new("Basket")
        .with_member(notify_field_with(
            "_items",
            field_ty,
            AnnotationInstance::notify_backing()
                .with_named(COLLECTION_CHANGED_HANDLER, AnnotationValue::string("OnItemsChanged")),
        ))
        .with_member(
            MemberModel::method("OnItemsChanged", TypeRef::void())
                .with_parameter("sender", TypeRef::object())
                .with_parameter("e", args_ty),
        )
}

fn collection_args() -> TypeRef {
    TypeRef::new("NotifyCollectionChangedEventArgs").in_namespace("System.Collections.Specialized")
}

#[test]
fn collection_handler_brackets_the_assignment() {
    let report = generate(&items_type(observable(string()), collection_args()));
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    let unit = report.value.unwrap();
    assert_eq!(
        unit.fields,
        vec!["private NotifyCollectionChangedEventHandler? _itemsCollectionChangedHandler;"]
    );
    let text = property(&unit, "Items").unwrap();
    let unsubscribe = text
        .find("((INotifyCollectionChanged)_items).CollectionChanged -= _itemsCollectionChangedHandler;")
        .unwrap();
    let assign = text.find("_items = value;").unwrap();
    let bind = text.find("_itemsCollectionChangedHandler ??= OnItemsChanged;").unwrap();
    let subscribe = text
        .find("((INotifyCollectionChanged)_items).CollectionChanged += _itemsCollectionChangedHandler;")
        .unwrap();
    assert!(unsubscribe < assign && assign < bind && bind < subscribe);
    assert!(text.starts_with("public ObservableCollection<string> Items\n"));
    assert!(unit
        .usings
        .contains(&"using System.Collections.Specialized;".to_string()));
    assert!(unit
        .usings
        .contains(&"using System.Collections.ObjectModel;".to_string()));
}

#[test]
fn collection_handler_requires_collection_event_args() {
    let report = generate(&items_type(
        observable(string()),
        TypeRef::new("EventArgs").in_namespace("System"),
    ));
    assert_eq!(
        kinds(&report.diagnostics),
        vec![DiagnosticKind::InvalidCollectionChangedHandler]
    );
}

#[test]
fn collection_handler_is_ignored_for_plain_collections() {
    let list = TypeRef::new("List")
        .in_namespace("System.Collections.Generic")
        .with_args(vec![string()]);
    let report = generate(&items_type(list, TypeRef::new("int")));
    assert!(report.diagnostics.is_empty());
    let unit = report.value.unwrap();
    assert!(unit.fields.is_empty());
    assert!(!property(&unit, "Items").unwrap().contains("CollectionChanged"));
}

#[test]
fn property_capable_attributes_are_redeclared() {
    let ty = TypeModel::new("Person").with_member(
        notify_field("_secret", string())
            .with_annotation(AnnotationInstance::foreign(
                TypeRef::new("JsonIgnoreAttribute").in_namespace("System.Text.Json.Serialization"),
            ))
            .with_annotation(AnnotationInstance::foreign(
                TypeRef::new("NonSerializedAttribute").in_namespace("System"),
            )),
    );
    let unit = generate(&ty).value.unwrap();
    let text = property(&unit, "Secret").unwrap();
    assert!(text.starts_with("[JsonIgnore]\npublic string Secret\n"));
    assert!(unit
        .usings
        .contains(&"using System.Text.Json.Serialization;".to_string()));
    assert!(!unit.usings.contains(&"using System;".to_string()));
}

#[test]
fn static_fields_generate_static_properties() {
    let ty = TypeModel::new("Registry")
        .with_member(notify_field("s_instance", string()).into_static());
    let unit = generate(&ty).value.unwrap();
    assert!(unit.properties.is_empty());
    assert!(unit.interfaces.is_empty());
    let text = &unit.static_properties[0];
    assert!(text.starts_with("public static string Instance\n"));
    assert!(text.contains("OnStaticPropertyChanged();"));
    assert_eq!(unit.implementations.len(), 1);
    assert!(unit.implementations[0].contains("StaticPropertyChanged?.Invoke(null"));
}

#[test]
fn static_field_handler_must_be_static() {
    let ty = TypeModel::new("Registry")
        .with_member(
            notify_field_with(
                "s_count",
                TypeRef::new("int"),
                AnnotationInstance::notify_backing()
                    .with_named(
                        PROPERTY_CHANGED_HANDLER,
                        AnnotationValue::string("OnCountChanged"),
                    ),
            )
            .into_static(),
        )
        .with_member(
            MemberModel::method("OnCountChanged", TypeRef::void())
                .with_parameter("sender", TypeRef::object())
                .with_parameter("e", TypeRef::new("EventArgs").in_namespace("System")),
        );
    let report = generate(&ty);
    assert_eq!(
        kinds(&report.diagnostics),
        vec![DiagnosticKind::InvalidPropertyChangedHandler]
    );
}

#[test]
fn inherited_notification_is_not_redeclared() {
    let mut known = KnownTypes::standard();
    known.notifying_types.insert("App.ObservableObject".into());
    let ty = person().with_base("App.ObservableObject");
    let unit = generate_with(&ty, known).value.unwrap();
    assert!(unit.interfaces.is_empty());
    assert!(unit.implementations.is_empty());
    assert!(property(&unit, "FirstName")
        .unwrap()
        .contains("OnPropertyChanged();"));
}

#[test]
fn malformed_notify_arguments_abandon_the_type() {
    let ty = person().with_member(notify_field_with(
        "_age",
        TypeRef::new("int"),
        AnnotationInstance::notify_backing()
            .with_named(GETTER_ACCESS, AnnotationValue::string("public")),
    ));
    let report = generate(&ty);
    assert!(report.value.is_none());
    assert_eq!(kinds(&report.diagnostics), vec![DiagnosticKind::GeneratorError]);
    assert_eq!(
        report.diagnostics[0].message(),
        "Error generating partial class for Person: malformed NotifyBacking annotation on '_age': GetterAccess expects an Access tag, found string"
    );
}
