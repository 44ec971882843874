use super::*;
use crate::config;
use crate::value::Config;
use pretty_assertions::assert_eq;

fn nested_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    let sub = Schema::builder("Sub")
        .field_with_default("x", FieldType::Int, 5)
        .field_with_default("y", FieldType::Int, 6)
        .build()
        .expect("sub schema");
    let model = Schema::builder("Model")
        .field("sub", FieldType::model("Sub"))
        .field_with_default("seed", FieldType::Int, 5)
        .build()
        .expect("model schema");
    registry.register(sub).expect("register sub");
    registry.register(model).expect("register model");
    registry
}

fn union_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    let sub1 = Schema::builder("Sub1")
        .field("x", FieldType::union([FieldType::Int, FieldType::Float]))
        .field_with_default("y", FieldType::Int, 5)
        .build()
        .expect("sub1");
    let sub2 = Schema::builder("Sub2")
        .field("x", FieldType::Int)
        .build()
        .expect("sub2");
    let holder = Schema::builder("Holder")
        .field(
            "sub",
            FieldType::union([FieldType::model("Sub1"), FieldType::model("Sub2")]),
        )
        .build()
        .expect("holder");
    for schema in [sub1, sub2, holder] {
        registry.register(schema).expect("register");
    }
    registry
}

#[test]
fn builder_defaults_are_strict() {
    let schema = Schema::builder("S")
        .field("a", FieldType::Int)
        .build()
        .expect("schema");
    assert!(schema.forbid_unknown());
    assert!(schema.validate_assignment());
    assert!(!schema.arbitrary_types());
    assert_eq!(schema.fields().len(), 1);
}

#[test]
fn builder_rejects_bad_fields() {
    let repeated = Schema::builder("S")
        .field("a", FieldType::Int)
        .field("a", FieldType::Str)
        .build();
    assert!(matches!(repeated, Err(SweepError::SchemaConfig { .. })));

    let bad_name = Schema::builder("S").field("a.b", FieldType::Int).build();
    assert!(matches!(bad_name, Err(SweepError::SchemaConfig { .. })));

    let opaque = Schema::builder("S")
        .field("a", FieldType::Opaque("Tensor".to_string()))
        .build();
    assert!(matches!(opaque, Err(SweepError::SchemaConfig { .. })));

    let allowed = Schema::builder("S")
        .field("a", FieldType::Opaque("Tensor".to_string()))
        .arbitrary_types(true)
        .build();
    assert!(allowed.is_ok());
}

#[test]
fn nested_unions_flatten() {
    let ty = FieldType::optional(FieldType::union([FieldType::Int, FieldType::Str]));
    assert_eq!(ty.to_string(), "int | str | None");
    assert_eq!(FieldType::list(FieldType::Int).type_name(), "list[int]");
}

#[test]
fn registry_rejects_duplicates_and_unknown_names() {
    let registry = nested_registry();
    let again = Schema::builder("Sub").build().expect("schema");
    assert!(matches!(
        registry.register(again),
        Err(SweepError::DuplicateSchema(name)) if name == "Sub"
    ));
    assert!(matches!(
        registry.get("Missing"),
        Err(SweepError::UnknownSchema(_))
    ));
    assert_eq!(registry.names(), vec!["Model", "Sub"]);
}

#[test]
fn construct_fills_defaults_and_nested_models() {
    let registry = nested_registry();
    let instance = registry
        .construct("Model", config! { "sub" => config! { "x" => 10 } })
        .expect("construct");
    assert_eq!(instance.to_string(), "Model(sub=Sub(x=10, y=6), seed=5)");
    assert_eq!(instance.get_path("sub.y").expect("y"), &Value::Int(6));
}

#[test]
fn construct_treats_default_placeholder_as_absent() {
    let registry = nested_registry();
    let instance = registry
        .construct(
            "Model",
            config! { "sub" => config! { "x" => Value::Default }, "seed" => 1 },
        )
        .expect("construct");
    assert_eq!(instance.to_string(), "Model(sub=Sub(x=5, y=6), seed=1)");
}

#[test]
fn construct_rejects_unknown_and_missing_fields() {
    let registry = nested_registry();
    let unknown = registry.construct(
        "Model",
        config! { "sub" => config! {}, "sed" => 1 },
    );
    match unknown {
        Err(SweepError::Validation { path, .. }) => assert_eq!(path, "sed"),
        other => panic!("unexpected result: {other:?}"),
    }

    let missing = registry.construct("Model", config! {});
    assert!(matches!(missing, Err(SweepError::Validation { path, .. }) if path == "sub"));

    let wrong_type = registry.construct("Model", config! { "sub" => config! { "x" => "a" } });
    assert!(matches!(wrong_type, Err(SweepError::Validation { path, .. }) if path == "sub.x"));
}

#[test]
fn lenient_schemas_drop_unknown_fields() {
    let registry = SchemaRegistry::new();
    let schema = Schema::builder("Loose")
        .field_with_default("a", FieldType::Int, 1)
        .forbid_unknown(false)
        .build()
        .expect("schema");
    registry.register(schema).expect("register");
    let instance = registry
        .construct("Loose", config! { "b" => 2 })
        .expect("construct");
    assert_eq!(instance.to_config(), config! { "a" => 1 });
}

#[test]
fn assignment_is_validated() {
    let registry = nested_registry();
    let mut instance = registry
        .construct("Model", config! { "sub" => config! {} })
        .expect("construct");

    instance.set("sub.x", 42).expect("set nested");
    assert_eq!(instance.get_path("sub.x").expect("x"), &Value::Int(42));

    assert!(matches!(
        instance.set("seed", "abc"),
        Err(SweepError::Validation { .. })
    ));
    assert!(matches!(
        instance.set("nope", 1),
        Err(SweepError::Validation { .. })
    ));
    assert!(matches!(
        instance.set("seed.x", 1),
        Err(SweepError::TypeMismatch { .. })
    ));
}

#[test]
fn clones_do_not_share_state() {
    let registry = nested_registry();
    let first = registry
        .construct("Model", config! { "sub" => config! {} })
        .expect("construct");
    let mut second = first.clone();
    second.set("sub.x", 7).expect("set");
    assert_eq!(first.get_path("sub.x").expect("x"), &Value::Int(5));
    assert!(first != second);
}

#[test]
fn ambiguous_union_mapping_is_rejected() {
    let registry = union_registry();
    let err = registry
        .construct("Holder", config! { "sub" => config! { "x" => 1 } })
        .unwrap_err();
    match err {
        SweepError::AmbiguousUnion { path, candidates } => {
            assert_eq!(path, "sub");
            assert_eq!(candidates, vec!["Sub1", "Sub2"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unambiguous_union_mapping_resolves() {
    let registry = union_registry();
    let holder = registry
        .construct("Holder", config! { "sub" => config! { "x" => 1, "y" => 2 } })
        .expect("sub1 only");
    assert_eq!(holder.to_string(), "Holder(sub=Sub1(x=1, y=2))");

    let holder = registry
        .construct("Holder", config! { "sub" => config! { "x" => 1.5 } })
        .expect("float only matches sub1");
    assert_eq!(holder.to_string(), "Holder(sub=Sub1(x=1.5, y=5))");
}

#[test]
fn explicit_instances_bypass_the_guard() {
    let registry = union_registry();
    let sub2 = registry
        .construct("Sub2", config! { "x" => 1 })
        .expect("sub2");
    let holder = registry
        .construct("Holder", config! { "sub" => sub2 })
        .expect("explicit");
    assert_eq!(holder.to_string(), "Holder(sub=Sub2(x=1))");
}

fn defaulted_union_registry(second: SchemaBuilder) -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    let first = Schema::builder("S1")
        .field_with_default("x", FieldType::Int, 1)
        .build()
        .expect("s1");
    let holder = Schema::builder("H")
        .field_with_default(
            "s",
            FieldType::union([FieldType::model("S1"), FieldType::model("S2")]),
            Config::new(),
        )
        .build()
        .expect("holder");
    for schema in [first, second.build().expect("s2"), holder] {
        registry.register(schema).expect("register");
    }
    registry
}

#[test]
fn ambiguous_union_default_is_rejected() {
    let registry =
        defaulted_union_registry(Schema::builder("S2").field_with_default("x", FieldType::Int, 1));
    for data in [config! {}, config! { "s" => Value::Default }, config! { "s" => config! {} }] {
        match registry.construct("H", data) {
            Err(SweepError::AmbiguousUnion { path, candidates }) => {
                assert_eq!(path, "s");
                assert_eq!(candidates, vec!["S1", "S2"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

#[test]
fn union_default_matching_one_member_resolves() {
    let registry = defaulted_union_registry(Schema::builder("S2").field("y", FieldType::Int));
    let holder = registry.construct("H", config! {}).expect("construct");
    assert_eq!(holder.to_string(), "H(s=S1(x=1))");
}
