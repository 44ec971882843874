//! Fixture schema registries shared by integration tests.

use sweep_rs_core::{Config, FieldType, Schema, SchemaBuilder, SchemaRegistry, Value};

/// Registry holding the given schemas. Panics on invalid schemas.
pub fn registry_with(builders: impl IntoIterator<Item = SchemaBuilder>) -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    for builder in builders {
        let schema = builder.build().expect("schema");
        registry.register(schema).expect("register schema");
    }
    registry
}

/// `Sub { x: int = 5, y: int = 6 }` and `Model { sub: Sub, seed: int = 5 }`.
pub fn nested_registry() -> SchemaRegistry {
    registry_with([
        Schema::builder("Sub")
            .field_with_default("x", FieldType::Int, 5)
            .field_with_default("y", FieldType::Int, 6),
        Schema::builder("Model")
            .field("sub", FieldType::model("Sub"))
            .field_with_default("seed", FieldType::Int, 5),
    ])
}

/// `Sub1 { x: int | float, y: int = 5 }`, `Sub2 { x: int }` and
/// `Holder { sub: Sub1 | Sub2 }`.
pub fn union_registry() -> SchemaRegistry {
    registry_with([
        Schema::builder("Sub1")
            .field("x", FieldType::union([FieldType::Int, FieldType::Float]))
            .field_with_default("y", FieldType::Int, 5),
        Schema::builder("Sub2").field("x", FieldType::Int),
        Schema::builder("Holder").field(
            "sub",
            FieldType::union([FieldType::model("Sub1"), FieldType::model("Sub2")]),
        ),
    ])
}

/// `Cat` and `Dog` tagged by a `kind` literal, held by `Owner { pet }`.
pub fn discriminated_registry() -> SchemaRegistry {
    registry_with([
        Schema::builder("Cat")
            .field_with_default("kind", FieldType::literal("cat"), "cat")
            .field_with_default("lives", FieldType::Int, 9),
        Schema::builder("Dog")
            .field_with_default("kind", FieldType::literal("dog"), "dog")
            .field_with_default("lives", FieldType::Int, 1),
        Schema::builder("Owner").field(
            "pet",
            FieldType::discriminated("kind", [FieldType::model("Cat"), FieldType::model("Dog")]),
        ),
    ])
}

/// A small training setup: `Optimizer` nested in `Experiment`.
pub fn experiment_registry() -> SchemaRegistry {
    registry_with([
        Schema::builder("Optimizer")
            .field_with_default("name", FieldType::Str, "adam")
            .field_with_default("lr", FieldType::Float, 0.001),
        Schema::builder("Experiment")
            .field_with_default("optimizer", FieldType::model("Optimizer"), Config::new())
            .field_with_default("seed", FieldType::Int, 0)
            .field_with_default("epochs", FieldType::Int, 10)
            .field_with_default(
                "layers",
                FieldType::tuple(FieldType::Int),
                Value::Tuple(vec![Value::Int(64), Value::Int(64)]),
            )
            .field_with_default("note", FieldType::optional(FieldType::Str), Value::Null),
    ])
}
