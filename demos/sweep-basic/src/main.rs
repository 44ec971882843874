use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use sweep_rs::io::{Format, load_config};
use sweep_rs::{
    FieldType, InitializeOptions, Schema, SchemaRegistry, Value, check_unique, config,
    display_config, field, init_logging, initialize, model_diff, product, random_seeds, write_all,
    zip,
};

fn registry() -> Result<SchemaRegistry> {
    let registry = SchemaRegistry::new();
    registry.register(
        Schema::builder("Optimizer")
            .field_with_default(
                "name",
                FieldType::union([FieldType::literal("adam"), FieldType::literal("sgd")]),
                "adam",
            )
            .field_with_default("lr", FieldType::Float, 0.001)
            .build()?,
    )?;
    registry.register(
        Schema::builder("Experiment")
            .field_with_default("optimizer", FieldType::model("Optimizer"), config! {})
            .field_with_default("seed", FieldType::Int, 0)
            .field_with_default("epochs", FieldType::Int, 10)
            .field_with_default("dropout", FieldType::optional(FieldType::Float), Value::Null)
            .build()?,
    )?;
    Ok(registry)
}

fn main() -> Result<()> {
    init_logging();
    let registry = registry()?;

    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("base.json5");
    let base = load_config(&base_path)
        .with_context(|| format!("failed to load base config at {}", base_path.display()))?;

    let seeds: Vec<i64> = random_seeds(3, 10_000)?
        .into_iter()
        .map(|seed| seed as i64)
        .collect();
    let configs = product([
        zip([
            field("optimizer.lr", [0.1, 0.01], true)?,
            field("dropout", [Value::Default, Value::Float(0.2)], true)?,
        ])?,
        field("seed", seeds, true)?,
    ])?;

    let options = InitializeOptions::new()
        .with_default(base)
        .with_constant(config! { "optimizer.name" => "sgd" });
    let experiments = initialize(&registry, "Experiment", configs, &options)?.into_instances()?;
    check_unique([&experiments], true)?;

    for experiment in &experiments {
        println!("{experiment}");
    }
    if let [first, .., last] = experiments.as_slice() {
        println!("first vs last: {}", display_config(&model_diff(first, last)?));
    }

    let out = std::env::temp_dir().join("sweep-basic");
    std::fs::create_dir_all(&out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    let paths = write_all(&out, "experiment", Format::Json, &experiments)?;
    info!("sweep written (dir={}, runs={})", out.display(), paths.len());
    Ok(())
}
