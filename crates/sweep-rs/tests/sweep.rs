//! End-to-end sweep through the facade crate.

use pretty_assertions::assert_eq;
use sweep_rs::io::{Format, load};
use sweep_rs::{InitializeOptions, check_unique, config, field, initialize, product, write_all};
use sweep_rs_test_utils::experiment_registry;
use tempfile::TempDir;

/// A product sweep is initialized, checked for duplicates and written out.
#[test]
fn sweep_is_written_one_file_per_instance() {
    sweep_rs::init_logging();
    let registry = experiment_registry();
    let configs = product([
        field("optimizer.lr", [0.1, 0.01], true).expect("lr"),
        field("seed", [1, 2], true).expect("seed"),
    ])
    .expect("product");
    let options = InitializeOptions::new().with_constant(config! { "epochs" => 3 });
    let experiments = initialize(&registry, "Experiment", configs, &options)
        .expect("initialize")
        .into_instances()
        .expect("instances");
    assert!(check_unique([&experiments], true).expect("unique"));

    let temp = TempDir::new().expect("tmp");
    let paths = write_all(temp.path(), "run", Format::Yaml, &experiments).expect("write");
    assert_eq!(paths.len(), 4);
    assert_eq!(paths[3].file_name().and_then(|n| n.to_str()), Some("run-3.yaml"));

    let reloaded = load(&paths[3], &registry, "Experiment").expect("load");
    assert_eq!(&reloaded, &experiments[3]);
}
