//! Public surface for sweep-rs.
//!
//! Re-exports the combinators, schema model and document I/O, plus a small
//! logging helper for binaries.

/// Re-export for convenience.
pub use sweep_rs_core as core;
/// Re-export for convenience.
pub use sweep_rs_io as io;

pub use sweep_rs_core::*;

use log::info;
use std::path::PathBuf;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Write one document per instance into `dir`, named `{stem}-{index}.{ext}`.
///
/// Returns the written paths in instance order.
pub fn write_all(
    dir: impl AsRef<std::path::Path>,
    stem: &str,
    format: io::Format,
    instances: &[Instance],
) -> Result<Vec<PathBuf>, io::IoError> {
    let dir = dir.as_ref();
    let mut paths = Vec::with_capacity(instances.len());
    for (index, instance) in instances.iter().enumerate() {
        let path = dir.join(format!("{stem}-{index}.{}", format.extension()));
        io::write(&path, instance)?;
        paths.push(path);
    }
    info!(
        "wrote sweep (dir={}, count={}, format={format})",
        dir.display(),
        paths.len()
    );
    Ok(paths)
}
