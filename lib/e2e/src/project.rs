use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use eyre::{bail, Context, ContextCompat};
use toml::Table;

/// Information about the crate subject of an integration test.
#[derive(Debug)]
pub(crate) struct Crate {
    /// Path to the directory where the crate's manifest lives.
    pub(crate) manifest_dir: PathBuf,
    /// Path to the compiled wasm binary.
    pub(crate) wasm: PathBuf,
}

impl Crate {
    pub(crate) fn new() -> eyre::Result<Self> {
        let manifest_dir = env::current_dir()?;
        let name = read_pkg_name(&manifest_dir)?;
        let wasm = get_wasm(&name)?;
        if !wasm.is_file() {
            bail!(
                "no wasm binary at {}, build it with `cargo build --release --target wasm32-unknown-unknown`",
                wasm.display()
            );
        }

        Ok(Self { manifest_dir, wasm })
    }
}

/// Reads and parses the package name from a manifest in `path`.
fn read_pkg_name<P: AsRef<Path>>(path: P) -> eyre::Result<String> {
    let cargo_toml = path.as_ref().join("Cargo.toml");
    let contents = std::fs::read_to_string(&cargo_toml)
        .wrap_err_with(|| format!("failed to read {}", cargo_toml.display()))?;

    let table = contents.parse::<Table>()?;
    table
        .get("package")
        .and_then(|package| package.get("name"))
        .and_then(toml::Value::as_str)
        .map(ToOwned::to_owned)
        .context("unable to find package name in toml")
}

/// Returns the path to the compiled wasm binary with name `name`.
fn get_wasm(name: &str) -> eyre::Result<PathBuf> {
    let name = name.replace('-', "_");
    // Looks like "kindlink-stylus/target/debug/deps/kindlink-15764c2c9a33bee7".
    let mut dir = env::current_exe()?;
    let target_dir = loop {
        let Some(parent) = dir.parent() else {
            bail!("output directory is not 'target'");
        };

        let Some(leaf) = parent.file_name() else {
            bail!("output directory is not 'target'");
        };

        if leaf == OsStr::new("target") {
            break parent.to_path_buf();
        }

        dir = parent.to_path_buf();
    };

    Ok(target_dir
        .join("wasm32-unknown-unknown")
        .join("release")
        .join(format!("{name}.wasm")))
}
