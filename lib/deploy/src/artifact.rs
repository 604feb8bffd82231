//! Locating compiled program artifacts.
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use toml::Table;

use crate::{
    error::{Error, Result},
    registry::ContractId,
};

const CARGO_TARGET_DIR_VAR: &str = "CARGO_TARGET_DIR";
const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// A compiled program, ready to be handed to the deployer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Program the artifact belongs to.
    pub contract: ContractId,
    /// Path to the optimized wasm binary.
    pub wasm: PathBuf,
    /// Directory holding the program's `Cargo.toml`.
    pub manifest_dir: PathBuf,
}

/// Where the workspace keeps its sources and build outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    workspace_root: PathBuf,
    target_dir: PathBuf,
}

impl Artifacts {
    /// Artifacts of the workspace rooted at `workspace_root`, built into its
    /// `target` directory.
    #[must_use]
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        let target_dir = workspace_root.join("target");
        Self { workspace_root, target_dir }
    }

    /// Artifacts of the workspace rooted at `workspace_root`.
    ///
    /// Honours `CARGO_TARGET_DIR` when it is set.
    #[must_use]
    pub fn in_workspace(workspace_root: impl Into<PathBuf>) -> Self {
        let artifacts = Self::new(workspace_root);
        match env::var_os(CARGO_TARGET_DIR_VAR) {
            Some(dir) if !dir.is_empty() => artifacts.with_target_dir(dir),
            _ => artifacts,
        }
    }

    /// Artifacts of the workspace enclosing the current directory.
    ///
    /// The root is the nearest ancestor whose `Cargo.toml` has a
    /// `[workspace]` table, or the current directory if there is none.
    #[must_use]
    pub fn discover() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_workspace(find_workspace_root(&cwd))
    }

    /// Use `target_dir` instead of `<workspace>/target`.
    #[must_use]
    pub fn with_target_dir(mut self, target_dir: impl Into<PathBuf>) -> Self {
        self.target_dir = target_dir.into();
        self
    }

    /// Root of the workspace.
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Expected location of `contract`'s wasm binary.
    #[must_use]
    pub fn wasm_path(&self, contract: ContractId) -> PathBuf {
        let name = contract.crate_name().replace('-', "_");
        self.target_dir
            .join(WASM_TARGET)
            .join("release")
            .join(format!("{name}.wasm"))
    }

    /// Directory holding `contract`'s manifest.
    #[must_use]
    pub fn manifest_dir(&self, contract: ContractId) -> PathBuf {
        self.workspace_root.join(contract.manifest_dir())
    }

    /// Finds the compiled binary of `contract`.
    ///
    /// # Errors
    ///
    /// * [`Error::ArtifactNotFound`] - If the program has not been built.
    pub fn resolve(&self, contract: ContractId) -> Result<Artifact> {
        let wasm = self.wasm_path(contract);
        if !wasm.is_file() {
            return Err(Error::ArtifactNotFound { contract, path: wasm });
        }

        Ok(Artifact {
            contract,
            wasm,
            manifest_dir: self.manifest_dir(contract),
        })
    }
}

fn find_workspace_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .unwrap_or(start)
        .to_path_buf()
}

fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest)
        .ok()
        .and_then(|contents| contents.parse::<Table>().ok())
        .is_some_and(|table| table.contains_key("workspace"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_built_program() {
        let root = tempfile::tempdir().unwrap();
        let artifacts = Artifacts::new(root.path());
        let wasm = artifacts.wasm_path(ContractId::Foundation);
        fs::create_dir_all(wasm.parent().unwrap()).unwrap();
        fs::write(&wasm, b"\0asm").unwrap();

        let artifact = artifacts.resolve(ContractId::Foundation).unwrap();

        assert_eq!(artifact.contract, ContractId::Foundation);
        assert_eq!(
            artifact.wasm,
            root.path()
                .join("target/wasm32-unknown-unknown/release/foundation.wasm")
        );
        assert_eq!(
            artifact.manifest_dir,
            root.path().join("programs/foundation")
        );
    }

    #[test]
    fn reports_missing_artifact() {
        let root = tempfile::tempdir().unwrap();
        let artifacts = Artifacts::new(root.path());

        let err = artifacts.resolve(ContractId::Kindlink).unwrap_err();

        assert!(matches!(
            err,
            Error::ArtifactNotFound { contract: ContractId::Kindlink, path }
                if path.ends_with("release/kindlink.wasm")
        ));
    }

    #[test]
    fn honours_custom_target_dir() {
        let root = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();

        let artifacts =
            Artifacts::new(root.path()).with_target_dir(target.path());

        assert!(artifacts
            .wasm_path(ContractId::Kindlink)
            .starts_with(target.path()));
        assert_eq!(artifacts.workspace_root(), root.path());
    }

    #[test]
    fn discovers_this_workspace() {
        let artifacts = Artifacts::discover();

        assert!(artifacts.workspace_root().join("Cargo.toml").is_file());
        assert!(artifacts.manifest_dir(ContractId::Kindlink).is_dir());
    }

    #[test]
    fn finds_enclosing_workspace() {
        let root = tempfile::tempdir().unwrap();
        let program = root.path().join("programs/kindlink");
        fs::create_dir_all(&program).unwrap();
        fs::write(root.path().join("Cargo.toml"), "[workspace]\n").unwrap();
        fs::write(
            program.join("Cargo.toml"),
            "[package]\nname = \"kindlink\"\n",
        )
        .unwrap();

        assert_eq!(find_workspace_root(&program), root.path());
    }

    #[test]
    fn falls_back_to_start_outside_a_workspace() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(find_workspace_root(dir.path()), dir.path());
    }
}
