//! Per-network record of completed deployments.
//!
//! The journal lives at `deployments/<network>/deployed_addresses.json` and
//! maps a descriptor id (`<module>#<contract>`) to where it was deployed and
//! with which constructor arguments.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    network::Network,
};

const JOURNAL_FILE: &str = "deployed_addresses.json";

/// Where a descriptor was deployed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Address of the deployed program.
    pub address: Address,
    /// Hash of the deployment transaction.
    pub tx_hash: TxHash,
    /// Constructor arguments as handed to `cargo stylus deploy`.
    #[serde(default)]
    pub constructor_args: Vec<String>,
}

/// Deployments recorded for one network.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    entries: BTreeMap<String, JournalEntry>,
}

impl Journal {
    /// Location of `network`'s journal under `root`.
    #[must_use]
    pub fn path_for(root: &Path, network: Network) -> PathBuf {
        root.join("deployments").join(network.name()).join(JOURNAL_FILE)
    }

    /// Opens the journal of `network` under `root`. A journal that does not
    /// exist yet is empty.
    ///
    /// # Errors
    ///
    /// * [`Error::Journal`] - If the file exists but cannot be read or is
    ///   not a valid journal.
    pub fn open(root: &Path, network: Network) -> Result<Self> {
        Self::open_at(Self::path_for(root, network))
    }

    /// Opens the journal stored at `path`.
    ///
    /// # Errors
    ///
    /// See [`Journal::open`].
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self { path, entries: BTreeMap::new() });
        }

        let contents = fs::read_to_string(&path).map_err(|e| Error::Journal {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let entries =
            serde_json::from_str(&contents).map_err(|e| Error::Journal {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The deployment recorded under `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.get(id)
    }

    /// Records `entry` under `id` and persists the journal.
    ///
    /// The file is replaced in one rename, so a crash leaves either the old
    /// or the new journal behind. The in-memory journal only changes once
    /// the file is written.
    ///
    /// # Errors
    ///
    /// * [`Error::Journal`] - If the journal cannot be written.
    pub fn record(&mut self, id: &str, entry: JournalEntry) -> Result<()> {
        let mut entries = self.entries.clone();
        entries.insert(id.to_owned(), entry);
        self.persist(&entries)?;
        self.entries = entries;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, JournalEntry>) -> Result<()> {
        let journal_err = |reason: String| Error::Journal {
            path: self.path.clone(),
            reason,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| journal_err(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| journal_err(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| journal_err(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| journal_err(e.to_string()))
    }
}
