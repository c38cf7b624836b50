use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::Observation;
use crate::utils::files::{load_json_or_default, save_json};

/// Last-known observation per tracked URL, loaded once and saved once per run.
pub struct StateStore {
    path: PathBuf,
    entries: BTreeMap<String, Observation>,
}

impl StateStore {
    /// Missing or unreadable files start an empty store.
    pub fn load(path: &Path) -> Self {
        let entries: BTreeMap<String, Observation> = load_json_or_default(path);
        tracing::debug!("Loaded {} observations from {}", entries.len(), path.display());
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn get(&self, url: &str) -> Option<&Observation> {
        self.entries.get(url)
    }

    /// Replace the record for `observation.url`, returning the one it displaced.
    pub fn record(&mut self, observation: Observation) -> Option<Observation> {
        self.entries.insert(observation.url.clone(), observation)
    }

    pub fn save(&self) -> crate::Result<()> {
        save_json(&self.path, &self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
