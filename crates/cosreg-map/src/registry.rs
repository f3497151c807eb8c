//! Loading of the per-jurisdiction mapping files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use cosreg_model::Jurisdiction;
use tracing::{debug, info};

use crate::config::JurisdictionMapping;
use crate::error::MappingError;

/// All loaded mappings, keyed by jurisdiction.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    mappings: BTreeMap<Jurisdiction, JurisdictionMapping>,
}

impl MappingRegistry {
    /// Loads every `*.toml` file in `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> Result<Self, MappingError> {
        let entries = fs::read_dir(dir).map_err(|e| MappingError::io(dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| MappingError::io(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(MappingError::Empty {
                path: dir.to_path_buf(),
            });
        }

        let mut registry = Self::default();
        for path in paths {
            let mapping = load_mapping_file(&path)?;
            debug!(
                path = %path.display(),
                jurisdiction = %mapping.jurisdiction,
                tables = mapping.tables.len(),
                "loaded mapping"
            );
            if registry.mappings.contains_key(&mapping.jurisdiction) {
                return Err(MappingError::DuplicateJurisdiction {
                    jurisdiction: mapping.jurisdiction,
                    path,
                });
            }
            registry.mappings.insert(mapping.jurisdiction, mapping);
        }

        info!(
            dir = %dir.display(),
            jurisdictions = registry.mappings.len(),
            "mapping registry loaded"
        );
        Ok(registry)
    }

    pub fn from_mappings(mappings: impl IntoIterator<Item = JurisdictionMapping>) -> Self {
        Self {
            mappings: mappings
                .into_iter()
                .map(|mapping| (mapping.jurisdiction, mapping))
                .collect(),
        }
    }

    pub fn get(&self, jurisdiction: Jurisdiction) -> Option<&JurisdictionMapping> {
        self.mappings.get(&jurisdiction)
    }

    pub fn jurisdictions(&self) -> impl Iterator<Item = Jurisdiction> + '_ {
        self.mappings.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JurisdictionMapping> {
        self.mappings.values()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Reads and validates one mapping file.
pub fn load_mapping_file(path: &Path) -> Result<JurisdictionMapping, MappingError> {
    let text = fs::read_to_string(path).map_err(|e| MappingError::io(path, e))?;
    let mapping = JurisdictionMapping::from_toml_str(&text).map_err(|source| MappingError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    mapping.validate().map_err(|message| MappingError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(mapping)
}
