#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Registry of index domains and the data columns that hold them.
//!
//! Each (geography, dataset) pair has an ordered table mapping a
//! human-facing domain key (e.g. `"income"`) to the column carrying that
//! domain's value. The tables are embedded TOML definitions parsed once at
//! startup; adding a domain means editing a file in `domains/`.

use std::collections::{BTreeMap, BTreeSet};

use depriv_map_index_models::{COMBINED, Dataset, Geography};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded domain definitions, one per geography/dataset pair.
const DOMAIN_TOMLS: &[(&str, &str)] = &[
    ("lsoa_ppfi", include_str!("../domains/lsoa_ppfi.toml")),
    ("lsoa_imd", include_str!("../domains/lsoa_imd.toml")),
    ("lad_ppfi", include_str!("../domains/lad_ppfi.toml")),
    ("lad_imd", include_str!("../domains/lad_imd.toml")),
];

/// Errors raised while building a [`DomainRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A definition file is not valid TOML for [`DomainDefinition`].
    #[error("Failed to parse domain definition '{name}': {source}")]
    Parse {
        /// Definition name.
        name: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A definition has no `combined` domain.
    #[error("Domain table {geography}/{dataset} has no 'combined' domain")]
    MissingCombined {
        /// Geography of the offending table.
        geography: Geography,
        /// Dataset of the offending table.
        dataset: Dataset,
    },

    /// The same domain key appears twice in one table.
    #[error("Domain table {geography}/{dataset} lists '{key}' more than once")]
    DuplicateKey {
        /// Geography of the offending table.
        geography: Geography,
        /// Dataset of the offending table.
        dataset: Dataset,
        /// Repeated key.
        key: String,
    },

    /// Two definitions cover the same geography/dataset pair.
    #[error("Domain table {geography}/{dataset} is defined more than once")]
    DuplicateTable {
        /// Geography of the repeated table.
        geography: Geography,
        /// Dataset of the repeated table.
        dataset: Dataset,
    },

    /// No definition covers a geography/dataset pair.
    #[error("No domain table for {geography}/{dataset}")]
    MissingTable {
        /// Geography without a table.
        geography: Geography,
        /// Dataset without a table.
        dataset: Dataset,
    },
}

/// One domain key and the column holding its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEntry {
    /// Human-facing key (e.g. `"living environment"`).
    pub key: String,
    /// Data column identifier (e.g. `"imd_living_env_decile"`).
    pub column: String,
}

/// A domain table as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainDefinition {
    /// Geography the columns belong to.
    pub geography: Geography,
    /// Dataset the columns belong to.
    pub dataset: Dataset,
    /// Domains in display order.
    pub domains: Vec<DomainEntry>,
}

/// Ordered mapping from domain key to column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainMap {
    entries: Vec<DomainEntry>,
}

impl DomainMap {
    /// Returns the column for `key`, if mapped.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.column.as_str())
    }

    /// Returns `true` if `key` is mapped.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Domain keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.iter()
    }

    /// Number of domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no domains are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A domain key resolved against the registry, with its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDomain<'a> {
    /// The key actually used (the requested key or `"combined"`).
    pub key: &'a str,
    /// Column holding that domain's values.
    pub column: &'a str,
}

impl ResolvedDomain<'_> {
    /// Returns `true` for the aggregate domain.
    #[must_use]
    pub fn is_combined(&self) -> bool {
        self.key == COMBINED
    }
}

/// Static domain tables for every geography/dataset pair.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    tables: BTreeMap<(Geography, Dataset), DomainMap>,
}

impl DomainRegistry {
    /// Builds the registry from the embedded TOML definitions.
    ///
    /// # Panics
    ///
    /// Panics if an embedded definition is invalid. These are compile-time
    /// constants, so a failure is a development error caught by the tests
    /// below.
    #[must_use]
    pub fn embedded() -> Self {
        Self::parse(DOMAIN_TOMLS)
            .unwrap_or_else(|e| panic!("Invalid embedded domain registry: {e}"))
    }

    /// Parses `(name, toml)` pairs into a registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if a definition fails to parse or the
    /// resulting tables are incomplete or inconsistent.
    pub fn parse(tomls: &[(&str, &str)]) -> Result<Self, RegistryError> {
        let definitions = tomls
            .iter()
            .map(|(name, toml_str)| {
                toml::de::from_str::<DomainDefinition>(toml_str).map_err(|source| {
                    RegistryError::Parse {
                        name: (*name).to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_definitions(definitions)
    }

    /// Builds a registry from already-parsed definitions.
    ///
    /// Every geography/dataset pair must be covered exactly once and every
    /// table must contain `"combined"`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] describing the first inconsistency found.
    pub fn from_definitions(definitions: Vec<DomainDefinition>) -> Result<Self, RegistryError> {
        let mut tables = BTreeMap::new();

        for def in definitions {
            let (geography, dataset) = (def.geography, def.dataset);

            let mut seen = BTreeSet::new();
            for entry in &def.domains {
                if !seen.insert(entry.key.as_str()) {
                    return Err(RegistryError::DuplicateKey {
                        geography,
                        dataset,
                        key: entry.key.clone(),
                    });
                }
            }
            if !seen.contains(COMBINED) {
                return Err(RegistryError::MissingCombined { geography, dataset });
            }

            let map = DomainMap {
                entries: def.domains,
            };
            if tables.insert((geography, dataset), map).is_some() {
                return Err(RegistryError::DuplicateTable { geography, dataset });
            }
        }

        for geography in Geography::ALL {
            for dataset in Dataset::ALL {
                if !tables.contains_key(&(*geography, *dataset)) {
                    return Err(RegistryError::MissingTable {
                        geography: *geography,
                        dataset: *dataset,
                    });
                }
            }
        }

        log::debug!("Loaded {} domain tables", tables.len());

        Ok(Self { tables })
    }

    /// Ordered domain table for one geography/dataset pair.
    ///
    /// Always contains `"combined"`.
    #[must_use]
    pub fn domains_for(&self, geography: Geography, dataset: Dataset) -> &DomainMap {
        // Construction guarantees every pair is present.
        &self.tables[&(geography, dataset)]
    }

    /// Domain keys usable as display labels on both sides of the
    /// side-by-side view, in PPFI order, each mapped to itself.
    ///
    /// Only keys present for both datasets are listed, so every entry
    /// resolves on either side.
    #[must_use]
    pub fn domains_for_compare(&self, geography: Geography) -> DomainMap {
        let left = self.domains_for(geography, Dataset::Ppfi);
        let right = self.domains_for(geography, Dataset::Imd);

        DomainMap {
            entries: left
                .keys()
                .filter(|key| right.contains(key))
                .map(|key| DomainEntry {
                    key: key.to_string(),
                    column: key.to_string(),
                })
                .collect(),
        }
    }

    /// Returns `key` if it is valid for the pair, otherwise `"combined"`.
    #[must_use]
    pub fn validate_key<'a>(
        &'a self,
        geography: Geography,
        dataset: Dataset,
        key: &'a str,
    ) -> &'a str {
        if self.domains_for(geography, dataset).contains(key) {
            key
        } else {
            COMBINED
        }
    }

    /// Resolves `key` to its column, substituting `"combined"` for keys
    /// that are not mapped for this pair.
    #[must_use]
    pub fn resolve<'a>(
        &'a self,
        geography: Geography,
        dataset: Dataset,
        key: &'a str,
    ) -> ResolvedDomain<'a> {
        let map = self.domains_for(geography, dataset);

        if let Some(column) = map.get(key) {
            return ResolvedDomain { key, column };
        }

        log::debug!("Domain '{key}' not mapped for {geography}/{dataset}, using '{COMBINED}'");
        ResolvedDomain {
            key: COMBINED,
            column: map.get(COMBINED).unwrap_or_default(),
        }
    }

    /// Column of the combined domain for a pair.
    #[must_use]
    pub fn combined_column(&self, geography: Geography, dataset: Dataset) -> &str {
        self.resolve(geography, dataset, COMBINED).column
    }

    /// Every column referenced at a geography, across both datasets.
    #[must_use]
    pub fn columns_for(&self, geography: Geography) -> BTreeSet<&str> {
        Dataset::ALL
            .iter()
            .flat_map(|dataset| self.domains_for(geography, *dataset).iter())
            .map(|e| e.column.as_str())
            .collect()
    }
}

/// Formats a domain key for display: underscores become spaces and each
/// word is capitalized (`"socio-demographic"` -> `"Socio-Demographic"`).
#[must_use]
pub fn pretty_domain(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_is_letter = false;

    for c in spaced.trim().chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}
