//! Tenant registry module
//!
//! Holds the two read-only tenant mappings:
//! - tenant id -> `ConfigRecord`
//! - tenant id -> `TestDataRecord`
//!
//! The registry is built once at startup (from the built-in sample data or a
//! TOML fixture file) and shared through `AppState`. Nothing mutates it after
//! construction.

mod records;

pub use records::{ConfigRecord, RecordKind, TestDataRecord};

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Errors raised while building a registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read tenant file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tenant file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate {} entry for tenant '{tenant_id}'", .kind.as_str())]
    Duplicate {
        kind: RecordKind,
        tenant_id: String,
    },
}

/// Immutable tenant lookup tables
#[derive(Debug, Clone, Default)]
pub struct TenantRegistry {
    configs: HashMap<String, ConfigRecord>,
    test_data: HashMap<String, TestDataRecord>,
}

/// On-disk fixture layout
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    config: Vec<ConfigRecord>,
    #[serde(default)]
    test_data: Vec<TestDataRecord>,
}

impl TenantRegistry {
    /// Build a registry from record lists, rejecting duplicate tenant ids
    pub fn from_records(
        configs: Vec<ConfigRecord>,
        test_data: Vec<TestDataRecord>,
    ) -> Result<Self, RegistryError> {
        let mut config_map = HashMap::with_capacity(configs.len());
        for record in configs {
            if config_map.contains_key(&record.tenant_id) {
                return Err(RegistryError::Duplicate {
                    kind: RecordKind::Config,
                    tenant_id: record.tenant_id,
                });
            }
            config_map.insert(record.tenant_id.clone(), record);
        }

        let mut data_map = HashMap::with_capacity(test_data.len());
        for record in test_data {
            if data_map.contains_key(&record.tenant_id) {
                return Err(RegistryError::Duplicate {
                    kind: RecordKind::TestData,
                    tenant_id: record.tenant_id,
                });
            }
            data_map.insert(record.tenant_id.clone(), record);
        }

        Ok(Self {
            configs: config_map,
            test_data: data_map,
        })
    }

    /// Built-in sample tenants (`tenant1`, `tenant2`)
    pub fn sample() -> Self {
        let configs = [
            ("tenant1", "dark", "template_1", "Configuration for Tenant 1"),
            ("tenant2", "dark", "template_2", "Configuration for Tenant 2"),
        ]
        .into_iter()
        .map(|(tenant_id, theme, template, description)| {
            (
                tenant_id.to_string(),
                ConfigRecord {
                    tenant_id: tenant_id.to_string(),
                    theme: theme.to_string(),
                    template: template.to_string(),
                    description: description.to_string(),
                },
            )
        })
        .collect();

        let test_data = [
            ("tenant1", "This is test data for Tenant 1"),
            ("tenant2", "This is test data for Tenant 2"),
        ]
        .into_iter()
        .map(|(tenant_id, data)| {
            (
                tenant_id.to_string(),
                TestDataRecord {
                    tenant_id: tenant_id.to_string(),
                    data: data.to_string(),
                },
            )
        })
        .collect();

        Self {
            configs,
            test_data,
        }
    }

    /// Parse a TOML fixture with `[[config]]` and `[[test_data]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(content)?;
        Self::from_records(file.config, file.test_data)
    }

    /// Load a TOML fixture from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn get_config(&self, tenant_id: &str) -> Option<&ConfigRecord> {
        self.configs.get(tenant_id)
    }

    pub fn get_test_data(&self, tenant_id: &str) -> Option<&TestDataRecord> {
        self.test_data.get(tenant_id)
    }

    pub fn config_count(&self) -> usize {
        self.configs.len()
    }

    pub fn test_data_count(&self) -> usize {
        self.test_data.len()
    }
}
