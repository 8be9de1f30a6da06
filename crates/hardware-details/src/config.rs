/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::arch::{ArchitectureAliases, default_architecture_aliases};
use crate::units::{SizeUnits, default_size_suffixes};

const DEFAULT_DISK_SIZE_UNIT: &str = "B";
const DEFAULT_MEMORY_MODULE_UNIT: &str = "MiB";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read normalization config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid normalization config toml data: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Bare {field} unit '{unit}' is not one of the configured size suffixes")]
    UnknownUnit { field: &'static str, unit: String },
    #[error("Size suffix '{0}' must have a non-zero multiplier")]
    ZeroMultiplier(String),
}

/// Policy tables used while normalizing inspection payloads.
///
/// Every section and field defaults, so an empty file is a valid config.
///
/// ```toml
/// [architecture.aliases]
/// amd64 = "x86_64"
///
/// [units]
/// disk-size-unit = "B"
/// memory-module-unit = "MiB"
///
/// [units.size-suffixes]
/// gb = 1000000000
///
/// [engine]
/// concurrent = true
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NormalizationConfig {
    #[serde(default)]
    pub architecture: ArchitectureConfig,
    #[serde(default)]
    pub units: UnitsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl NormalizationConfig {
    /// Loads the normalization configuration file in toml format from the given path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the unit tables are total for the bare units they reference
    pub fn validate(&self) -> Result<(), ConfigError> {
        Policy::compile(self).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchitectureConfig {
    /// Alias (matched case-insensitively) to canonical architecture name.
    /// Replaces the built-in table when given.
    #[serde(default = "default_architecture_aliases")]
    pub aliases: BTreeMap<String, String>,
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self {
            aliases: default_architecture_aliases(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnitsConfig {
    /// Size suffix (matched case-insensitively) to its multiplier in bytes.
    /// Replaces the built-in table when given.
    #[serde(default = "default_size_suffixes")]
    pub size_suffixes: BTreeMap<String, u64>,
    /// Unit of a disk size given as a bare number
    #[serde(default = "default_disk_size_unit")]
    pub disk_size_unit: String,
    /// Unit of a memory module size given as a bare number
    #[serde(default = "default_memory_module_unit")]
    pub memory_module_unit: String,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            size_suffixes: default_size_suffixes(),
            disk_size_unit: default_disk_size_unit(),
            memory_module_unit: default_memory_module_unit(),
        }
    }
}

pub fn default_disk_size_unit() -> String {
    DEFAULT_DISK_SIZE_UNIT.to_string()
}

pub fn default_memory_module_unit() -> String {
    DEFAULT_MEMORY_MODULE_UNIT.to_string()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Run the facet extractors on one scoped thread each
    #[serde(default)]
    pub concurrent: bool,
}

/// A validated [`NormalizationConfig`] in the form the extractors consume
#[derive(Clone, Debug)]
pub struct Policy {
    pub architectures: ArchitectureAliases,
    pub sizes: SizeUnits,
    pub disk_size_unit: u64,
    pub memory_module_unit: u64,
    pub concurrent: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            architectures: ArchitectureAliases::default(),
            sizes: SizeUnits::default(),
            disk_size_unit: 1,
            memory_module_unit: crate::units::MEBIBYTE,
            concurrent: false,
        }
    }
}

impl Policy {
    pub fn compile(config: &NormalizationConfig) -> Result<Self, ConfigError> {
        if let Some((token, _)) = config
            .units
            .size_suffixes
            .iter()
            .find(|(_, multiplier)| **multiplier == 0)
        {
            return Err(ConfigError::ZeroMultiplier(token.clone()));
        }
        let sizes = SizeUnits::new(&config.units.size_suffixes);
        let bare_unit = |field: &'static str, unit: &str| {
            sizes.multiplier(unit).ok_or_else(|| ConfigError::UnknownUnit {
                field,
                unit: unit.to_string(),
            })
        };
        let disk_size_unit = bare_unit("disk-size", &config.units.disk_size_unit)?;
        let memory_module_unit = bare_unit("memory-module", &config.units.memory_module_unit)?;

        Ok(Self {
            architectures: ArchitectureAliases::new(&config.architecture.aliases),
            disk_size_unit,
            memory_module_unit,
            sizes,
            concurrent: config.engine.concurrent,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::arch::ResolvedArchitecture;

    #[test]
    fn empty_config_uses_defaults() {
        let config = NormalizationConfig::from_toml_str("").unwrap();
        assert_eq!(config, NormalizationConfig::default());

        let policy = Policy::compile(&config).unwrap();
        assert_eq!(policy.disk_size_unit, 1);
        assert_eq!(policy.memory_module_unit, 1024 * 1024);
        assert!(!policy.concurrent);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = NormalizationConfig::from_toml_str(
            r#"
[units]
memory-module-unit = "GiB"

[engine]
concurrent = true
"#,
        )
        .unwrap();
        assert_eq!(config.units.disk_size_unit, "B");
        assert_eq!(config.units.size_suffixes, default_size_suffixes());
        assert_eq!(config.architecture, ArchitectureConfig::default());

        let policy = Policy::compile(&config).unwrap();
        assert_eq!(policy.memory_module_unit, 1 << 30);
        assert!(policy.concurrent);
    }

    #[test]
    fn custom_tables_replace_defaults() {
        let config = NormalizationConfig::from_toml_str(
            r#"
[architecture.aliases]
"Intel(R) 64" = "x86_64"

[units]
disk-size-unit = "sector"

[units.size-suffixes]
sector = 512
MiB = 1048576
GB = 1000000000
"#,
        )
        .unwrap();
        let policy = Policy::compile(&config).unwrap();
        assert_eq!(policy.disk_size_unit, 512);
        assert_eq!(policy.sizes.multiplier("gb"), Some(1_000_000_000));
        assert_eq!(policy.sizes.multiplier("GiB"), None);
        assert_eq!(
            policy.architectures.resolve("intel(r) 64"),
            ResolvedArchitecture::Canonical("x86_64".to_string())
        );
        assert!(matches!(
            policy.architectures.resolve("amd64"),
            ResolvedArchitecture::Unknown(_)
        ));
    }

    #[test]
    fn unknown_bare_unit_is_rejected() {
        let err = NormalizationConfig::from_toml_str(
            r#"
[units]
disk-size-unit = "cubits"
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownUnit {
                field: "disk-size",
                ..
            }
        ));
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let err = NormalizationConfig::from_toml_str(
            r#"
[units.size-suffixes]
b = 1
nothing = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMultiplier(token) if token == "nothing"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nconcurrent = true").unwrap();
        let config = NormalizationConfig::load_from(file.path()).unwrap();
        assert!(config.engine.concurrent);

        let err = NormalizationConfig::load_from(Path::new("/nonexistent/normalize.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
