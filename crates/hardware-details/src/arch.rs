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

/// Spellings of the same instruction-set family reported by different
/// kernels, distributions and firmware, mapped to the `uname -m` name.
pub const DEFAULT_ARCHITECTURE_ALIASES: &[(&str, &str)] = &[
    ("x86_64", "x86_64"),
    ("x86-64", "x86_64"),
    ("amd64", "x86_64"),
    ("x64", "x86_64"),
    ("intel64", "x86_64"),
    ("em64t", "x86_64"),
    ("aarch64", "aarch64"),
    ("arm64", "aarch64"),
    ("armv8", "aarch64"),
    ("armv8l", "aarch64"),
    ("i386", "i686"),
    ("i486", "i686"),
    ("i586", "i686"),
    ("i686", "i686"),
    ("x86", "i686"),
    ("ppc64le", "ppc64le"),
    ("ppc64el", "ppc64le"),
    ("powerpc64le", "ppc64le"),
    ("s390x", "s390x"),
    ("riscv64", "riscv64"),
];

pub fn default_architecture_aliases() -> BTreeMap<String, String> {
    DEFAULT_ARCHITECTURE_ALIASES
        .iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect()
}

/// Outcome of resolving an architecture string
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedArchitecture {
    /// The input was a known alias
    Canonical(String),
    /// Not in the table, passed through unchanged
    Unknown(String),
}

impl ResolvedArchitecture {
    pub fn into_string(self) -> String {
        match self {
            ResolvedArchitecture::Canonical(s) | ResolvedArchitecture::Unknown(s) => s,
        }
    }
}

/// Case-insensitive alias table for CPU architecture names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchitectureAliases {
    aliases: BTreeMap<String, String>,
}

impl Default for ArchitectureAliases {
    fn default() -> Self {
        Self::new(&default_architecture_aliases())
    }
}

impl ArchitectureAliases {
    pub fn new(table: &BTreeMap<String, String>) -> Self {
        Self {
            aliases: table
                .iter()
                .map(|(alias, canonical)| (alias.trim().to_ascii_lowercase(), canonical.clone()))
                .collect(),
        }
    }

    pub fn resolve(&self, raw: &str) -> ResolvedArchitecture {
        match self.aliases.get(&raw.trim().to_ascii_lowercase()) {
            Some(canonical) => ResolvedArchitecture::Canonical(canonical.clone()),
            None => ResolvedArchitecture::Unknown(raw.to_string()),
        }
    }
}
