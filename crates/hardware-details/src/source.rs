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

//! Where inspection payloads come from.
//!
//! The normalizer itself never fetches anything. Callers that talk to an
//! inspection provider implement [`InspectionSource`]; this crate only ships
//! [`SavedInspections`], which reads payloads saved to disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::NormalizeError;
use crate::payload::{PayloadFormat, RawPayload};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Could not reach the inspection provider: {0}")]
    Transport(String),
    #[error("Inspection provider rejected the credentials: {0}")]
    Authentication(String),
    #[error("No inspection data for node {0}")]
    NoData(String),
    #[error(transparent)]
    Malformed(#[from] NormalizeError),
}

/// Fetches the raw inspection payload of a node
pub trait InspectionSource: Send + Sync {
    fn fetch(&self, node: &str) -> Result<RawPayload, FetchError>;
}

/// Payloads stored as `<node>.json`, `<node>.yaml` or `<node>.yml` in one directory
#[derive(Clone, Debug)]
pub struct SavedInspections {
    dir: PathBuf,
}

impl SavedInspections {
    const EXTENSIONS: [(&'static str, PayloadFormat); 3] = [
        ("json", PayloadFormat::Json),
        ("yaml", PayloadFormat::Yaml),
        ("yml", PayloadFormat::Yaml),
    ];

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl InspectionSource for SavedInspections {
    fn fetch(&self, node: &str) -> Result<RawPayload, FetchError> {
        // Node ids are file names, never paths
        if node.is_empty() || node.contains(['/', '\\']) || node.starts_with('.') {
            return Err(FetchError::NoData(node.to_string()));
        }
        for (extension, format) in Self::EXTENSIONS {
            let path = self.dir.join(format!("{node}.{extension}"));
            match std::fs::read(&path) {
                Ok(data) => {
                    tracing::debug!(path = %path.display(), "Read saved inspection payload");
                    return Ok(RawPayload::decode(&data, format)?);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(FetchError::Transport(format!("{}: {e}", path.display()))),
            }
        }
        Err(FetchError::NoData(node.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_json_and_yaml_payloads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("node-a.json"), r#"{"hostname": "a"}"#).unwrap();
        std::fs::write(dir.path().join("node-b.yml"), "hostname: b\n").unwrap();
        let source = SavedInspections::new(dir.path());

        let a = source.fetch("node-a").unwrap();
        assert_eq!(a.root().get("hostname").as_string().unwrap(), "a");
        let b = source.fetch("node-b").unwrap();
        assert_eq!(b.root().get("hostname").as_string().unwrap(), "b");
    }

    #[test]
    fn missing_and_malformed_payloads() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "[1, 2").unwrap();
        let source = SavedInspections::new(dir.path());

        assert!(matches!(source.fetch("absent"), Err(FetchError::NoData(node)) if node == "absent"));
        assert!(matches!(source.fetch("../etc/passwd"), Err(FetchError::NoData(_))));
        assert!(matches!(
            source.fetch("broken"),
            Err(FetchError::Malformed(NormalizeError::Json(_)))
        ));
    }
}
