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

//! Anomaly records produced while extracting fields

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldError;
use crate::payload::Node;

/// The part of the hardware record an anomaly belongs to
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
    Cpu,
    Memory,
    Storage,
    Network,
    Firmware,
    SystemVendor,
    Hostname,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyReason {
    #[error("expected field is missing")]
    Missing,
    #[error("value is not coercible to {expected}")]
    NotCoercible { expected: String },
    #[error("{detail}")]
    Invalid { detail: String },
    #[error("extractor failed: {detail}")]
    ExtractorFault { detail: String },
}

impl From<FieldError> for AnomalyReason {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Missing => AnomalyReason::Missing,
            FieldError::NotCoercible { expected } => AnomalyReason::NotCoercible {
                expected: expected.to_string(),
            },
            FieldError::Invalid(detail) => AnomalyReason::Invalid { detail },
        }
    }
}

/// A field that could not be extracted, with enough context to chase the
/// discovery agent that produced it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub facet: Facet,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<Value>,
    pub reason: AnomalyReason,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.facet, self.path, self.reason)?;
        if let Some(raw) = &self.raw_value {
            write!(f, " (raw value: {raw})")?;
        }
        Ok(())
    }
}

/// Diagnostic sink handed to one extractor.
///
/// Each facet gets its own report so extractors never share mutable state;
/// the engine concatenates them afterwards. Every anomaly is also emitted as
/// a `tracing` warning.
#[derive(Debug)]
pub struct FacetReport {
    facet: Facet,
    anomalies: Vec<Anomaly>,
}

impl FacetReport {
    pub fn new(facet: Facet) -> Self {
        Self {
            facet,
            anomalies: Vec::new(),
        }
    }

    pub fn facet(&self) -> Facet {
        self.facet
    }

    pub fn record(&mut self, node: &Node<'_>, reason: AnomalyReason) {
        let anomaly = Anomaly {
            facet: self.facet,
            path: node.path().to_string(),
            raw_value: node.value().cloned(),
            reason,
        };
        tracing::warn!(
            facet = %anomaly.facet,
            path = %anomaly.path,
            raw_value = ?anomaly.raw_value,
            reason = %anomaly.reason,
            "Could not extract inspection field"
        );
        self.anomalies.push(anomaly);
    }

    pub(crate) fn record_fault(&mut self, detail: String) {
        let anomaly = Anomaly {
            facet: self.facet,
            path: String::new(),
            raw_value: None,
            reason: AnomalyReason::ExtractorFault { detail },
        };
        tracing::error!(facet = %anomaly.facet, reason = %anomaly.reason, "Extractor fault");
        self.anomalies.push(anomaly);
    }

    /// Runs `coerce` on a field that may legitimately be absent.
    ///
    /// Absence is silent; a present value that does not coerce is recorded.
    pub fn optional<'a, T>(
        &mut self,
        node: &Node<'a>,
        coerce: impl FnOnce(&Node<'a>) -> Result<T, FieldError>,
    ) -> Option<T> {
        match coerce(node) {
            Ok(value) => Some(value),
            Err(FieldError::Missing) => None,
            Err(e) => {
                self.record(node, e.into());
                None
            }
        }
    }

    /// Like [`FacetReport::optional`], but absence is recorded too
    pub fn required<'a, T>(
        &mut self,
        node: &Node<'a>,
        coerce: impl FnOnce(&Node<'a>) -> Result<T, FieldError>,
    ) -> Option<T> {
        match coerce(node) {
            Ok(value) => Some(value),
            Err(e) => {
                self.record(node, e.into());
                None
            }
        }
    }

    /// Number of fields this extractor could not resolve
    pub fn unresolved(&self) -> usize {
        self.anomalies.len()
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn into_anomalies(self) -> Vec<Anomaly> {
        self.anomalies
    }
}
