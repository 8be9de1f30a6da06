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

//! hardware-details turns the loosely typed inventory a discovery agent
//! reports after inspecting a machine into a canonical [`HardwareDetails`]
//! record.
//!
//! Conversion only fails when the payload is not a mapping at all. Fields that
//! are missing, mistyped or out of range degrade to defaults and are listed in
//! [`Normalized::diagnostics`].
//!
//! ```
//! let normalized = hardware_details::normalize_str(
//!     r#"{"inventory": {"cpu": {"count": 8, "architecture": "amd64"}}}"#,
//! )
//! .unwrap();
//! assert_eq!(normalized.details.cpu.arch, "x86_64");
//! assert!(normalized.diagnostics.is_empty());
//! ```

pub mod arch;
pub mod coerce;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extract;
pub mod payload;
pub mod record;
pub mod source;
pub mod units;

pub use config::{ConfigError, NormalizationConfig, Policy};
pub use diagnostics::{Anomaly, AnomalyReason, Facet};
pub use engine::{Normalized, Normalizer};
pub use error::{FieldError, NormalizeError};
pub use payload::{FieldPath, Node, PayloadFormat, RawPayload};
pub use record::{Cpu, Firmware, HardwareDetails, Nic, Storage, StorageKind, SystemVendor, Vlan};
pub use source::{FetchError, InspectionSource, SavedInspections};

/// Normalizes an already decoded payload with the built-in policy
pub fn normalize(payload: &RawPayload) -> Normalized {
    Normalizer::default().normalize(payload)
}

/// Decodes a JSON payload and normalizes it with the built-in policy
pub fn normalize_str(data: &str) -> Result<Normalized, NormalizeError> {
    Normalizer::default().normalize_str(data)
}

/// Decodes a payload in `format` and normalizes it with the built-in policy
pub fn normalize_slice(data: &[u8], format: PayloadFormat) -> Result<Normalized, NormalizeError> {
    Normalizer::default().normalize_slice(data, format)
}
