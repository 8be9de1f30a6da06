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

use super::{inventory, mapping_section};
use crate::config::Policy;
use crate::diagnostics::{AnomalyReason, FacetReport};
use crate::payload::RawPayload;
use crate::units::MEBIBYTE;

/// Total RAM in MiB, 0 when unknown.
///
/// Sources in order of preference: `memory.physical_mb`, `memory.total`
/// (bytes), the legacy `memory_mb`, and finally the sum of the module list.
pub fn extract(payload: &RawPayload, policy: &Policy, report: &mut FacetReport) -> u64 {
    let section = mapping_section(inventory(payload, report).get("memory"), report);
    let legacy = payload.root().get("memory_mb");

    let Some(section) = section else {
        return report
            .optional(&legacy, |node| node.as_bytes(MEBIBYTE, &policy.sizes))
            .map(to_mebibytes)
            .unwrap_or_default();
    };

    let physical = section.get("physical_mb");
    if let Some(bytes) =
        report.optional(&physical, |node| node.as_bytes(MEBIBYTE, &policy.sizes))
    {
        return to_mebibytes(bytes);
    }
    let total = section.get("total");
    if let Some(bytes) = report.optional(&total, |node| node.as_bytes(1, &policy.sizes)) {
        return to_mebibytes(bytes);
    }
    if let Some(bytes) =
        report.optional(&legacy, |node| node.as_bytes(MEBIBYTE, &policy.sizes))
    {
        return to_mebibytes(bytes);
    }

    let modules = section.get_any(&["modules", "dimms"]);
    if let Some(entries) = modules.elements() {
        let mut sum = 0u64;
        let mut resolved = 0usize;
        for module in entries {
            let size = module.get("size");
            match size.as_bytes(policy.memory_module_unit, &policy.sizes) {
                Ok(bytes) => {
                    sum = sum.saturating_add(bytes);
                    resolved += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        path = %size.path(),
                        error = %e,
                        "Ignoring memory module without a usable size"
                    );
                }
            }
        }
        if resolved > 0 {
            return to_mebibytes(sum);
        }
    }

    // A memory section that carries no usable total at all
    if !physical.is_present() && !total.is_present() && !legacy.is_present() {
        report.record(&total, AnomalyReason::Missing);
    }
    0
}

fn to_mebibytes(bytes: u64) -> u64 {
    bytes / MEBIBYTE
}
