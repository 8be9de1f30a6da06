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

use super::{inventory, mapping_section, string_field};
use crate::config::Policy;
use crate::diagnostics::FacetReport;
use crate::payload::RawPayload;
use crate::record::Firmware;

/// BIOS details from `system_vendor.firmware`, or a top-level `firmware` /
/// `bios` section on agents that report it separately.
pub fn extract(payload: &RawPayload, _policy: &Policy, report: &mut FacetReport) -> Firmware {
    let inventory = inventory(payload, report);
    let node = inventory
        .lookup("system_vendor.firmware")
        .or(inventory.get("firmware"))
        .or(inventory.get("bios"));
    let Some(section) = mapping_section(node, report) else {
        return Firmware::default();
    };

    Firmware {
        vendor: string_field(&section.get("vendor"), report),
        version: string_field(&section.get("version"), report),
        release_date: string_field(
            &section.get_any(&["build_date", "release_date", "date"]),
            report,
        ),
    }
}
