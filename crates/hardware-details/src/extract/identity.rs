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
use crate::record::SystemVendor;

/// System identity from `system_vendor`
pub fn extract(payload: &RawPayload, _policy: &Policy, report: &mut FacetReport) -> SystemVendor {
    let Some(section) = mapping_section(inventory(payload, report).get("system_vendor"), report) else {
        return SystemVendor::default();
    };

    let manufacturer = string_field(&section.get("manufacturer"), report);
    let mut vendor = string_field(&section.get("vendor"), report);
    if vendor.is_empty() {
        vendor = manufacturer.clone();
    }
    SystemVendor {
        vendor,
        manufacturer,
        product_name: string_field(&section.get_any(&["product_name", "product"]), report),
        serial_number: string_field(&section.get_any(&["serial_number", "serial"]), report),
    }
}

pub fn hostname(payload: &RawPayload, _policy: &Policy, report: &mut FacetReport) -> String {
    let node = inventory(payload, report)
        .get("hostname")
        .or(payload.root().get("hostname"));
    string_field(&node, report)
}
