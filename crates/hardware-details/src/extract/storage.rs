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

use super::{inventory, sequence_section, string_field};
use crate::config::Policy;
use crate::diagnostics::{AnomalyReason, FacetReport};
use crate::payload::{Node, RawPayload};
use crate::record::{Storage, StorageKind};

const NVME_DEVICE_PREFIX: &str = "/dev/nvme";

/// Extracts `inventory.disks` in payload order
pub fn extract(payload: &RawPayload, policy: &Policy, report: &mut FacetReport) -> Vec<Storage> {
    let disks = inventory(payload, report).get("disks");
    sequence_section(&disks, report)
        .iter()
        .filter_map(|entry| {
            if entry.is_mapping() {
                Some(disk(entry, policy, report))
            } else {
                report.record(
                    entry,
                    AnomalyReason::NotCoercible {
                        expected: "a disk mapping".to_string(),
                    },
                );
                None
            }
        })
        .collect()
}

fn disk(entry: &Node<'_>, policy: &Policy, report: &mut FacetReport) -> Storage {
    let name = string_field(&entry.get("name"), report);
    let size_bytes = report
        .required(&entry.get("size"), |node| {
            node.as_bytes(policy.disk_size_unit, &policy.sizes)
        })
        .unwrap_or_default();
    let rotational = report.optional(&entry.get("rotational"), Node::as_bool);

    let is_nvme = name.starts_with(NVME_DEVICE_PREFIX);
    let mut bus = string_field(&entry.get_any(&["bus", "tran", "transport"]), report);
    if bus.is_empty() && is_nvme {
        bus = "nvme".to_string();
    }
    let kind = match rotational {
        _ if is_nvme => StorageKind::Nvme,
        Some(true) => StorageKind::Hdd,
        Some(false) => StorageKind::Ssd,
        None => StorageKind::Unknown,
    };

    let serial_number = string_field(&entry.get_any(&["serial", "serial_number"]), report);
    let by_path = string_field(&entry.get("by_path"), report);
    let id = [&serial_number, &by_path, &name]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .cloned()
        .unwrap_or_default();

    Storage {
        id,
        size_bytes,
        rotational,
        kind,
        bus,
        vendor: string_field(&entry.get("vendor"), report),
        model: string_field(&entry.get("model"), report),
        serial_number,
        by_path,
        wwn: string_field(&entry.get("wwn"), report),
        wwn_with_extension: string_field(&entry.get("wwn_with_extension"), report),
        wwn_vendor_extension: string_field(&entry.get("wwn_vendor_extension"), report),
        hctl: string_field(&entry.get("hctl"), report),
        name,
    }
}
