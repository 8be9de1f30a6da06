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

//! The canonical hardware record.
//!
//! Numeric fields use zero for "unknown" and strings use the empty string.
//! Field order is part of the output format, serializers keep it.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Hardware inventory of one machine, as consumed by the orchestration layer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareDetails {
    #[serde(default)]
    pub system_vendor: SystemVendor,
    #[serde(default)]
    pub firmware: Firmware,
    #[serde(default)]
    pub ram_mebibytes: u64,
    #[serde(default)]
    pub nics: Vec<Nic>,
    #[serde(default)]
    pub storage: Vec<Storage>,
    #[serde(default)]
    pub cpu: Cpu,
    #[serde(default)]
    pub hostname: String,
}

impl HardwareDetails {
    pub fn total_storage_bytes(&self) -> u64 {
        self.storage
            .iter()
            .fold(0u64, |total, disk| total.saturating_add(disk.size_bytes))
    }

    pub fn physical_nics(&self) -> impl Iterator<Item = &Nic> {
        self.nics.iter().filter(|nic| nic.physical)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemVendor {
    pub vendor: String,
    pub manufacturer: String,
    pub product_name: String,
    pub serial_number: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Firmware {
    pub vendor: String,
    pub version: String,
    pub release_date: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cpu {
    pub arch: String,
    pub model: String,
    pub clock_megahertz: f64,
    /// Sorted and deduplicated
    pub flags: Vec<String>,
    /// Logical processors
    pub count: u32,
}

/// Storage class derived from the device name and rotational flag
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    #[serde(rename = "HDD")]
    Hdd,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "NVME")]
    Nvme,
    // Rotational flag not reported
    #[default]
    #[serde(rename = "")]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Storage {
    /// Device name as reported by the agent, e.g. `/dev/sda`
    pub name: String,
    /// Serial number, else by-path alias, else `name`. Disambiguates devices,
    /// it does not identify their owner.
    pub id: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotational: Option<bool>,
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub bus: String,
    pub vendor: String,
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub serial_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub by_path: String,
    #[serde(rename = "wwn", skip_serializing_if = "String::is_empty")]
    pub wwn: String,
    #[serde(rename = "wwnWithExtension", skip_serializing_if = "String::is_empty")]
    pub wwn_with_extension: String,
    #[serde(
        rename = "wwnVendorExtension",
        skip_serializing_if = "String::is_empty"
    )]
    pub wwn_vendor_extension: String,
    #[serde(rename = "hctl", skip_serializing_if = "String::is_empty")]
    pub hctl: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Nic {
    pub name: String,
    /// Lower-case, colon separated
    pub mac: String,
    pub ips: Vec<IpAddr>,
    /// 0 when unknown
    pub speed_mbps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    /// False for virtual, bond member and PXE-only interfaces
    pub physical: bool,
    pub pxe: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// VLANs configured on the switch port, as reported by LLDP
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vlans: Vec<Vlan>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vlan {
    pub id: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_serializes_empty_facets() {
        let serialized = serde_json::to_string(&HardwareDetails::default()).unwrap();
        assert_eq!(
            serialized,
            concat!(
                r#"{"systemVendor":{"vendor":"","manufacturer":"","productName":"","serialNumber":""},"#,
                r#""firmware":{"vendor":"","version":"","releaseDate":""},"#,
                r#""ramMebibytes":0,"nics":[],"storage":[],"#,
                r#""cpu":{"arch":"","model":"","clockMegahertz":0.0,"flags":[],"count":0},"#,
                r#""hostname":""}"#
            )
        );
    }

    #[test]
    fn storage_omits_unknown_optional_fields() {
        let disk = Storage {
            name: "/dev/sda".to_string(),
            id: "/dev/sda".to_string(),
            size_bytes: 10,
            ..Default::default()
        };
        let serialized = serde_json::to_string(&disk).unwrap();
        assert_eq!(
            serialized,
            r#"{"name":"/dev/sda","id":"/dev/sda","sizeBytes":10,"type":"","bus":"","vendor":"","model":""}"#
        );
        let parsed: Storage = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, disk);
    }

    #[test]
    fn totals() {
        let details = HardwareDetails {
            storage: vec![
                Storage {
                    size_bytes: u64::MAX,
                    ..Default::default()
                },
                Storage {
                    size_bytes: 1,
                    ..Default::default()
                },
            ],
            nics: vec![
                Nic {
                    physical: true,
                    ..Default::default()
                },
                Nic::default(),
            ],
            ..Default::default()
        };
        assert_eq!(details.total_storage_bytes(), u64::MAX);
        assert_eq!(details.physical_nics().count(), 1);
    }
}
