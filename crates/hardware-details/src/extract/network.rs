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

//! Network interfaces.
//!
//! Besides `inventory.interfaces` this reads three provider-processed
//! sections keyed by interface name: `all_interfaces` (IP, PXE),
//! `extra.network` (link speed) and `parsed_lldp` (switch port VLANs).

use std::net::IpAddr;

use serde_json::Value;

use super::{inventory, processed, sequence_section, string_field};
use crate::config::Policy;
use crate::diagnostics::{AnomalyReason, FacetReport};
use crate::error::FieldError;
use crate::payload::{Node, RawPayload};
use crate::record::{Nic, Vlan};

const MAX_VLAN_ID: u64 = 4094;

/// Processed sections for a single interface
struct Processed<'a> {
    interface: Node<'a>,
    extra: Node<'a>,
    lldp: Node<'a>,
}

impl<'a> Processed<'a> {
    fn lookup(processed: &Node<'a>, name: &str) -> Self {
        Self {
            interface: processed.get("all_interfaces").get(name),
            extra: processed.lookup("extra.network").get(name),
            lldp: processed.get("parsed_lldp").get(name),
        }
    }
}

/// Extracts `inventory.interfaces` in payload order. Interfaces without a
/// usable MAC address are left out.
pub fn extract(payload: &RawPayload, _policy: &Policy, report: &mut FacetReport) -> Vec<Nic> {
    let processed = processed(payload, report);
    let interfaces = inventory(payload, report).get("interfaces");
    let mut nics = Vec::new();
    for entry in sequence_section(&interfaces, report) {
        if !entry.is_mapping() {
            report.record(
                &entry,
                AnomalyReason::NotCoercible {
                    expected: "an interface mapping".to_string(),
                },
            );
            continue;
        }
        if let Some(nic) = interface(&entry, &processed, report) {
            nics.push(nic);
        }
    }
    nics
}

fn interface(entry: &Node<'_>, processed: &Node<'_>, report: &mut FacetReport) -> Option<Nic> {
    let name = string_field(&entry.get("name"), report);

    let mac_node = entry.get_any(&["mac_address", "mac"]);
    let mac = match mac_node.as_string() {
        Ok(raw) if !raw.is_empty() => report.optional(&mac_node, Node::as_mac)?,
        Ok(_) | Err(FieldError::Missing) => {
            tracing::debug!(
                path = %entry.path(),
                interface = %name,
                "Skipping interface without a MAC address"
            );
            return None;
        }
        Err(e) => {
            report.record(&mac_node, e.into());
            return None;
        }
    };

    let extras = Processed::lookup(processed, &name);

    let speed_mbps = report
        .optional(
            &entry
                .get_any(&["speed_mbps", "speed"])
                .or(extras.extra.get("speed")),
            Node::as_megabits,
        )
        .unwrap_or_default();

    let vlan_id = report
        .optional(
            &entry
                .get("vlan_id")
                .or(extras.lldp.get("switch_port_untagged_vlan_id")),
            tagged_vlan,
        )
        .flatten();

    let vendor = string_field(&entry.get("vendor"), report);
    let product = string_field(&entry.get("product"), report);

    Some(Nic {
        ips: addresses(entry, &extras, report),
        physical: is_physical(entry, report),
        pxe: report
            .optional(
                &entry.get("pxe_enabled").or(extras.interface.get("pxe")),
                Node::as_bool,
            )
            .unwrap_or_default(),
        model: format!("{vendor} {product}").trim().to_string(),
        vlans: switch_port_vlans(&extras.lldp.get("switch_port_vlans"), report),
        name,
        mac,
        speed_mbps,
        vlan_id,
    })
}

/// Addresses in first-seen order without duplicates
fn addresses(entry: &Node<'_>, extras: &Processed<'_>, report: &mut FacetReport) -> Vec<IpAddr> {
    let mut candidates = vec![entry.get("ipv4_address"), entry.get("ipv6_address")];
    for source in [entry.get("ip_addresses"), extras.interface.get("ip")] {
        match source.elements() {
            Some(elements) => candidates.extend(elements),
            None => candidates.push(source),
        }
    }

    let mut ips = Vec::new();
    for candidate in candidates {
        if matches!(candidate.value(), Some(Value::String(s)) if s.trim().is_empty()) {
            continue;
        }
        if let Some(ip) = report
            .optional(&candidate, Node::as_ip)
            .filter(|ip| !ips.contains(ip))
        {
            ips.push(ip);
        }
    }
    ips
}

/// `None` for untagged (VLAN 0), an error outside 1-4094
fn tagged_vlan(node: &Node<'_>) -> Result<Option<u16>, FieldError> {
    match node.as_u64()? {
        0 => Ok(None),
        id @ 1..=MAX_VLAN_ID => Ok(u16::try_from(id).ok()),
        id => Err(FieldError::Invalid(format!(
            "VLAN id {id} is outside 1-{MAX_VLAN_ID}"
        ))),
    }
}

fn is_physical(entry: &Node<'_>, report: &mut FacetReport) -> bool {
    let marked = ["virtual", "is_virtual", "bond_member", "pxe_only"]
        .into_iter()
        .any(|key| {
            report
                .optional(&entry.get(key), Node::as_bool)
                .unwrap_or_default()
        });
    let bond_master = string_field(&entry.get("bond_master"), report);
    !marked && bond_master.is_empty()
}

fn switch_port_vlans(node: &Node<'_>, report: &mut FacetReport) -> Vec<Vlan> {
    let mut vlans = Vec::new();
    for entry in node.elements().unwrap_or_default() {
        let Some(id) = report.required(&entry.get("id"), |node| match tagged_vlan(node)? {
            Some(id) => Ok(id),
            None => Err(FieldError::Invalid("VLAN id 0 on a switch port".to_string())),
        }) else {
            continue;
        };
        vlans.push(Vlan {
            id,
            name: string_field(&entry.get("name"), report),
        });
    }
    vlans
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::Facet;

    fn run(doc: Value) -> (Vec<Nic>, FacetReport) {
        let payload = RawPayload::from_value(doc).unwrap();
        let mut report = FacetReport::new(Facet::Network);
        let nics = extract(&payload, &Policy::default(), &mut report);
        (nics, report)
    }

    #[test]
    fn wrapped_payload_with_processed_data() {
        let (nics, report) = run(json!({
            "inventory": {"interfaces": [{
                "name": "eno1",
                "mac_address": "B8:CE:F6:12:34:56",
                "ipv4_address": "10.1.2.3",
                "ipv6_address": "fe80::bace:f6ff:fe12:3456",
                "vendor": "0x15b3",
                "product": "0x1017",
                "speed_mbps": 25000
            }]},
            "plugin_data": {
                "all_interfaces": {"eno1": {"ip": "10.1.2.3", "pxe": true}},
                "parsed_lldp": {"eno1": {
                    "switch_port_untagged_vlan_id": 100,
                    "switch_port_vlans": [{"id": 100, "name": "prov"}, {"id": 200}]
                }}
            }
        }));
        assert_eq!(nics.len(), 1);
        let nic = &nics[0];
        assert_eq!(nic.mac, "b8:ce:f6:12:34:56");
        assert_eq!(nic.speed_mbps, 25_000);
        assert_eq!(nic.vlan_id, Some(100));
        assert!(nic.pxe);
        assert!(nic.physical);
        assert_eq!(nic.model, "0x15b3 0x1017");
        assert_eq!(
            nic.vlans,
            vec![
                Vlan {
                    id: 100,
                    name: "prov".to_string()
                },
                Vlan {
                    id: 200,
                    name: String::new()
                }
            ]
        );
        let ips: Vec<_> = nic.ips.iter().map(ToString::to_string).collect();
        assert_eq!(ips, vec!["10.1.2.3", "fe80::bace:f6ff:fe12:3456"]);
        assert_eq!(report.unresolved(), 0);
    }

    #[test]
    fn interfaces_without_mac_are_skipped() {
        let (nics, report) = run(json!({"interfaces": [
            {"name": "lo"},
            {"name": "dummy0", "mac_address": ""},
            {"name": "eth0", "mac": "52-54-00-AA-BB-CC"},
            {"name": "eth1", "mac_address": "not-a-mac"}
        ]}));
        assert_eq!(nics.len(), 1);
        assert_eq!(nics[0].name, "eth0");
        assert_eq!(nics[0].mac, "52:54:00:aa:bb:cc");
        assert_eq!(nics[0].speed_mbps, 0);
        assert!(nics[0].ips.is_empty());
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.anomalies()[0].path, "interfaces[3].mac_address");
    }

    #[test]
    fn addresses_are_deduplicated_in_order() {
        let (nics, report) = run(json!({"interfaces": [{
            "name": "eth0",
            "mac": "52:54:00:aa:bb:cc",
            "ipv4_address": "192.168.0.10/24",
            "ip_addresses": ["192.168.0.10", "2001:db8::10/64", ""],
            "ipv6_address": null
        }]}));
        assert_eq!(report.unresolved(), 0);
        let ips: Vec<_> = nics[0].ips.iter().map(ToString::to_string).collect();
        assert_eq!(ips, vec!["192.168.0.10", "2001:db8::10"]);
    }

    #[test]
    fn speed_falls_back_to_extra_data() {
        let (nics, _) = run(json!({
            "interfaces": [
                {"name": "eth0", "mac": "52:54:00:00:00:01"},
                {"name": "eth1", "mac": "52:54:00:00:00:02", "speed": "10Gbps"}
            ],
            "extra": {"network": {"eth0": {"speed": "1000Mb/s"}}}
        }));
        assert_eq!(nics[0].speed_mbps, 1_000);
        assert_eq!(nics[1].speed_mbps, 10_000);
    }

    #[test]
    fn vlan_range() {
        let (nics, report) = run(json!({"interfaces": [
            {"name": "a", "mac": "52:54:00:00:00:01", "vlan_id": 0},
            {"name": "b", "mac": "52:54:00:00:00:02", "vlan_id": "4094"},
            {"name": "c", "mac": "52:54:00:00:00:03", "vlan_id": 4095}
        ]}));
        assert_eq!(nics[0].vlan_id, None);
        assert_eq!(nics[1].vlan_id, Some(4094));
        assert_eq!(nics[2].vlan_id, None);
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.anomalies()[0].path, "interfaces[2].vlan_id");
    }

    #[test]
    fn physical_markers() {
        let (nics, _) = run(json!({"interfaces": [
            {"name": "eth0", "mac": "52:54:00:00:00:01"},
            {"name": "veth0", "mac": "52:54:00:00:00:02", "virtual": true},
            {"name": "eth1", "mac": "52:54:00:00:00:03", "bond_master": "bond0"},
            {"name": "eth2", "mac": "52:54:00:00:00:04", "pxe_only": "true"},
            {"name": "eth3", "mac": "52:54:00:00:00:05", "bond_master": ""}
        ]}));
        let physical: Vec<_> = nics.iter().map(|nic| nic.physical).collect();
        assert_eq!(physical, vec![true, false, false, false, true]);
    }

    #[test]
    fn wrong_shapes() {
        let (nics, report) = run(json!({"inventory": {"interfaces": [
            ["eth0"],
            {"name": "eth1", "mac": "52:54:00:00:00:01", "speed_mbps": "fast"}
        ]}}));
        assert_eq!(nics.len(), 1);
        assert_eq!(nics[0].speed_mbps, 0);
        let paths: Vec<_> = report.anomalies().iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["inventory.interfaces[0]", "inventory.interfaces[1].speed_mbps"]
        );
    }
}
