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

use std::collections::BTreeSet;

use serde_json::Value;

use super::{inventory, mapping_section, string_field};
use crate::arch::ResolvedArchitecture;
use crate::config::Policy;
use crate::diagnostics::{AnomalyReason, FacetReport};
use crate::error::FieldError;
use crate::payload::{Node, RawPayload};
use crate::record::Cpu;

/// Extracts the CPU facet from `inventory.cpu`, with the legacy top-level
/// `cpus` / `cpu_arch` keys as fallbacks.
pub fn extract(payload: &RawPayload, policy: &Policy, report: &mut FacetReport) -> Cpu {
    let root = payload.root();
    let section = mapping_section(inventory(payload, report).get("cpu"), report);
    let legacy_count = root.get("cpus");
    let legacy_arch = root.get("cpu_arch");

    let Some(section) = section else {
        if !legacy_count.is_present() && !legacy_arch.is_present() {
            return Cpu::default();
        }
        // Only the legacy summary keys are available
        return Cpu {
            arch: report
                .optional(&legacy_arch, Node::as_string)
                .map(|raw| architecture(policy, &raw))
                .unwrap_or_default(),
            count: report
                .optional(&legacy_count, logical_count)
                .unwrap_or_default(),
            ..Default::default()
        };
    };

    let arch = report
        .required(&section.get("architecture").or(legacy_arch), Node::as_string)
        .map(|raw| architecture(policy, &raw))
        .unwrap_or_default();
    let count = report
        .required(&section.get("count").or(legacy_count), logical_count)
        .unwrap_or_default();
    let clock_megahertz = report
        .optional(
            &section.get_any(&["frequency", "frequency_mhz"]),
            Node::as_megahertz,
        )
        .unwrap_or_default();
    let model = string_field(&section.get_any(&["model_name", "model"]), report);
    let flags = flags(&section.get("flags"), report);

    Cpu {
        arch,
        model,
        clock_megahertz,
        flags,
        count,
    }
}

fn architecture(policy: &Policy, raw: &str) -> String {
    match policy.architectures.resolve(raw) {
        ResolvedArchitecture::Canonical(canonical) => canonical,
        ResolvedArchitecture::Unknown(raw) => {
            tracing::debug!(architecture = %raw, "Passing through unknown CPU architecture");
            raw
        }
    }
}

fn logical_count(node: &Node<'_>) -> Result<u32, FieldError> {
    let count = node.as_u64()?;
    u32::try_from(count)
        .map_err(|_| FieldError::Invalid(format!("{count} logical processors is out of range")))
}

/// Flags as a sequence of strings or a single whitespace separated string
fn flags(node: &Node<'_>, report: &mut FacetReport) -> Vec<String> {
    let mut flags = BTreeSet::new();
    match node.value() {
        None => {}
        Some(Value::String(s)) => {
            flags.extend(s.split_whitespace().map(str::to_string));
        }
        Some(Value::Array(_)) => {
            for flag in node.elements().unwrap_or_default() {
                match flag.value() {
                    Some(Value::String(s)) if !s.trim().is_empty() => {
                        flags.insert(s.trim().to_string());
                    }
                    Some(Value::String(_)) | None => {}
                    Some(_) => report.record(
                        &flag,
                        AnomalyReason::NotCoercible {
                            expected: "a string".to_string(),
                        },
                    ),
                }
            }
        }
        Some(_) => report.record(
            node,
            AnomalyReason::NotCoercible {
                expected: "a sequence of strings".to_string(),
            },
        ),
    }
    flags.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::Facet;

    fn run(doc: Value) -> (Cpu, FacetReport) {
        let payload = RawPayload::from_value(doc).unwrap();
        let mut report = FacetReport::new(Facet::Cpu);
        let cpu = extract(&payload, &Policy::default(), &mut report);
        (cpu, report)
    }

    #[test]
    fn ironic_cpu_section() {
        let (cpu, report) = run(json!({"inventory": {"cpu": {
            "model_name": "Intel(R) Xeon(R) Gold 6338 CPU @ 2.00GHz",
            "frequency": "2000.0000",
            "count": 128,
            "architecture": "x86_64",
            "flags": ["sse2", "avx", "fpu", "avx"],
            "socket_count": 2
        }}}));
        assert_eq!(report.unresolved(), 0);
        assert_eq!(cpu.arch, "x86_64");
        assert_eq!(cpu.count, 128);
        assert_eq!(cpu.clock_megahertz, 2000.0);
        assert_eq!(cpu.model, "Intel(R) Xeon(R) Gold 6338 CPU @ 2.00GHz");
        assert_eq!(cpu.flags, vec!["avx", "fpu", "sse2"]);
    }

    #[test]
    fn flags_are_order_independent() {
        let (a, _) = run(json!({"cpu": {"count": 1, "architecture": "x86_64",
            "flags": ["vmx", "aes", "sse4_2", "aes"]}}));
        let (b, _) = run(json!({"cpu": {"count": 1, "architecture": "x86_64",
            "flags": "sse4_2 vmx  aes"}}));
        assert_eq!(a.flags, b.flags);
        assert_eq!(a.flags, vec!["aes", "sse4_2", "vmx"]);
    }

    #[test]
    fn unit_suffixed_frequency_and_aliased_arch() {
        let (cpu, report) = run(json!({"cpu": {
            "count": "64", "architecture": "arm64", "frequency": "3 GHz"
        }}));
        assert_eq!(report.unresolved(), 0);
        assert_eq!(cpu.arch, "aarch64");
        assert_eq!(cpu.count, 64);
        assert_eq!(cpu.clock_megahertz, 3000.0);
    }

    #[test]
    fn broken_fields_are_reported_and_defaulted() {
        let (cpu, report) = run(json!({"inventory": {"cpu": {
            "count": "lots", "architecture": "mips", "frequency": "fast",
            "flags": ["fpu", {"bad": true}, 7, true, null, " "]
        }}}));
        assert_eq!(cpu.count, 0);
        assert_eq!(cpu.clock_megahertz, 0.0);
        assert_eq!(cpu.arch, "mips");
        assert_eq!(cpu.flags, vec!["fpu"]);
        let paths: Vec<_> = report.anomalies().iter().map(|a| a.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "inventory.cpu.count",
                "inventory.cpu.frequency",
                "inventory.cpu.flags[1]",
                "inventory.cpu.flags[2]",
                "inventory.cpu.flags[3]"
            ]
        );
    }

    #[test]
    fn overflowing_frequency_defaults_to_zero() {
        let (cpu, report) = run(json!({"cpu": {
            "count": 1, "architecture": "x86_64", "frequency": "9".repeat(400)
        }}));
        assert_eq!(cpu.clock_megahertz, 0.0);
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.anomalies()[0].path, "cpu.frequency");
    }

    #[test]
    fn missing_count_is_reported_under_present_section() {
        let (cpu, report) = run(json!({"cpu": {"architecture": "x86_64"}}));
        assert_eq!(cpu.count, 0);
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.anomalies()[0].path, "cpu.count");
    }

    #[test]
    fn legacy_summary_keys() {
        let (cpu, report) = run(json!({"cpus": 16, "cpu_arch": "amd64"}));
        assert_eq!(report.unresolved(), 0);
        assert_eq!(cpu.count, 16);
        assert_eq!(cpu.arch, "x86_64");
    }

    #[test]
    fn absent_section_is_silent() {
        let (cpu, report) = run(json!({"inventory": {}}));
        assert_eq!(cpu, Cpu::default());
        assert_eq!(report.unresolved(), 0);
    }
}
