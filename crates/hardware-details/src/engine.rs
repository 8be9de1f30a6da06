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

//! Runs the facet extractors and assembles the record.
//!
//! Every extractor runs behind its own fault boundary. A panic inside one is
//! recorded as an [`AnomalyReason::ExtractorFault`] for that facet, which then
//! takes its default; the other facets are unaffected.
//!
//! [`AnomalyReason::ExtractorFault`]: crate::diagnostics::AnomalyReason::ExtractorFault

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, ScopedJoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{Dispatch, Span, dispatcher};

use crate::config::{ConfigError, NormalizationConfig, Policy};
use crate::diagnostics::{Anomaly, Facet, FacetReport};
use crate::error::NormalizeError;
use crate::extract::{cpu, firmware, identity, memory, network, storage};
use crate::payload::{PayloadFormat, RawPayload};
use crate::record::{Cpu, Firmware, HardwareDetails, Nic, Storage, SystemVendor};
use crate::units::capacity_string;

/// Result of one conversion: the record plus everything that could not be extracted
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    pub details: HardwareDetails,
    /// In facet order, then in the order the extractor met them
    pub diagnostics: Vec<Anomaly>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

type Extractor<T> = fn(&RawPayload, &Policy, &mut FacetReport) -> T;

/// The extractor for each facet
#[derive(Clone, Copy)]
pub(crate) struct Extractors {
    pub cpu: Extractor<Cpu>,
    pub memory: Extractor<u64>,
    pub storage: Extractor<Vec<Storage>>,
    pub network: Extractor<Vec<Nic>>,
    pub firmware: Extractor<Firmware>,
    pub system_vendor: Extractor<SystemVendor>,
    pub hostname: Extractor<String>,
}

pub(crate) const EXTRACTORS: Extractors = Extractors {
    cpu: cpu::extract,
    memory: memory::extract,
    storage: storage::extract,
    network: network::extract,
    firmware: firmware::extract,
    system_vendor: identity::extract,
    hostname: identity::hostname,
};

/// Converts inspection payloads under a fixed [`Policy`]
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    policy: Policy,
}

impl Normalizer {
    pub fn new(config: &NormalizationConfig) -> Result<Self, ConfigError> {
        Policy::compile(config).map(Self::with_policy)
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Never fails. Anything that could not be extracted is in the diagnostics.
    pub fn normalize(&self, payload: &RawPayload) -> Normalized {
        self.normalize_with(payload, &EXTRACTORS)
    }

    pub fn normalize_str(&self, data: &str) -> Result<Normalized, NormalizeError> {
        Ok(self.normalize(&RawPayload::from_json_str(data)?))
    }

    pub fn normalize_slice(
        &self,
        data: &[u8],
        format: PayloadFormat,
    ) -> Result<Normalized, NormalizeError> {
        Ok(self.normalize(&RawPayload::decode(data, format)?))
    }

    pub(crate) fn normalize_with(
        &self,
        payload: &RawPayload,
        extractors: &Extractors,
    ) -> Normalized {
        let span = tracing::info_span!("normalize", concurrent = self.policy.concurrent);
        let _enter = span.enter();

        let facets = if self.policy.concurrent {
            extract_concurrently(payload, &self.policy, extractors)
        } else {
            extract_sequentially(payload, &self.policy, extractors)
        };
        let normalized = facets.merge();

        tracing::info!(
            cpus = normalized.details.cpu.count,
            ram_mebibytes = normalized.details.ram_mebibytes,
            disks = normalized.details.storage.len(),
            storage = %capacity_string(normalized.details.total_storage_bytes()),
            nics = normalized.details.nics.len(),
            anomalies = normalized.diagnostics.len(),
            "Normalized inspection payload"
        );
        normalized
    }
}

/// Per-facet results before merging
struct Facets {
    cpu: (Cpu, FacetReport),
    memory: (u64, FacetReport),
    storage: (Vec<Storage>, FacetReport),
    network: (Vec<Nic>, FacetReport),
    firmware: (Firmware, FacetReport),
    system_vendor: (SystemVendor, FacetReport),
    hostname: (String, FacetReport),
}

impl Facets {
    fn merge(self) -> Normalized {
        let (cpu, cpu_report) = self.cpu;
        let (ram_mebibytes, memory_report) = self.memory;
        let (storage, storage_report) = self.storage;
        let (nics, network_report) = self.network;
        let (firmware, firmware_report) = self.firmware;
        let (system_vendor, system_vendor_report) = self.system_vendor;
        let (hostname, hostname_report) = self.hostname;

        let mut diagnostics = Vec::new();
        for report in [
            cpu_report,
            memory_report,
            storage_report,
            network_report,
            firmware_report,
            system_vendor_report,
            hostname_report,
        ] {
            tracing::debug!(
                facet = %report.facet(),
                unresolved = report.unresolved(),
                "Extracted facet"
            );
            diagnostics.extend(report.into_anomalies());
        }

        Normalized {
            details: HardwareDetails {
                system_vendor,
                firmware,
                ram_mebibytes,
                nics,
                storage,
                cpu,
                hostname,
            },
            diagnostics,
        }
    }
}

fn extract_sequentially(payload: &RawPayload, policy: &Policy, x: &Extractors) -> Facets {
    Facets {
        cpu: run_facet(Facet::Cpu, |r| (x.cpu)(payload, policy, r)),
        memory: run_facet(Facet::Memory, |r| (x.memory)(payload, policy, r)),
        storage: run_facet(Facet::Storage, |r| (x.storage)(payload, policy, r)),
        network: run_facet(Facet::Network, |r| (x.network)(payload, policy, r)),
        firmware: run_facet(Facet::Firmware, |r| (x.firmware)(payload, policy, r)),
        system_vendor: run_facet(Facet::SystemVendor, |r| {
            (x.system_vendor)(payload, policy, r)
        }),
        hostname: run_facet(Facet::Hostname, |r| (x.hostname)(payload, policy, r)),
    }
}

/// One scoped thread per facet, all joined before returning.
///
/// Each thread logs through the caller's subscriber inside the caller's span.
fn extract_concurrently(payload: &RawPayload, policy: &Policy, x: &Extractors) -> Facets {
    let dispatch = dispatcher::get_default(Dispatch::clone);
    let span = Span::current();
    let traced = Traced {
        dispatch: &dispatch,
        span: &span,
    };

    thread::scope(|s| {
        let cpu = s.spawn(|| traced.run(Facet::Cpu, |r| (x.cpu)(payload, policy, r)));
        let memory = s.spawn(|| traced.run(Facet::Memory, |r| (x.memory)(payload, policy, r)));
        let storage =
            s.spawn(|| traced.run(Facet::Storage, |r| (x.storage)(payload, policy, r)));
        let network =
            s.spawn(|| traced.run(Facet::Network, |r| (x.network)(payload, policy, r)));
        let firmware =
            s.spawn(|| traced.run(Facet::Firmware, |r| (x.firmware)(payload, policy, r)));
        let system_vendor = s.spawn(|| {
            traced.run(Facet::SystemVendor, |r| {
                (x.system_vendor)(payload, policy, r)
            })
        });
        let hostname =
            s.spawn(|| traced.run(Facet::Hostname, |r| (x.hostname)(payload, policy, r)));

        Facets {
            cpu: joined(Facet::Cpu, cpu),
            memory: joined(Facet::Memory, memory),
            storage: joined(Facet::Storage, storage),
            network: joined(Facet::Network, network),
            firmware: joined(Facet::Firmware, firmware),
            system_vendor: joined(Facet::SystemVendor, system_vendor),
            hostname: joined(Facet::Hostname, hostname),
        }
    })
}

/// Tracing context of the thread that started a concurrent run
#[derive(Clone, Copy)]
struct Traced<'a> {
    dispatch: &'a Dispatch,
    span: &'a Span,
}

impl Traced<'_> {
    fn run<T: Default>(
        self,
        facet: Facet,
        extract: impl FnOnce(&mut FacetReport) -> T,
    ) -> (T, FacetReport) {
        dispatcher::with_default(self.dispatch, || {
            self.span.in_scope(|| run_facet(facet, extract))
        })
    }
}

/// Runs one extractor behind a fault boundary
pub(crate) fn run_facet<T: Default>(
    facet: Facet,
    extract: impl FnOnce(&mut FacetReport) -> T,
) -> (T, FacetReport) {
    let mut report = FacetReport::new(facet);
    let value = match panic::catch_unwind(AssertUnwindSafe(|| extract(&mut report))) {
        Ok(value) => value,
        Err(cause) => {
            report.record_fault(panic_message(cause.as_ref()));
            T::default()
        }
    };
    (value, report)
}

fn joined<T: Default>(
    facet: Facet,
    handle: ScopedJoinHandle<'_, (T, FacetReport)>,
) -> (T, FacetReport) {
    handle.join().unwrap_or_else(|cause| {
        let mut report = FacetReport::new(facet);
        report.record_fault(panic_message(cause.as_ref()));
        (T::default(), report)
    })
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(message) = cause.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.clone()
    } else {
        "extractor panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::EngineConfig;
    use crate::diagnostics::AnomalyReason;

    fn payload() -> RawPayload {
        RawPayload::from_value(json!({
            "inventory": {
                "cpu": {"count": 8, "architecture": "x86_64"},
                "memory": {"total": 17179869184u64},
                "disks": [{"name": "/dev/sda", "size": 1000, "serial": "S1"}],
                "interfaces": [{"name": "eth0", "mac_address": "52:54:00:00:00:01"}],
                "hostname": "node-1"
            }
        }))
        .unwrap()
    }

    fn broken_storage(_: &RawPayload, _: &Policy, _: &mut FacetReport) -> Vec<Storage> {
        panic!("disk table exploded")
    }

    #[test]
    fn panicking_extractor_only_degrades_its_own_facet() {
        let extractors = Extractors {
            storage: broken_storage,
            ..EXTRACTORS
        };
        for concurrent in [false, true] {
            let normalizer = Normalizer::with_policy(Policy {
                concurrent,
                ..Default::default()
            });
            assert_eq!(normalizer.policy().concurrent, concurrent);
            let normalized = normalizer.normalize_with(&payload(), &extractors);

            assert!(normalized.details.storage.is_empty());
            assert_eq!(normalized.details.cpu.count, 8);
            assert_eq!(normalized.details.ram_mebibytes, 16_384);
            assert_eq!(normalized.details.nics.len(), 1);
            assert_eq!(normalized.details.hostname, "node-1");

            assert_eq!(normalized.diagnostics.len(), 1);
            let fault = &normalized.diagnostics[0];
            assert_eq!(fault.facet, Facet::Storage);
            assert_eq!(
                fault.reason,
                AnomalyReason::ExtractorFault {
                    detail: "disk table exploded".to_string()
                }
            );
        }
    }

    #[test]
    fn config_compiles_into_policy() {
        let normalizer = Normalizer::new(&NormalizationConfig {
            engine: EngineConfig { concurrent: true },
            ..Default::default()
        })
        .unwrap();
        assert!(normalizer.policy().concurrent);
        assert_eq!(normalizer.policy().disk_size_unit, 1);
    }

    #[test]
    fn run_facet_passes_values_through() {
        let (value, report) = run_facet(Facet::Hostname, |_| "h".to_string());
        assert_eq!(value, "h");
        assert_eq!(report.unresolved(), 0);

        let (value, report) = run_facet(Facet::Memory, |_| -> u64 { panic!("{}", 42) });
        assert_eq!(value, 0);
        assert_eq!(
            report.anomalies()[0].reason,
            AnomalyReason::ExtractorFault {
                detail: "42".to_string()
            }
        );
    }

    #[test]
    fn diagnostics_follow_facet_order() {
        let payload = RawPayload::from_value(json!({
            "hostname": ["x"],
            "disks": [{"name": "/dev/sda"}],
            "cpu": {"architecture": "x86_64"}
        }))
        .unwrap();
        let normalized = Normalizer::default().normalize(&payload);
        let facets: Vec<_> = normalized.diagnostics.iter().map(|a| a.facet).collect();
        assert_eq!(facets, vec![Facet::Cpu, Facet::Storage, Facet::Hostname]);
        assert!(!normalized.is_clean());
    }
}
