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

//! One extractor per hardware facet.
//!
//! Extractors are pure functions of the payload and policy. They only ever
//! write to the [`FacetReport`] they are handed, so they can run in any order
//! or in parallel.

pub mod cpu;
pub mod firmware;
pub mod identity;
pub mod memory;
pub mod network;
pub mod storage;

use crate::diagnostics::{AnomalyReason, FacetReport};
use crate::payload::{INVENTORY_KEY, Node, PROCESSED_KEY, RawPayload};

/// [`RawPayload::inventory`], recording a wrapper key that is present but not
/// a mapping. The inventory then falls back to the root.
pub(crate) fn inventory<'a>(payload: &'a RawPayload, report: &mut FacetReport) -> Node<'a> {
    mapping_section(payload.root().get(INVENTORY_KEY), report);
    payload.inventory()
}

/// [`RawPayload::processed`], recording a misshapen wrapper key like [`inventory`]
pub(crate) fn processed<'a>(payload: &'a RawPayload, report: &mut FacetReport) -> Node<'a> {
    mapping_section(payload.root().get(PROCESSED_KEY), report);
    payload.processed()
}

/// `Some(node)` if `node` is a mapping. A section that is present with any
/// other shape is recorded and treated as absent.
pub(crate) fn mapping_section<'a>(node: Node<'a>, report: &mut FacetReport) -> Option<Node<'a>> {
    if node.is_mapping() {
        Some(node)
    } else {
        if node.is_present() {
            report.record(
                &node,
                AnomalyReason::NotCoercible {
                    expected: "a mapping".to_string(),
                },
            );
        }
        None
    }
}

/// Elements of a sequence section. Absent sections yield nothing silently,
/// sections of another shape are recorded.
pub(crate) fn sequence_section<'a>(node: &Node<'a>, report: &mut FacetReport) -> Vec<Node<'a>> {
    match node.elements() {
        Some(elements) => elements,
        None => {
            if node.is_present() {
                report.record(
                    node,
                    AnomalyReason::NotCoercible {
                        expected: "a sequence".to_string(),
                    },
                );
            }
            Vec::new()
        }
    }
}

/// An optional string field, empty when absent or unusable
pub(crate) fn string_field(node: &Node<'_>, report: &mut FacetReport) -> String {
    report.optional(node, Node::as_string).unwrap_or_default()
}
