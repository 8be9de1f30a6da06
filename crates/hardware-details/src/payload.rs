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

//! In-memory model of the raw inspection document and panic-free navigation over it.

use std::fmt;

use serde_json::Value;

use crate::error::NormalizeError;

/// Key under which the provider's inventory endpoint nests the hardware sections
pub(crate) const INVENTORY_KEY: &str = "inventory";
/// Key under which the provider nests data it derived from the inventory (LLDP, PXE, extra)
pub(crate) const PROCESSED_KEY: &str = "plugin_data";

/// Encoding of a raw payload document
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PayloadFormat {
    #[default]
    Json,
    Yaml,
}

/// The raw inspection document produced by the discovery agent.
///
/// The only guarantee is that the root is a mapping. Everything below it may
/// have any shape, which is why all access goes through [`Node`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawPayload {
    root: Value,
}

impl RawPayload {
    /// Wraps an already decoded document. Fails if the root is not a mapping.
    pub fn from_value(root: Value) -> Result<Self, NormalizeError> {
        match root {
            Value::Object(_) => Ok(Self { root }),
            other => Err(NormalizeError::NotAMapping(value_kind(&other))),
        }
    }

    pub fn from_json_str(data: &str) -> Result<Self, NormalizeError> {
        Self::from_value(serde_json::from_str(data)?)
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self, NormalizeError> {
        Self::from_value(serde_json::from_slice(data)?)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, NormalizeError> {
        Self::from_value(serde_yaml::from_str(data)?)
    }

    pub fn decode(data: &[u8], format: PayloadFormat) -> Result<Self, NormalizeError> {
        match format {
            PayloadFormat::Json => Self::from_json_slice(data),
            PayloadFormat::Yaml => Self::from_value(serde_yaml::from_slice(data)?),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Accessor rooted at the top of the document
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.root)
    }

    /// Accessor for the hardware inventory.
    ///
    /// Wrapped payloads carry it below `inventory`, flat (legacy) payloads at the root.
    pub fn inventory(&self) -> Node<'_> {
        self.nested_or_root(INVENTORY_KEY)
    }

    /// Accessor for provider-processed data such as `all_interfaces` and `parsed_lldp`
    pub fn processed(&self) -> Node<'_> {
        self.nested_or_root(PROCESSED_KEY)
    }

    fn nested_or_root(&self, key: &str) -> Node<'_> {
        let nested = self.root().get(key);
        if nested.is_mapping() {
            nested
        } else {
            self.root()
        }
    }
}

/// One step of a [`FieldPath`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the payload, rendered as `inventory.disks[0].size`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A cursor into the payload that remembers how it got there.
///
/// Walking through a missing key or a value of the wrong shape never fails,
/// it just yields an absent node whose path still describes what was asked for.
/// `null` is treated the same as a missing key.
#[derive(Clone, Debug)]
pub struct Node<'a> {
    value: Option<&'a Value>,
    path: FieldPath,
}

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            value: Some(value),
            path: FieldPath::default(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The underlying value, `None` if absent or `null`
    pub fn value(&self) -> Option<&'a Value> {
        self.value.filter(|v| !v.is_null())
    }

    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }

    pub fn is_mapping(&self) -> bool {
        self.value().is_some_and(Value::is_object)
    }

    pub fn get(&self, key: &str) -> Node<'a> {
        Node {
            value: self
                .value()
                .and_then(Value::as_object)
                .and_then(|map| map.get(key)),
            path: self.path.with(Segment::Key(key.to_string())),
        }
    }

    /// The first of `keys` that is present. If none is, the node for the first key,
    /// so a missing-field report names the preferred spelling.
    pub fn get_any(&self, keys: &[&str]) -> Node<'a> {
        let mut candidates = keys.iter().map(|key| self.get(key));
        let Some(first) = candidates.next() else {
            return Node {
                value: None,
                path: self.path.clone(),
            };
        };
        if first.is_present() {
            return first;
        }
        candidates.find(Node::is_present).unwrap_or(first)
    }

    /// Walks a dotted path of mapping keys, e.g. `system_vendor.firmware`
    pub fn lookup(&self, dotted: &str) -> Node<'a> {
        dotted
            .split('.')
            .filter(|key| !key.is_empty())
            .fold(self.clone(), |node, key| node.get(key))
    }

    pub fn index(&self, index: usize) -> Node<'a> {
        Node {
            value: self
                .value()
                .and_then(Value::as_array)
                .and_then(|items| items.get(index)),
            path: self.path.with(Segment::Index(index)),
        }
    }

    /// Child nodes of a sequence, `None` if this node is not a sequence
    pub fn elements(&self) -> Option<Vec<Node<'a>>> {
        let items = self.value()?.as_array()?;
        Some((0..items.len()).map(|i| self.index(i)).collect())
    }

    /// `self` if present, otherwise `fallback` if that is present, otherwise `self`
    pub fn or(self, fallback: Node<'a>) -> Node<'a> {
        if self.is_present() || !fallback.is_present() {
            self
        } else {
            fallback
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
