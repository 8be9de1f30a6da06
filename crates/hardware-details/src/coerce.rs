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

//! Typed coercions on top of [`Node`].
//!
//! Every coercion returns `Err(FieldError::Missing)` for absent/`null` values and
//! `Err(FieldError::NotCoercible)` for values of the wrong shape. None of them panic.

use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use mac_address::MacAddress;
use serde_json::Value;

use crate::error::FieldError;
use crate::payload::Node;
use crate::units::{self, SizeUnits, f64_to_u64, is_decimal};

pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .and_then(f64_to_u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Non-negative, finite floats only
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if is_decimal(s.trim()) => s.trim().parse().ok()?,
        _ => return None,
    };
    (f.is_finite() && f >= 0.0).then_some(f)
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Bytes from a bare number (scaled by `bare_unit`) or a unit-suffixed string
pub fn coerce_bytes(value: &Value, bare_unit: u64, sizes: &SizeUnits) -> Option<u64> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => v.checked_mul(bare_unit),
            None => n
                .as_f64()
                .and_then(|f| f64_to_u64(f * bare_unit as f64)),
        },
        Value::String(s) => sizes.to_bytes(s, bare_unit),
        _ => None,
    }
}

pub fn coerce_megahertz(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => units::frequency_mhz(s),
        other => coerce_f64(other),
    }
}

pub fn coerce_megabits(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => units::link_speed_mbps(s),
        Value::Number(n) => n.as_f64().and_then(f64_to_u64),
        _ => None,
    }
}

/// Lower-case, colon separated form of a 48-bit MAC address.
///
/// Accepts `:`, `-` and `.` separators or none at all.
pub fn normalize_mac(raw: &str) -> Result<String, FieldError> {
    let invalid = || FieldError::Invalid(format!("'{raw}' is not a 48-bit MAC address"));
    let hex: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();
    if hex.len() != 12 || !hex.is_ascii() {
        return Err(invalid());
    }
    let canonical = (0..6)
        .map(|i| &hex[2 * i..2 * i + 2])
        .collect::<Vec<_>>()
        .join(":");
    let mac = MacAddress::from_str(&canonical).map_err(|_| invalid())?;
    Ok(mac.to_string().to_lowercase())
}

/// Accepts plain addresses, addresses with a prefix length (`10.0.0.5/24`)
/// and IPv6 addresses with a zone (`fe80::1%eno1`). The zone is dropped.
pub fn parse_ip(raw: &str) -> Result<IpAddr, FieldError> {
    let trimmed = raw.trim();
    let (address, zone) = match trimmed.split_once('%') {
        Some((address, zone)) => (address, Some(zone)),
        None => (trimmed, None),
    };
    let network = IpNetwork::from_str(address)
        .map_err(|e| FieldError::Invalid(format!("'{raw}' is not an IP address: {e}")))?;
    if zone.is_some() && network.is_ipv4() {
        return Err(FieldError::Invalid(format!(
            "'{raw}' carries a zone, which only IPv6 addresses have"
        )));
    }
    Ok(network.ip())
}

fn coerced<T>(
    node: &Node<'_>,
    expected: &'static str,
    coerce: impl FnOnce(&Value) -> Option<T>,
) -> Result<T, FieldError> {
    let value = node.value().ok_or(FieldError::Missing)?;
    coerce(value).ok_or(FieldError::NotCoercible { expected })
}

impl Node<'_> {
    pub fn as_u64(&self) -> Result<u64, FieldError> {
        coerced(self, "a non-negative integer", coerce_u64)
    }

    pub fn as_f64(&self) -> Result<f64, FieldError> {
        coerced(self, "a non-negative number", coerce_f64)
    }

    pub fn as_bool(&self) -> Result<bool, FieldError> {
        coerced(self, "a boolean", coerce_bool)
    }

    pub fn as_string(&self) -> Result<String, FieldError> {
        coerced(self, "a string", coerce_string)
    }

    pub fn as_bytes(&self, bare_unit: u64, sizes: &SizeUnits) -> Result<u64, FieldError> {
        coerced(self, "a size", |value| coerce_bytes(value, bare_unit, sizes))
    }

    pub fn as_megahertz(&self) -> Result<f64, FieldError> {
        coerced(self, "a frequency", coerce_megahertz)
    }

    pub fn as_megabits(&self) -> Result<u64, FieldError> {
        coerced(self, "a link speed", coerce_megabits)
    }

    pub fn as_mac(&self) -> Result<String, FieldError> {
        normalize_mac(&self.as_string()?)
    }

    pub fn as_ip(&self) -> Result<IpAddr, FieldError> {
        parse_ip(&self.as_string()?)
    }
}
