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

//! Unit tables and quantity parsing for sizes, clock frequencies and link speeds

use std::collections::BTreeMap;

use byte_unit::{Byte, Unit, UnitType};

/// Size suffixes accepted out of the box, matched case-insensitively.
///
/// Single-letter suffixes follow `lsblk` and are binary.
pub const DEFAULT_SIZE_SUFFIXES: &[(&str, Unit)] = &[
    ("b", Unit::B),
    ("byte", Unit::B),
    ("bytes", Unit::B),
    ("k", Unit::KiB),
    ("kb", Unit::KB),
    ("kib", Unit::KiB),
    ("m", Unit::MiB),
    ("mb", Unit::MB),
    ("mib", Unit::MiB),
    ("g", Unit::GiB),
    ("gb", Unit::GB),
    ("gib", Unit::GiB),
    ("t", Unit::TiB),
    ("tb", Unit::TB),
    ("tib", Unit::TiB),
    ("p", Unit::PiB),
    ("pb", Unit::PB),
    ("pib", Unit::PiB),
];

/// Multipliers to MHz
const FREQUENCY_SUFFIXES: &[(&str, f64)] = &[
    ("", 1.0),
    ("mhz", 1.0),
    ("ghz", 1_000.0),
    ("khz", 0.001),
    ("hz", 0.000_001),
];

/// Multipliers to Mbit/s
const LINK_SPEED_SUFFIXES: &[(&str, f64)] = &[
    ("", 1.0),
    ("mbps", 1.0),
    ("mb/s", 1.0),
    ("mbit/s", 1.0),
    ("gbps", 1_000.0),
    ("gb/s", 1_000.0),
    ("gbit/s", 1_000.0),
    ("kbps", 0.001),
    ("kb/s", 0.001),
    ("kbit/s", 0.001),
];

pub const MEBIBYTE: u64 = 1024 * 1024;

/// Byte multipliers for every default size suffix
pub fn default_size_suffixes() -> BTreeMap<String, u64> {
    DEFAULT_SIZE_SUFFIXES
        .iter()
        .filter_map(|(token, unit)| {
            Byte::from_u64_with_unit(1, *unit).map(|byte| (token.to_string(), byte.as_u64()))
        })
        .collect()
}

/// Human readable binary size, e.g. for log lines
pub fn capacity_string(size_bytes: u64) -> String {
    Byte::from_u64(size_bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Lookup table from size suffix to byte multiplier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeUnits {
    multipliers: BTreeMap<String, u64>,
}

impl Default for SizeUnits {
    fn default() -> Self {
        Self::new(&default_size_suffixes())
    }
}

impl SizeUnits {
    pub fn new(table: &BTreeMap<String, u64>) -> Self {
        Self {
            multipliers: table
                .iter()
                .map(|(token, multiplier)| (token.trim().to_ascii_lowercase(), *multiplier))
                .collect(),
        }
    }

    pub fn multiplier(&self, token: &str) -> Option<u64> {
        self.multipliers
            .get(&token.trim().to_ascii_lowercase())
            .copied()
    }

    /// Converts `"10 GB"` style tokens to bytes. A bare number is scaled by `bare_unit`.
    pub fn to_bytes(&self, quantity: &str, bare_unit: u64) -> Option<u64> {
        let (number, suffix) = split_quantity(quantity)?;
        let multiplier = if suffix.is_empty() {
            bare_unit
        } else {
            self.multiplier(suffix)?
        };
        scale_exact(number, multiplier)
    }
}

/// Splits `"2.4 GHz"` into `("2.4", "GHz")`. The number part must be a plain decimal.
pub(crate) fn split_quantity(quantity: &str) -> Option<(&str, &str)> {
    let quantity = quantity.trim();
    let end = quantity
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(quantity.len());
    let (number, suffix) = quantity.split_at(end);
    is_decimal(number).then_some((number, suffix.trim()))
}

/// Digits with at most one decimal point
pub(crate) fn is_decimal(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.chars().filter(|c| *c == '.').count() <= 1
}

/// Multiplies a decimal string by an integer factor, exactly when the number is integral
fn scale_exact(number: &str, multiplier: u64) -> Option<u64> {
    if number.contains('.') {
        let value: f64 = number.parse().ok()?;
        f64_to_u64(value * multiplier as f64)
    } else {
        let value: u128 = number.parse().ok()?;
        u64::try_from(value.checked_mul(u128::from(multiplier))?).ok()
    }
}

pub(crate) fn f64_to_u64(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value <= u64::MAX as f64).then(|| value.round() as u64)
}

fn scaled(quantity: &str, table: &[(&str, f64)]) -> Option<f64> {
    let (number, suffix) = split_quantity(quantity)?;
    let suffix = suffix.to_ascii_lowercase();
    let (_, factor) = table.iter().find(|(token, _)| *token == suffix)?;
    let value: f64 = number.parse().ok()?;
    Some(value * factor).filter(|scaled| scaled.is_finite() && *scaled >= 0.0)
}

/// Parses `"2400.000"`, `"2.4 GHz"` and similar into MHz
pub fn frequency_mhz(quantity: &str) -> Option<f64> {
    scaled(quantity, FREQUENCY_SUFFIXES)
}

/// Parses `"10000"`, `"10Gbps"`, `"1000Mb/s"` and similar into Mbit/s
pub fn link_speed_mbps(quantity: &str) -> Option<u64> {
    scaled(quantity, LINK_SPEED_SUFFIXES).and_then(f64_to_u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_suffixes_cover_decimal_and_binary() {
        let units = SizeUnits::default();
        assert_eq!(units.multiplier("GB"), Some(1_000_000_000));
        assert_eq!(units.multiplier("GiB"), Some(1 << 30));
        assert_eq!(units.multiplier(" tib "), Some(1 << 40));
        assert_eq!(units.multiplier("furlongs"), None);
    }

    #[test]
    fn sizes_with_and_without_suffix() {
        let units = SizeUnits::default();
        assert_eq!(units.to_bytes("500 GB", 1), Some(500_000_000_000));
        assert_eq!(units.to_bytes("500GB", 1), Some(500_000_000_000));
        assert_eq!(units.to_bytes("1.5 KiB", 1), Some(1536));
        assert_eq!(units.to_bytes("16384", MEBIBYTE), Some(16384 * MEBIBYTE));
        assert_eq!(units.to_bytes("12 parsecs", 1), None);
        assert_eq!(units.to_bytes("-1 GB", 1), None);
        assert_eq!(units.to_bytes("", 1), None);
        assert_eq!(units.to_bytes("99999999999 PiB", 1), None);
    }

    #[test]
    fn frequencies() {
        assert_eq!(frequency_mhz("2400.0000"), Some(2400.0));
        assert_eq!(frequency_mhz("2.4 GHz"), Some(2400.0));
        assert_eq!(frequency_mhz("2400MHz"), Some(2400.0));
        assert_eq!(frequency_mhz("fast"), None);
        assert_eq!(frequency_mhz("3 THz"), None);
        assert_eq!(frequency_mhz(&"9".repeat(400)), None);
        assert_eq!(frequency_mhz(&format!("{} GHz", "9".repeat(308))), None);
        assert_eq!(frequency_mhz("inf"), None);
        assert_eq!(frequency_mhz("NaN MHz"), None);
    }

    #[test]
    fn link_speeds() {
        assert_eq!(link_speed_mbps("10000"), Some(10_000));
        assert_eq!(link_speed_mbps("25Gbps"), Some(25_000));
        assert_eq!(link_speed_mbps("1000Mb/s"), Some(1_000));
        assert_eq!(link_speed_mbps("2.5 Gbit/s"), Some(2_500));
        assert_eq!(link_speed_mbps("Unknown!"), None);
    }

    #[test]
    fn capacity_is_binary() {
        assert!(capacity_string(256 * (1 << 30)).contains("GiB"));
    }
}
