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

use clap::ValueEnum;
use hardware_details::Normalized;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab indented JSON
    #[default]
    Json,
    Yaml,
}

/// Renders the record, or the record and its diagnostics when `with_diagnostics` is set
pub fn render(
    normalized: &Normalized,
    format: OutputFormat,
    with_diagnostics: bool,
) -> eyre::Result<String> {
    if with_diagnostics {
        serialize(normalized, format)
    } else {
        serialize(&normalized.details, format)
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> eyre::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut buf = Vec::new();
            let mut serializer =
                serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
            value.serialize(&mut serializer)?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

#[cfg(test)]
mod tests {
    use hardware_details::RawPayload;
    use serde_json::json;

    use super::*;

    fn normalized() -> Normalized {
        hardware_details::normalize(
            &RawPayload::from_value(json!({
                "hostname": "n1",
                "disks": [{"name": "/dev/sda"}]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn json_is_tab_indented() {
        let text = render(&normalized(), OutputFormat::Json, false).unwrap();
        assert!(text.starts_with("{\n\t\"systemVendor\": {\n\t\t\"vendor\": \"\""));
        assert!(text.contains("\n\t\"hostname\": \"n1\"\n}"));
        assert!(!text.contains("diagnostics"));
    }

    #[test]
    fn diagnostics_envelope() {
        let text = render(&normalized(), OutputFormat::Json, true).unwrap();
        let parsed: Normalized = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, normalized());
        assert_eq!(parsed.diagnostics[0].path, "disks[0].size");
    }

    #[test]
    fn yaml_output() {
        let text = render(&normalized(), OutputFormat::Yaml, false).unwrap();
        assert!(text.contains("hostname: n1"));
        assert!(text.contains("ramMebibytes: 0"));
    }
}
