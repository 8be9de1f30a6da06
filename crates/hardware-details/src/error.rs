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

/// The payload could not be turned into a tree of mappings, sequences and scalars.
///
/// This is the only failure that aborts a conversion. Everything below the root
/// degrades to defaults and is reported as an [`crate::Anomaly`] instead.
#[derive(thiserror::Error, Debug)]
pub enum NormalizeError {
    #[error("Inspection payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inspection payload is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Inspection payload root must be a mapping, found a {0}")]
    NotAMapping(&'static str),
}

/// Failure to extract one field. Never escapes an extractor.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("field is missing")]
    Missing,
    #[error("value is not coercible to {expected}")]
    NotCoercible { expected: &'static str },
    #[error("{0}")]
    Invalid(String),
}
