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

use tracing::metadata::LevelFilter;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize global logging output to STDERR, stdout carries the record.
/// `level` takes precedence over `RUST_LOG`, which defaults to `info`.
pub fn init_logging(level: Option<&str>) -> eyre::Result<()> {
    subscriber(level)?.try_init()?;
    Ok(())
}

// A logging subscriber for use on the current thread.
// Usually you want `init_logging()` instead.
pub fn subscriber(level: Option<&str>) -> eyre::Result<impl SubscriberInitExt> {
    let env_filter = match level {
        Some(level) => EnvFilter::builder().parse(level)?,
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
    };
    let stderr_formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    Ok(tracing_subscriber::registry().with(stderr_formatter.with_filter(env_filter)))
}
