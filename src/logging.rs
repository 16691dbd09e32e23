// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "COPPERONE_LOG";

/// `COPPERONE_LOG`, then `RUST_LOG`, then `warn`.
pub fn filter_from(lookup: impl Fn(&str) -> Option<String>) -> EnvFilter {
    lookup(LOG_ENV)
        .or_else(|| lookup("RUST_LOG"))
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Logs go to stderr so tables and `--json` output on stdout stay clean.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from(|k| std::env::var(k).ok()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
