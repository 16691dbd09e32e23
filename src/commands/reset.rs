// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use crate::learning::LearningProgress;
use anyhow::Result;

/// Zeroes the ledger and clears learning progress. The account, the
/// session and the PIN lock are kept.
pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    ctx.require_pin(m)?;
    ctx.state.reset_all_data();
    LearningProgress::load(ctx.store.clone()).clear();
    println!("All data reset. Starting fresh at level 1 with $0.00");
    Ok(())
}
