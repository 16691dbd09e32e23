// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use anyhow::{Result, bail};

fn amount(sub: &clap::ArgMatches) -> u64 {
    sub.get_one::<u64>("amount").copied().unwrap_or(0)
}

/// `points add|deduct`
pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            ctx.require_pin(sub)?;
            ctx.state.add_points(amount(sub));
            println!("Points: {}", ctx.state.ledger().points);
        }
        Some(("deduct", sub)) => {
            ctx.require_pin(sub)?;
            let n = amount(sub);
            if !ctx.state.deduct_points(n) {
                bail!(
                    "Cannot take {} points, only {} available",
                    n,
                    ctx.state.ledger().points
                );
            }
            println!("Points: {}", ctx.state.ledger().points);
        }
        _ => {}
    }
    Ok(())
}

/// `xp add`
pub fn handle_xp(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("add", sub)) = m.subcommand() {
        ctx.require_pin(sub)?;
        let gained = ctx.state.add_xp(amount(sub));
        let l = ctx.state.ledger();
        if gained > 0 {
            println!("Level up! Now level {} (+{})", l.level, gained);
        }
        println!("XP: {} / {} (level {})", l.xp, l.xp_to_next_level, l.level);
    }
    Ok(())
}
